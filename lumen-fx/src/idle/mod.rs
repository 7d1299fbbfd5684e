//! Ambient idle animations
//!
//! Played when the audio has been below the volume threshold for longer
//! than the idle timeout. One pattern is current at a time; after two full
//! back-and-forth cycles the animator re-initializes and draws a new one.

mod center_scroll;
mod rainbow_wipe;

pub use center_scroll::CenterScroll;
pub use rainbow_wipe::RainbowWipe;

use crate::error::FxError;
use crate::frame::{PixelFrame, Rgb};
use crate::rng::Xorshift64;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Red, orange, yellow, green, cyan, blue, violet
pub const RAINBOW: [Rgb; 7] = [
    [255, 0, 0],
    [255, 106, 0],
    [255, 216, 0],
    [76, 255, 0],
    [0, 255, 255],
    [0, 38, 255],
    [255, 0, 220],
];

/// Full back-and-forth cycles before a pattern hands over
const CYCLES_PER_PATTERN: u32 = 2;

/// Outcome of one idle step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleStep {
    Continue,
    /// The pattern finished its cycles; the animator re-initializes
    CycleComplete,
}

/// Trait for idle patterns
pub trait IdlePattern: Send {
    /// Advance one frame, drawing onto `canvas`
    fn step(&mut self, canvas: &mut PixelFrame) -> IdleStep;

    /// Restore start values (position, direction, color, repeats)
    fn reset(&mut self);

    /// Completed back-and-forth cycles since the last reset
    fn repeats(&self) -> u32;

    fn name(&self) -> &'static str;
}

/// Idle pattern variants, in dispatch-table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdleKind {
    RainbowWipe,
    CenterScroll,
}

impl IdleKind {
    pub const ALL: [IdleKind; 2] = [IdleKind::RainbowWipe, IdleKind::CenterScroll];

    pub fn name(self) -> &'static str {
        match self {
            IdleKind::RainbowWipe => "rainbow_wipe",
            IdleKind::CenterScroll => "center_scroll",
        }
    }
}

impl fmt::Display for IdleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IdleKind {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or(FxError::UnknownIdlePattern(s))
    }
}

/// Owns the idle canvas and every idle pattern
pub struct IdleAnimator {
    patterns: Vec<Box<dyn IdlePattern>>,
    choices: Vec<IdleKind>,
    current: IdleKind,
    canvas: PixelFrame,
    rng: Xorshift64,
}

impl IdleAnimator {
    /// Create an animator drawing from `choices`
    pub fn new(pixel_count: usize, choices: Vec<IdleKind>, seed: u64) -> Result<Self, FxError> {
        let current = *choices.first().ok_or(FxError::NoIdlePatterns)?;
        // Order must match IdleKind::ALL
        let patterns: Vec<Box<dyn IdlePattern>> = vec![
            Box::new(RainbowWipe::new(pixel_count)),
            Box::new(CenterScroll::new(pixel_count)),
        ];
        Ok(Self {
            patterns,
            choices,
            current,
            canvas: PixelFrame::new(pixel_count),
            rng: Xorshift64::new(seed),
        })
    }

    pub fn current(&self) -> IdleKind {
        self.current
    }

    pub fn repeats(&self) -> u32 {
        self.patterns[self.current as usize].repeats()
    }

    /// Start idling on top of the last frame that was shown
    pub fn enter(&mut self, last_frame: &PixelFrame) -> IdleKind {
        if last_frame.pixel_count() == self.canvas.pixel_count() {
            self.canvas = last_frame.clone();
        }
        self.reinit()
    }

    /// Reset counters and draw a new pattern from the configured set
    pub fn reinit(&mut self) -> IdleKind {
        if let Some(&kind) = self.rng.choose(&self.choices) {
            self.current = kind;
        }
        self.patterns[self.current as usize].reset();
        debug!(pattern = %self.current, "Idle pattern selected");
        self.current
    }

    /// Advance the current pattern by one frame
    ///
    /// When the pattern completes its cycles the animator re-initializes
    /// before returning, and reports [`IdleStep::CycleComplete`].
    pub fn step(&mut self) -> (PixelFrame, IdleStep) {
        let step = self.patterns[self.current as usize].step(&mut self.canvas);
        if step == IdleStep::CycleComplete {
            self.reinit();
        }
        (self.canvas.clone(), step)
    }
}

/// Flip `direction` between +1 and -1; returns true when it became forward
fn flip(direction: &mut i32) -> bool {
    *direction = -*direction;
    *direction == 1
}
