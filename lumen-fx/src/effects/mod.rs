//! Audio-driven effects
//!
//! Each effect turns a gain-normalized band-energy vector into a full
//! pixel frame and keeps its own private state between frames.

mod energy;
mod pump;
mod scroll;
mod spectrum;

pub use energy::EnergyEffect;
pub use pump::PumpEffect;
pub use scroll::ScrollEffect;
pub use spectrum::SpectrumEffect;

use crate::error::FxError;
use crate::frame::PixelFrame;
use crate::rng::Xorshift64;
use lumen_analysis::{AdaptiveSmoother, Coefficients};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Per-effect gain tracker: slow decay, fast rise
const EFFECT_GAIN: Coefficients = Coefficients::new(0.001, 0.99);

/// Initial per-effect gain
const EFFECT_GAIN_SEED: f32 = 0.01;

/// Trait for band-energy effects
pub trait Effect: Send {
    /// Render one frame from `bands`, updating only this effect's state
    fn apply(&mut self, bands: &[f32]) -> PixelFrame;

    /// Return to the state the effect had when constructed
    fn reset(&mut self);

    /// Get effect name
    fn name(&self) -> &'static str;
}

/// Effect variants, in dispatch-table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EffectKind {
    Scroll,
    Energy,
    #[default]
    Spectrum,
    Pump,
}

impl EffectKind {
    pub const ALL: [EffectKind; 4] = [
        EffectKind::Scroll,
        EffectKind::Energy,
        EffectKind::Spectrum,
        EffectKind::Pump,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Scroll => "scroll",
            EffectKind::Energy => "energy",
            EffectKind::Spectrum => "spectrum",
            EffectKind::Pump => "pump",
        }
    }

    /// The following variant, wrapping around
    pub fn next(self) -> Self {
        let i = self as usize;
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or(FxError::UnknownEffect(s))
    }
}

/// Holds every effect and dispatches to the current one
///
/// Effects that are not current keep their state untouched until they are
/// selected again.
pub struct EffectEngine {
    effects: Vec<Box<dyn Effect>>,
    current: EffectKind,
}

impl EffectEngine {
    /// Build all effects for a strip of `pixel_count` pixels
    pub fn new(pixel_count: usize, band_count: usize, initial: EffectKind) -> Self {
        let half = pixel_count / 2;
        // Order must match EffectKind::ALL
        let effects: Vec<Box<dyn Effect>> = vec![
            Box::new(ScrollEffect::new(half, band_count)),
            Box::new(EnergyEffect::new(half, band_count)),
            Box::new(SpectrumEffect::new(half)),
            Box::new(PumpEffect::new(half, band_count)),
        ];
        Self {
            effects,
            current: initial,
        }
    }

    pub fn current(&self) -> EffectKind {
        self.current
    }

    /// Make `kind` current and reset its state
    pub fn select(&mut self, kind: EffectKind) {
        self.effects[kind as usize].reset();
        if kind != self.current {
            debug!(from = %self.current, to = %kind, "Effect selected");
        }
        self.current = kind;
    }

    /// Select a random variant from `choices`; no-op when empty
    pub fn select_random(&mut self, rng: &mut Xorshift64, choices: &[EffectKind]) -> EffectKind {
        if let Some(&kind) = rng.choose(choices) {
            self.select(kind);
        }
        self.current
    }

    /// Render a frame with the current effect
    pub fn apply(&mut self, bands: &[f32]) -> PixelFrame {
        self.effects[self.current as usize].apply(bands)
    }
}

/// Per-band gain tracker owned by one effect
fn effect_gain(band_count: usize) -> AdaptiveSmoother {
    AdaptiveSmoother::filled(band_count, EFFECT_GAIN_SEED, EFFECT_GAIN)
}

/// Divide `values` elementwise by the gain, never by zero
fn apply_gain(values: &mut [f32], gain: &[f32]) {
    for (v, g) in values.iter_mut().zip(gain) {
        *v /= g.max(f32::MIN_POSITIVE);
    }
}

/// Split points of the band vector into low, mid and high thirds
fn thirds(len: usize) -> [std::ops::Range<usize>; 3] {
    [0..len / 3, len / 3..2 * len / 3, 2 * len / 3..len]
}
