//! Activity gating - decides between audio-driven and idle output

use std::fmt;
use std::time::{Duration, Instant};

/// Which generator produces the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Frames come from the spectral pipeline and the current effect
    #[default]
    Active,
    /// Frames come from the idle animator
    Idle,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Active => f.write_str("ACTIVE"),
            Mode::Idle => f.write_str("IDLE"),
        }
    }
}

/// A change of mode produced by one check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    ActiveToIdle,
    IdleToActive,
}

/// Outcome of one [`ActivityMonitor::check_peak`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityReport {
    pub mode: Mode,
    pub peak: f32,
    /// Peak reached the volume threshold
    pub loud: bool,
    pub transition: Option<Transition>,
}

/// Threshold + timeout state machine
///
/// A loud window switches to ACTIVE immediately. Silence switches to IDLE
/// once it has lasted at least the idle timeout, measured from the last
/// loud window (or from the first check).
#[derive(Debug, Clone)]
pub struct ActivityMonitor {
    threshold: f32,
    timeout: Duration,
    mode: Mode,
    last_active: Option<Instant>,
}

impl ActivityMonitor {
    pub fn new(threshold: f32, timeout: Duration) -> Self {
        Self {
            threshold,
            timeout,
            mode: Mode::Active,
            last_active: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Evaluate the peak amplitude of the current window at time `now`
    pub fn check_peak(&mut self, peak: f32, now: Instant) -> ActivityReport {
        let loud = peak >= self.threshold;
        let last_active = *self.last_active.get_or_insert(now);

        let mode = if loud {
            self.last_active = Some(now);
            Mode::Active
        } else if now.saturating_duration_since(last_active) >= self.timeout {
            Mode::Idle
        } else {
            Mode::Active
        };

        let transition = match (self.mode, mode) {
            (Mode::Active, Mode::Idle) => Some(Transition::ActiveToIdle),
            (Mode::Idle, Mode::Active) => Some(Transition::IdleToActive),
            _ => None,
        };
        self.mode = mode;

        ActivityReport {
            mode,
            peak,
            loud,
            transition,
        }
    }
}
