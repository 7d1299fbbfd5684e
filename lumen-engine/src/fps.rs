//! Loop cadence measurement

use lumen_analysis::{AdaptiveSmoother, Coefficients};
use std::time::{Duration, Instant};

/// Minimum spacing between two FPS reports
const REPORT_INTERVAL: Duration = Duration::from_millis(500);

/// Smoothed frames-per-second estimate
///
/// Fed once per processed chunk. Observability only; nothing in the
/// pipeline depends on the estimate.
#[derive(Debug, Clone)]
pub struct FrameRateEstimator {
    smoother: AdaptiveSmoother,
    last_tick: Option<Instant>,
    last_report: Option<Instant>,
}

impl FrameRateEstimator {
    /// Create an estimator seeded with the configured frame rate
    pub fn new(expected_fps: f32, coefficients: Coefficients) -> Self {
        Self {
            smoother: AdaptiveSmoother::scalar(expected_fps, coefficients),
            last_tick: None,
            last_report: None,
        }
    }

    /// Record a frame at `now` and return the smoothed rate
    ///
    /// A zero interval leaves the estimate unchanged.
    pub fn tick(&mut self, now: Instant) -> f32 {
        if let Some(prev) = self.last_tick {
            let dt_ms = now.saturating_duration_since(prev).as_secs_f32() * 1000.0;
            if dt_ms > 0.0 {
                self.smoother.update_scalar(1000.0 / dt_ms);
            }
        }
        self.last_tick = Some(now);
        self.fps()
    }

    pub fn fps(&self) -> f32 {
        self.smoother.scalar_value()
    }

    /// Current estimate if a report is due at `now`
    pub fn maybe_report(&mut self, now: Instant) -> Option<f32> {
        let due = self
            .last_report
            .map_or(true, |last| now.saturating_duration_since(last) >= REPORT_INTERVAL);
        if due {
            self.last_report = Some(now);
            Some(self.fps())
        } else {
            None
        }
    }
}
