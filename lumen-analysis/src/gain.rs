//! Loudness-independent gain normalization

use crate::blur::gaussian_filter1d;
use crate::smoother::{AdaptiveSmoother, Coefficients};

/// Initial divisor; strictly positive so silence never divides by zero
const INITIAL_GAIN: f32 = 0.1;

/// Tracks the running peak of the band vector and divides by it
///
/// The peak is taken after a light Gaussian blur across bands so a single
/// spiky band does not dominate the divisor.
#[derive(Debug, Clone)]
pub struct GainNormalizer {
    tracker: AdaptiveSmoother,
    last_peak: f32,
}

impl GainNormalizer {
    pub fn new(coefficients: Coefficients) -> Self {
        Self {
            tracker: AdaptiveSmoother::scalar(INITIAL_GAIN, coefficients),
            last_peak: 0.0,
        }
    }

    /// Update the tracked peak from `bands` and divide `bands` by it in place
    ///
    /// A non-finite peak leaves the tracker untouched and the output is
    /// clamped to finite values.
    pub fn normalize(&mut self, bands: &mut [f32]) {
        let peak = gaussian_filter1d(bands, 1.0)
            .into_iter()
            .fold(0.0f32, f32::max);
        self.last_peak = peak;
        if peak.is_finite() {
            self.tracker.update_scalar(peak);
        }

        let divisor = self.divisor();
        for band in bands.iter_mut() {
            *band = (*band / divisor).min(f32::MAX);
        }
    }

    /// Current normalization divisor, never zero
    pub fn divisor(&self) -> f32 {
        self.tracker.scalar_value().max(f32::MIN_POSITIVE)
    }

    /// Blurred peak of the most recent input
    pub fn last_peak(&self) -> f32 {
        self.last_peak
    }

    pub fn reset(&mut self) {
        self.tracker.reset(INITIAL_GAIN);
        self.last_peak = 0.0;
    }
}
