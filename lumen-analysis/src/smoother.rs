//! Asymmetric exponential smoothing
//!
//! Every stateful filter in the pipeline (gain tracking, band smoothing,
//! per-effect channel smoothing, frame-rate estimation) is an instance of
//! [`AdaptiveSmoother`] with its own coefficients and its own state.

/// Rise and decay coefficients of an [`AdaptiveSmoother`]
///
/// Both lie in `(0, 1]`. A coefficient of 1 tracks the input immediately in
/// that direction; smaller values react more slowly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    /// Applied when the input is below or equal to the current value
    pub decay: f32,
    /// Applied when the input is above the current value
    pub rise: f32,
}

impl Coefficients {
    pub const fn new(decay: f32, rise: f32) -> Self {
        Self { decay, rise }
    }

    /// Whether both coefficients lie in `(0, 1]`
    pub fn is_valid(&self) -> bool {
        let valid = |a: f32| a > 0.0 && a <= 1.0;
        valid(self.decay) && valid(self.rise)
    }

    fn clamped(self) -> Self {
        Self {
            decay: self.decay.clamp(f32::MIN_POSITIVE, 1.0),
            rise: self.rise.clamp(f32::MIN_POSITIVE, 1.0),
        }
    }
}

/// Exponential filter with separate rise and decay rates
///
/// Each element follows
/// `value += alpha * (input - value)` where `alpha` is the rise coefficient
/// if the input is above the current value and the decay coefficient
/// otherwise.
#[derive(Debug, Clone)]
pub struct AdaptiveSmoother {
    values: Vec<f32>,
    coefficients: Coefficients,
}

impl AdaptiveSmoother {
    /// Create a smoother seeded with `initial`
    ///
    /// Coefficients outside `(0, 1]` are clamped into range.
    pub fn new(initial: Vec<f32>, coefficients: Coefficients) -> Self {
        Self {
            values: initial,
            coefficients: coefficients.clamped(),
        }
    }

    /// Create a smoother of `len` elements all seeded with `value`
    pub fn filled(len: usize, value: f32, coefficients: Coefficients) -> Self {
        Self::new(vec![value; len], coefficients)
    }

    /// Create a single-element smoother
    pub fn scalar(value: f32, coefficients: Coefficients) -> Self {
        Self::new(vec![value], coefficients)
    }

    /// Feed one input per element and return the updated values
    ///
    /// Extra inputs beyond the smoother's length are ignored.
    pub fn update(&mut self, input: &[f32]) -> &[f32] {
        debug_assert_eq!(input.len(), self.values.len());
        let Coefficients { decay, rise } = self.coefficients;
        for (value, &new) in self.values.iter_mut().zip(input) {
            let alpha = if new > *value { rise } else { decay };
            *value += alpha * (new - *value);
        }
        &self.values
    }

    /// Feed the same input to every element and return the first value
    pub fn update_scalar(&mut self, input: f32) -> f32 {
        let Coefficients { decay, rise } = self.coefficients;
        for value in &mut self.values {
            let alpha = if input > *value { rise } else { decay };
            *value += alpha * (input - *value);
        }
        self.scalar_value()
    }

    /// Current smoothed values
    pub fn value(&self) -> &[f32] {
        &self.values
    }

    /// First smoothed value (the only one for scalar smoothers)
    pub fn scalar_value(&self) -> f32 {
        self.values.first().copied().unwrap_or(0.0)
    }

    pub fn coefficients(&self) -> Coefficients {
        self.coefficients
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overwrite every element with `value`
    pub fn reset(&mut self, value: f32) {
        self.values.fill(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_input_at_seed_is_stable() {
        let mut smoother = AdaptiveSmoother::filled(4, 0.3, Coefficients::new(0.2, 0.7));
        for _ in 0..1000 {
            smoother.update(&[0.3; 4]);
        }
        assert!(smoother.value().iter().all(|&v| v == 0.3));
    }

    #[test]
    fn test_full_rise_tracks_step_up_in_one_update() {
        let mut smoother = AdaptiveSmoother::scalar(0.0, Coefficients::new(0.1, 1.0));
        assert_eq!(smoother.update_scalar(5.0), 5.0);
    }

    #[test]
    fn test_full_decay_tracks_step_down_in_one_update() {
        let mut smoother = AdaptiveSmoother::scalar(5.0, Coefficients::new(1.0, 0.1));
        assert_eq!(smoother.update_scalar(-2.0), -2.0);
    }

    #[test]
    fn test_asymmetric_response() {
        let coeffs = Coefficients::new(0.1, 0.9);
        let mut up = AdaptiveSmoother::scalar(0.0, coeffs);
        let mut down = AdaptiveSmoother::scalar(1.0, coeffs);

        let risen = up.update_scalar(1.0);
        let fallen = 1.0 - down.update_scalar(0.0);
        assert!((risen - 0.9).abs() < 1e-6);
        assert!((fallen - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_elementwise_direction() {
        let mut smoother = AdaptiveSmoother::new(vec![0.5, 0.5], Coefficients::new(0.5, 1.0));
        let out = smoother.update(&[1.0, 0.0]);
        assert_eq!(out, &[1.0, 0.25]);
    }

    #[test]
    fn test_coefficients_are_clamped() {
        let smoother = AdaptiveSmoother::scalar(0.0, Coefficients::new(2.0, -1.0));
        let c = smoother.coefficients();
        assert_eq!(c.decay, 1.0);
        assert!(c.rise > 0.0);
        assert!(!Coefficients::new(0.0, 0.5).is_valid());
        assert!(Coefficients::new(1.0, 0.5).is_valid());
    }

    #[test]
    fn test_scalar_broadcasts_to_all_elements() {
        let mut smoother = AdaptiveSmoother::filled(3, 0.0, Coefficients::new(1.0, 1.0));
        smoother.update_scalar(2.0);
        assert_eq!(smoother.value(), &[2.0, 2.0, 2.0]);
    }
}
