//! Spectrum effect - the band vector laid out across the strip

use super::Effect;
use crate::frame::{mirror, PixelFrame};
use crate::interpolate::Resizer;
use lumen_analysis::{AdaptiveSmoother, Coefficients};

const SEED: f32 = 0.01;
/// Slow baseline removed from the red channel
const COMMON_MODE: Coefficients = Coefficients::new(0.99, 0.01);
const RED: Coefficients = Coefficients::new(0.2, 0.99);
const BLUE: Coefficients = Coefficients::new(0.1, 0.5);

/// Spectrum effect
///
/// Red shows each band above its slow-moving baseline, green shows the
/// frame-to-frame change, and blue a smoothed copy of the bands.
pub struct SpectrumEffect {
    half_width: usize,
    resizer: Resizer,
    common_mode: AdaptiveSmoother,
    red: AdaptiveSmoother,
    blue: AdaptiveSmoother,
    previous: Vec<f32>,
}

impl SpectrumEffect {
    pub fn new(half_width: usize) -> Self {
        Self {
            half_width,
            resizer: Resizer::new(),
            common_mode: AdaptiveSmoother::filled(half_width, SEED, COMMON_MODE),
            red: AdaptiveSmoother::filled(half_width, SEED, RED),
            blue: AdaptiveSmoother::filled(half_width, SEED, BLUE),
            previous: vec![SEED; half_width],
        }
    }
}

impl Effect for SpectrumEffect {
    fn apply(&mut self, bands: &[f32]) -> PixelFrame {
        let y = self.resizer.resize(bands, self.half_width);

        let baseline = self.common_mode.update(&y);
        let above: Vec<f32> = y.iter().zip(baseline).map(|(v, b)| v - b).collect();
        let green: Vec<f32> = y
            .iter()
            .zip(&self.previous)
            .map(|(v, p)| (v - p).abs() * 255.0)
            .collect();
        self.previous.copy_from_slice(&y);

        let red: Vec<f32> = self.red.update(&above).iter().map(|v| v * 255.0).collect();
        let blue: Vec<f32> = self.blue.update(&y).iter().map(|v| v * 255.0).collect();

        PixelFrame::from_channels(&mirror(&red), &mirror(&green), &mirror(&blue))
    }

    fn reset(&mut self) {
        *self = Self::new(self.half_width);
    }

    fn name(&self) -> &'static str {
        "spectrum"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_input_has_no_green() {
        let mut effect = SpectrumEffect::new(30);
        let bands: Vec<f32> = (0..24).map(|i| i as f32 / 24.0).collect();
        let mut frame = effect.apply(&bands);
        for _ in 0..20 {
            frame = effect.apply(&bands);
        }
        assert!(frame.channel(1).iter().all(|&g| g == 0));
        assert!(frame.channel(2).iter().any(|&b| b > 100), "blue follows the bands");
    }

    #[test]
    fn test_change_shows_in_green() {
        let mut effect = SpectrumEffect::new(30);
        effect.apply(&[0.0; 24]);
        let frame = effect.apply(&[1.0; 24]);
        assert!(frame.channel(1).iter().all(|&g| g == 255));
    }

    #[test]
    fn test_red_is_relative_to_baseline() {
        let mut effect = SpectrumEffect::new(30);
        let mut frame = effect.apply(&[0.5; 24]);
        for _ in 0..2000 {
            frame = effect.apply(&[0.5; 24]);
        }
        // Baseline has caught up with a constant input
        assert!(frame.channel(0).iter().all(|&r| r < 10), "{:?}", frame.channel(0));
    }

    #[test]
    fn test_identity_when_band_count_matches() {
        let mut effect = SpectrumEffect::new(4);
        let frame = effect.apply(&[0.0, 0.0, 0.0, 1.0]);
        assert_eq!(frame.pixel_count(), 8);
        assert_eq!(frame.get(7).unwrap()[1], 252);
        assert_eq!(frame.get(4).unwrap()[1], 2, "seeded previous value leaks a little green");
    }
}
