//! Scroll effect - color originates at the center and travels outward

use super::{apply_gain, effect_gain, thirds, Effect};
use crate::frame::{ChannelBuffer, PixelFrame};
use lumen_analysis::AdaptiveSmoother;

/// Attenuation applied to the trail on every frame
const TRAIL_DECAY: f32 = 0.98;

/// Blur applied to the trail on every frame
const TRAIL_BLUR_SIGMA: f32 = 0.2;

/// Scroll effect
///
/// The low, mid and high thirds of the band vector drive red, green and blue
/// of the newest center pixel; older pixels scroll outward and fade.
pub struct ScrollEffect {
    band_count: usize,
    gain: AdaptiveSmoother,
    trail: ChannelBuffer,
    scratch: Vec<f32>,
}

impl ScrollEffect {
    pub fn new(half_width: usize, band_count: usize) -> Self {
        Self {
            band_count,
            gain: effect_gain(band_count),
            trail: ChannelBuffer::new(half_width, 0.0),
            scratch: vec![0.0; band_count],
        }
    }
}

impl Effect for ScrollEffect {
    fn apply(&mut self, bands: &[f32]) -> PixelFrame {
        self.scratch.clear();
        self.scratch
            .extend(bands.iter().map(|b| (b * b).min(f32::MAX)));
        self.scratch.resize(self.band_count, 0.0);

        let gain = self.gain.update(&self.scratch);
        apply_gain(&mut self.scratch, gain);

        let color = thirds(self.scratch.len()).map(|range| {
            let peak = self.scratch[range].iter().fold(0.0f32, |acc, &v| acc.max(v));
            (peak * 255.0).floor()
        });

        self.trail.shift_outward();
        self.trail.scale(TRAIL_DECAY);
        self.trail.blur(TRAIL_BLUR_SIGMA);
        self.trail.set_column(0, color);

        self.trail.mirrored()
    }

    fn reset(&mut self) {
        self.gain = effect_gain(self.band_count);
        self.trail = ChannelBuffer::new(self.trail.width(), 0.0);
    }

    fn name(&self) -> &'static str {
        "scroll"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_color_appears_at_center() {
        let mut effect = ScrollEffect::new(10, 12);
        let mut bands = vec![0.0; 12];
        bands[0] = 1.0; // low third only
        let frame = effect.apply(&bands);
        let center = frame.get(10).unwrap();
        assert!(center[0] > 200, "red should be bright, got {:?}", center);
        assert_eq!(center[1], 0);
        assert_eq!(center[2], 0);
        assert_eq!(frame.get(0), Some([0, 0, 0]), "edges still dark");
    }

    #[test]
    fn test_trail_moves_outward_and_fades() {
        let mut effect = ScrollEffect::new(10, 12);
        let mut pulse = vec![0.0; 12];
        pulse[11] = 1.0;
        effect.apply(&pulse);
        let silent = vec![0.0; 12];
        let mut frame = effect.apply(&silent);
        for _ in 0..3 {
            frame = effect.apply(&silent);
        }
        // Pulse entered at column 0 and has moved 4 columns outward
        let trail = frame.get(10 + 4).unwrap()[2];
        assert!(trail > 0 && trail < 255, "blue trail faded but visible, got {}", trail);
        assert_eq!(frame.get(10).unwrap()[2], 0);
    }

    #[test]
    fn test_saturating_input_clamps() {
        let mut effect = ScrollEffect::new(8, 9);
        for _ in 0..5 {
            let frame = effect.apply(&[f32::MAX; 9]);
            assert_eq!(frame.pixel_count(), 16);
        }
    }
}
