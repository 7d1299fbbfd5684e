//! Pump effect - solid color sections sized by each bucket's share of energy

use super::{apply_gain, effect_gain, Effect};
use crate::frame::{ChannelBuffer, PixelFrame, Rgb};
use lumen_analysis::AdaptiveSmoother;

const BUCKETS: usize = 4;

/// Frames between palette rotations
const ROTATE_EVERY: u32 = 30;

const PALETTE: [Rgb; BUCKETS] = [[255, 0, 0], [255, 160, 0], [0, 255, 80], [0, 80, 255]];

/// Pump effect
///
/// The band vector is split into four equal-width frequency buckets. Going
/// outward from the center, each bucket fills a run of pixels proportional to
/// its share of the total energy, in its own color. Brightness follows the
/// strongest bucket and the colors rotate between buckets every
/// [`ROTATE_EVERY`] frames.
pub struct PumpEffect {
    band_count: usize,
    half_width: usize,
    gain: AdaptiveSmoother,
    frames: u32,
    scratch: Vec<f32>,
}

impl PumpEffect {
    pub fn new(half_width: usize, band_count: usize) -> Self {
        Self {
            band_count,
            half_width,
            gain: effect_gain(band_count),
            frames: 0,
            scratch: vec![0.0; band_count],
        }
    }

    /// Peak of each bucket of the normalized band vector
    fn buckets(&self) -> [f32; BUCKETS] {
        let len = self.scratch.len();
        std::array::from_fn(|i| {
            let range = i * len / BUCKETS..(i + 1) * len / BUCKETS;
            self.scratch[range].iter().fold(0.0f32, |acc, &v| acc.max(v))
        })
    }
}

impl Effect for PumpEffect {
    fn apply(&mut self, bands: &[f32]) -> PixelFrame {
        self.scratch.clear();
        self.scratch
            .extend(bands.iter().map(|b| (b * b).min(f32::MAX)));
        self.scratch.resize(self.band_count, 0.0);

        let gain = self.gain.update(&self.scratch);
        apply_gain(&mut self.scratch, gain);

        let rotation = (self.frames / ROTATE_EVERY) as usize;
        self.frames = self.frames.wrapping_add(1);

        let buckets = self.buckets();
        let total: f32 = buckets.iter().sum();
        let mut canvas = ChannelBuffer::new(self.half_width, 0.0);
        if !(total > 0.0 && total.is_finite()) {
            return canvas.mirrored();
        }

        let level = buckets.iter().fold(0.0f32, |acc, &v| acc.max(v)).min(1.0);
        let mut cumulative = 0.0;
        let mut start = 0;
        for (i, share) in buckets.iter().map(|b| b / total).enumerate() {
            cumulative += share;
            let end = ((cumulative * self.half_width as f32).round() as usize).min(self.half_width);
            let color = PALETTE[(i + rotation) % BUCKETS].map(|c| c as f32 * level);
            for column in start..end {
                canvas.set_column(column, color);
            }
            start = start.max(end);
        }

        canvas.mirrored()
    }

    fn reset(&mut self) {
        self.gain = effect_gain(self.band_count);
        self.frames = 0;
    }

    fn name(&self) -> &'static str {
        "pump"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_is_dark() {
        let mut effect = PumpEffect::new(30, 24);
        for _ in 0..5 {
            assert!(effect.apply(&[0.0; 24]).is_black());
        }
    }

    #[test]
    fn test_sections_follow_bucket_share() {
        let mut effect = PumpEffect::new(40, 24);
        // Prime the gain so every band normalizes against the same peak
        effect.apply(&[1.0; 24]);
        let mut bands = vec![0.0; 24];
        for b in &mut bands[..6] {
            *b = 1.0;
        }
        for b in &mut bands[6..12] {
            *b = (1.0f32 / 3.0).sqrt();
        }
        let frame = effect.apply(&bands);

        // Lows hold 3/4 of the energy, low-mids 1/4
        let center = 40;
        assert_eq!(frame.get(center).unwrap(), [255, 0, 0]);
        assert_eq!(frame.get(center + 29).unwrap(), [255, 0, 0]);
        let second = frame.get(center + 30).unwrap();
        assert_eq!(second[0], 255);
        assert!(second[1] > 150, "second section uses the orange slot: {:?}", second);
        assert!(frame.get(center + 39).unwrap() != [0, 0, 0], "whole half is covered");
    }

    #[test]
    fn test_palette_rotates() {
        let mut effect = PumpEffect::new(10, 8);
        effect.apply(&[1.0; 8]);
        let mut bands = vec![0.0; 8];
        bands[0] = 1.0;
        let first = effect.apply(&bands).get(10).unwrap();
        for _ in 0..ROTATE_EVERY {
            effect.apply(&bands);
        }
        let later = effect.apply(&bands).get(10).unwrap();
        assert_ne!(first, later);
    }
}
