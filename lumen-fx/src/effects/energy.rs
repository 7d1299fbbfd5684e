//! Energy effect - bars that grow outward from the center with loudness

use super::{apply_gain, effect_gain, thirds, Effect};
use crate::frame::{ChannelBuffer, PixelFrame};
use lumen_analysis::{AdaptiveSmoother, Coefficients};

/// Exponent (< 1) compressing each macro-channel's dynamic range
const ENERGY_EXPONENT: f32 = 0.9;

/// Bars snap on quickly and fall back slowly
const BAR_SMOOTHING: Coefficients = Coefficients::new(0.1, 0.99);

/// Heavy blur to soften the bar edges
const EDGE_BLUR_SIGMA: f32 = 4.0;

/// Energy effect
///
/// Each of red, green and blue lights a run of pixels from the center whose
/// length follows the mean energy of the low, mid and high bands.
pub struct EnergyEffect {
    band_count: usize,
    half_width: usize,
    gain: AdaptiveSmoother,
    bars: AdaptiveSmoother,
    canvas: ChannelBuffer,
    scratch: Vec<f32>,
}

impl EnergyEffect {
    pub fn new(half_width: usize, band_count: usize) -> Self {
        Self {
            band_count,
            half_width,
            gain: effect_gain(band_count),
            bars: bar_smoother(half_width),
            canvas: ChannelBuffer::new(half_width, 0.0),
            scratch: vec![0.0; band_count],
        }
    }
}

fn bar_smoother(half_width: usize) -> AdaptiveSmoother {
    AdaptiveSmoother::filled(3 * half_width, 1.0, BAR_SMOOTHING)
}

impl Effect for EnergyEffect {
    fn apply(&mut self, bands: &[f32]) -> PixelFrame {
        self.scratch.clear();
        self.scratch.extend_from_slice(bands);
        self.scratch.resize(self.band_count, 0.0);

        let gain = self.gain.update(&self.scratch);
        apply_gain(&mut self.scratch, gain);
        let scale = self.half_width.saturating_sub(1) as f32;

        let lengths = thirds(self.scratch.len()).map(|range| {
            let count = range.len().max(1) as f32;
            let mean = self.scratch[range]
                .iter()
                .map(|&v| (v * scale).max(0.0).powf(ENERGY_EXPONENT))
                .sum::<f32>()
                / count;
            // Saturating float-to-int cast bounds huge energies
            (mean as usize).min(self.half_width)
        });

        for (channel, &lit) in lengths.iter().enumerate() {
            let row = self.canvas.channel_mut(channel);
            row[..lit].fill(255.0);
            row[lit..].fill(0.0);
        }

        let smoothed = self.bars.update(&self.canvas.flattened());
        let rounded: Vec<f32> = smoothed.iter().map(|v| v.round()).collect();
        self.canvas.copy_from_flat(&rounded);
        self.canvas.blur(EDGE_BLUR_SIGMA);

        self.canvas.mirrored()
    }

    fn reset(&mut self) {
        self.gain = effect_gain(self.band_count);
        self.bars = bar_smoother(self.half_width);
        self.canvas = ChannelBuffer::new(self.half_width, 0.0);
    }

    fn name(&self) -> &'static str {
        "energy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_pixels(frame: &PixelFrame, channel: usize) -> usize {
        frame.channel(channel).iter().filter(|&&v| v > 127).count()
    }

    #[test]
    fn test_louder_band_lights_longer_run() {
        let mut effect = EnergyEffect::new(30, 24);
        // Prime every band's gain with the same peak first
        let mut frame = effect.apply(&[1.0; 24]);
        let mut bands = vec![0.05; 24];
        for b in &mut bands[..8] {
            *b = 1.0;
        }
        for _ in 0..30 {
            frame = effect.apply(&bands);
        }
        assert!(
            lit_pixels(&frame, 0) > lit_pixels(&frame, 2),
            "red (loud lows) should outrun blue: {} vs {}",
            lit_pixels(&frame, 0),
            lit_pixels(&frame, 2)
        );
    }

    #[test]
    fn test_silence_fades_to_dark() {
        let mut effect = EnergyEffect::new(30, 24);
        let mut frame = effect.apply(&[0.0; 24]);
        for _ in 0..200 {
            frame = effect.apply(&[0.0; 24]);
        }
        assert!(frame.is_black(), "bars decay fully with no energy");
    }

    #[test]
    fn test_huge_input_is_bounded() {
        let mut effect = EnergyEffect::new(30, 24);
        let frame = effect.apply(&[1e30; 24]);
        assert_eq!(frame.pixel_count(), 60);
    }
}
