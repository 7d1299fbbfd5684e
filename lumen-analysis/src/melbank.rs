//! Mel-warped triangular filterbank
//!
//! Projects a linear magnitude spectrum onto a small number of perceptual
//! bands. Bands are evenly spaced on the mel scale, so they are narrow at
//! low frequencies and wide at high frequencies, and adjacent triangles
//! overlap by half.

use thiserror::Error;
use tracing::debug;

/// Errors raised when building a band layout
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BandError {
    #[error("Band count must be at least 1")]
    NoBands,
    #[error("Spectrum must have at least one bin")]
    NoBins,
    #[error("Invalid frequency range {min} - {max} Hz (Nyquist is {nyquist} Hz)")]
    InvalidRange { min: f32, max: f32, nyquist: f32 },
}

/// Convert frequency in Hz to mels
pub fn hertz_to_mel(freq: f32) -> f32 {
    3340.0 * (1.0 + freq / 250.0).ln() / 9.0f32.ln()
}

/// Convert mels back to frequency in Hz
pub fn mel_to_hertz(mel: f32) -> f32 {
    250.0 * (9.0f32.powf(mel / 3340.0) - 1.0)
}

/// Parameters that fully determine a [`BandMapper`]'s weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandLayout {
    pub sample_rate: u32,
    /// Length of the (zero-padded) transform
    pub fft_size: usize,
    /// Number of spectrum bins fed to [`BandMapper::map`]
    pub bins: usize,
    pub min_frequency: f32,
    pub max_frequency: f32,
    pub band_count: usize,
}

impl BandLayout {
    fn validate(&self) -> Result<(), BandError> {
        if self.band_count == 0 {
            return Err(BandError::NoBands);
        }
        if self.bins == 0 || self.fft_size == 0 {
            return Err(BandError::NoBins);
        }
        let nyquist = self.sample_rate as f32 / 2.0;
        let valid = self.min_frequency > 0.0
            && self.min_frequency < self.max_frequency
            && self.max_frequency <= nyquist;
        if !valid {
            return Err(BandError::InvalidRange {
                min: self.min_frequency,
                max: self.max_frequency,
                nyquist,
            });
        }
        Ok(())
    }
}

/// Spectrum-to-band projection through a precomputed weight matrix
#[derive(Debug, Clone)]
pub struct BandMapper {
    layout: BandLayout,
    /// Row-major `band_count x bins` weights
    weights: Vec<f32>,
    /// Center frequency of each band in Hz
    centers: Vec<f32>,
}

impl BandMapper {
    /// Build the weight matrix for `layout`
    pub fn new(layout: BandLayout) -> Result<Self, BandError> {
        layout.validate()?;
        let (weights, centers) = build_weights(&layout);
        Ok(Self {
            layout,
            weights,
            centers,
        })
    }

    /// Rebuild the weights for a new frequency range
    ///
    /// On error the previous weights stay in place.
    pub fn set_frequency_range(&mut self, min: f32, max: f32) -> Result<(), BandError> {
        let layout = BandLayout {
            min_frequency: min,
            max_frequency: max,
            ..self.layout
        };
        layout.validate()?;
        let (weights, centers) = build_weights(&layout);
        self.layout = layout;
        self.weights = weights;
        self.centers = centers;
        debug!(min, max, bands = layout.band_count, "Rebuilt band weights");
        Ok(())
    }

    /// Weighted sum of `spectrum` per band, squared, written into `out`
    pub fn map_into(&self, spectrum: &[f32], out: &mut [f32]) {
        let bins = self.layout.bins;
        for (row, band) in self.weights.chunks_exact(bins).zip(out.iter_mut()) {
            let sum: f32 = row.iter().zip(spectrum).map(|(w, m)| w * m).sum();
            *band = sum * sum;
        }
    }

    /// Allocating variant of [`BandMapper::map_into`]
    pub fn map(&self, spectrum: &[f32]) -> Vec<f32> {
        let mut out = vec![0.0; self.layout.band_count];
        self.map_into(spectrum, &mut out);
        out
    }

    pub fn layout(&self) -> &BandLayout {
        &self.layout
    }

    pub fn band_count(&self) -> usize {
        self.layout.band_count
    }

    /// Weights of one band across all bins
    pub fn row(&self, band: usize) -> &[f32] {
        let bins = self.layout.bins;
        &self.weights[band * bins..(band + 1) * bins]
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn centers(&self) -> &[f32] {
        &self.centers
    }

    pub fn frequency_range(&self) -> (f32, f32) {
        (self.layout.min_frequency, self.layout.max_frequency)
    }
}

fn build_weights(layout: &BandLayout) -> (Vec<f32>, Vec<f32>) {
    let bands = layout.band_count;
    let bins = layout.bins;

    let mel_min = hertz_to_mel(layout.min_frequency);
    let mel_max = hertz_to_mel(layout.max_frequency);
    let delta = (mel_max - mel_min) / (bands + 1) as f32;
    // bands + 2 edges: edge[b], edge[b + 1], edge[b + 2] bound triangle b
    let edges: Vec<f32> = (0..bands + 2).map(|i| mel_min + delta * i as f32).collect();

    let bin_width = layout.sample_rate as f32 / layout.fft_size as f32;
    let bin_mels: Vec<f32> = (0..bins).map(|k| hertz_to_mel(k as f32 * bin_width)).collect();

    let mut weights = vec![0.0; bands * bins];
    for (band, row) in weights.chunks_exact_mut(bins).enumerate() {
        let (lower, center, upper) = (edges[band], edges[band + 1], edges[band + 2]);
        for (w, &m) in row.iter_mut().zip(&bin_mels) {
            if m >= lower && m <= center {
                *w = (m - lower) / (center - lower);
            }
            if m >= center && m <= upper {
                *w = (upper - m) / (upper - center);
            }
        }
    }

    let centers = edges[1..=bands].iter().map(|&m| mel_to_hertz(m)).collect();
    (weights, centers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> BandLayout {
        BandLayout {
            sample_rate: 44100,
            fft_size: 2048,
            bins: 735,
            min_frequency: 200.0,
            max_frequency: 12000.0,
            band_count: 24,
        }
    }

    #[test]
    fn test_mel_roundtrip() {
        for f in [0.0, 200.0, 1000.0, 12000.0] {
            assert!((mel_to_hertz(hertz_to_mel(f)) - f).abs() < 0.05 * f.max(1.0));
        }
    }

    #[test]
    fn test_weights_are_deterministic() {
        let a = BandMapper::new(layout()).unwrap();
        let b = BandMapper::new(layout()).unwrap();
        let bits = |m: &BandMapper| m.weights().iter().map(|w| w.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn test_weights_are_triangular_and_bounded() {
        let mapper = BandMapper::new(layout()).unwrap();
        assert!(mapper.weights().iter().all(|&w| (0.0..=1.0).contains(&w)));
        for band in 0..mapper.band_count() {
            assert!(
                mapper.row(band).iter().any(|&w| w > 0.0),
                "band {} has no support",
                band
            );
        }
    }

    #[test]
    fn test_bands_widen_with_frequency() {
        let mapper = BandMapper::new(layout()).unwrap();
        let support = |band: usize| mapper.row(band).iter().filter(|&&w| w > 0.0).count();
        assert!(support(23) > support(0));
        let c = mapper.centers();
        assert!(c.windows(2).all(|w| w[1] > w[0]));
        assert!(c[1] - c[0] < c[23] - c[22]);
    }

    #[test]
    fn test_map_squares_weighted_sum() {
        let mapper = BandMapper::new(layout()).unwrap();
        let spectrum = vec![1.0; 735];
        let bands = mapper.map(&spectrum);
        for (band, &energy) in bands.iter().enumerate() {
            let sum: f32 = mapper.row(band).iter().sum();
            assert!((energy - sum * sum).abs() <= 1e-3 * energy.max(1.0));
        }
    }

    #[test]
    fn test_rebuild_on_range_change() {
        let mut mapper = BandMapper::new(layout()).unwrap();
        let before = mapper.weights().to_vec();
        mapper.set_frequency_range(100.0, 8000.0).unwrap();
        assert_eq!(mapper.frequency_range(), (100.0, 8000.0));
        assert_ne!(before, mapper.weights());

        let fresh = BandMapper::new(BandLayout {
            min_frequency: 100.0,
            max_frequency: 8000.0,
            ..layout()
        })
        .unwrap();
        assert_eq!(fresh.weights(), mapper.weights());
    }

    #[test]
    fn test_invalid_range_keeps_previous_weights() {
        let mut mapper = BandMapper::new(layout()).unwrap();
        let before = mapper.weights().to_vec();
        let err = mapper.set_frequency_range(5000.0, 1000.0).unwrap_err();
        assert!(matches!(err, BandError::InvalidRange { .. }));
        assert!(mapper.set_frequency_range(100.0, 30000.0).is_err());
        assert!(mapper.set_frequency_range(0.0, 8000.0).is_err());
        assert_eq!(before, mapper.weights());
    }

    #[test]
    fn test_rejects_empty_layouts() {
        assert_eq!(
            BandMapper::new(BandLayout { band_count: 0, ..layout() }).unwrap_err(),
            BandError::NoBands
        );
        assert_eq!(
            BandMapper::new(BandLayout { bins: 0, ..layout() }).unwrap_err(),
            BandError::NoBins
        );
    }
}
