//! FFT-based magnitude spectrum of the rolling sample window

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

/// Windowed, zero-padded FFT magnitude analyzer
///
/// The Hamming window is computed once for the configured input length and
/// reused every frame. Input is padded to the next power of two; only the
/// first `input_len / 2` magnitudes are kept.
pub struct SpectrumAnalyzer {
    input_len: usize,
    fft_size: usize,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    /// Pre-allocated FFT buffer to avoid allocation in analyze()
    fft_buffer: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
}

impl SpectrumAnalyzer {
    /// Create an analyzer for inputs of exactly `input_len` samples
    pub fn new(input_len: usize) -> Self {
        let fft_size = input_len.next_power_of_two();
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        Self {
            input_len,
            fft_size,
            fft,
            window: hamming(input_len),
            fft_buffer: vec![Complex::new(0.0, 0.0); fft_size],
            magnitudes: vec![0.0; input_len / 2],
        }
    }

    /// Length of the transform after zero padding
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of magnitudes produced per frame
    pub fn bins(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn input_len(&self) -> usize {
        self.input_len
    }

    /// Analyze `samples` and return the one-sided magnitude spectrum
    ///
    /// Samples beyond `input_len` are ignored; a shorter input is treated as
    /// if the remainder were zero.
    pub fn analyze(&mut self, samples: &[f32]) -> &[f32] {
        let sample_count = samples.len().min(self.input_len);
        for (slot, (&sample, &w)) in self
            .fft_buffer
            .iter_mut()
            .zip(samples.iter().zip(self.window.iter()))
            .take(sample_count)
        {
            *slot = Complex::new(sample * w, 0.0);
        }
        // Zero pad up to the power-of-two transform length
        for slot in self.fft_buffer.iter_mut().skip(sample_count) {
            *slot = Complex::new(0.0, 0.0);
        }

        self.fft.process(&mut self.fft_buffer);

        for (mag, bin) in self.magnitudes.iter_mut().zip(self.fft_buffer.iter()) {
            *mag = bin.norm();
        }

        &self.magnitudes
    }
}

/// Symmetric Hamming window of length `len`
fn hamming(len: usize) -> Vec<f32> {
    if len <= 1 {
        return vec![1.0; len];
    }
    let denom = (len - 1) as f32;
    (0..len)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f32 / denom).cos())
        .collect()
}
