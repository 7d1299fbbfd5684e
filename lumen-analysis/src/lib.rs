//! Audio analysis for Lumen
//!
//! Turns a rolling window of audio samples into smoothed, gain-normalized
//! perceptual band energies: windowed FFT, mel-warped filterbank, and the
//! asymmetric exponential smoother used throughout the pipeline.

mod blur;
mod gain;
mod melbank;
mod smoother;
mod spectrum;
mod window;

pub use blur::{gaussian_filter1d, gaussian_filter1d_in_place};
pub use gain::GainNormalizer;
pub use melbank::{hertz_to_mel, mel_to_hertz, BandError, BandLayout, BandMapper};
pub use smoother::{AdaptiveSmoother, Coefficients};
pub use spectrum::SpectrumAnalyzer;
pub use window::SampleWindow;
