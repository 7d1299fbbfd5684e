//! Error types for configuration, output and per-chunk processing

use lumen_analysis::BandError;
use lumen_fx::FxError;
use std::io;
use thiserror::Error;

/// Errors raised while loading or validating a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Line {line}: invalid value '{value}' for '{key}'")]
    Parse {
        line: usize,
        key: String,
        value: String,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised by frame sinks
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Strip has {count} pixels but packet indices address at most {max}")]
    TooManyPixels { count: usize, max: usize },
    #[error("No address found for {0}")]
    Unresolved(String),
}

/// Errors raised while building or driving a [`crate::Visualizer`]
#[derive(Error, Debug)]
pub enum VisualizerError {
    #[error("Chunk length mismatch: expected {expected} samples, got {actual}")]
    ChunkLength { expected: usize, actual: usize },
    #[error("Non-finite sample at index {index}")]
    NonFiniteSample { index: usize },
    #[error("Sample {value} at index {index} is outside the accepted amplitude range")]
    SampleOutOfRange { index: usize, value: f32 },
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Band layout error: {0}")]
    Band(#[from] BandError),
    #[error("Pattern error: {0}")]
    Fx(#[from] FxError),
}
