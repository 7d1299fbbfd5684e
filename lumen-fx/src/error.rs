//! Error types for effect and idle pattern selection

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FxError {
    #[error("Unknown effect '{0}' (expected scroll, energy, spectrum or pump)")]
    UnknownEffect(String),
    #[error("Unknown idle pattern '{0}' (expected rainbow_wipe or center_scroll)")]
    UnknownIdlePattern(String),
    #[error("Idle pattern set is empty")]
    NoIdlePatterns,
}
