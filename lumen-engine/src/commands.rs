//! Runtime commands applied between chunks

use lumen_fx::EffectKind;

/// Commands sent to a running visualizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Make an effect current (its state is reset)
    SetEffect(EffectKind),
    /// Cycle to the following effect
    NextEffect,
    /// Change the analysed band range; rebuilds the band weights
    SetFrequencyRange { min: f32, max: f32 },
}
