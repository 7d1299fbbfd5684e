//! Pixel effects for Lumen
//!
//! Provides the frame types and every pattern generator driven by the
//! visualizer:
//! - Effects: map a band-energy vector to a frame (scroll, energy, spectrum, pump)
//! - Idle: ambient animations played when there is no audio (rainbow wipe, center scroll)
//! - Interpolation: resize band vectors to the strip length

mod effects;
mod error;
mod frame;
mod idle;
mod interpolate;
mod rng;

pub use effects::{
    Effect, EffectEngine, EffectKind, EnergyEffect, PumpEffect, ScrollEffect, SpectrumEffect,
};
pub use error::FxError;
pub use frame::{ChannelBuffer, PixelFrame, Rgb};
pub use idle::{
    CenterScroll, IdleAnimator, IdleKind, IdlePattern, IdleStep, RainbowWipe, RAINBOW,
};
pub use interpolate::Resizer;
pub use rng::Xorshift64;
