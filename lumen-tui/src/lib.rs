//! Terminal debug view for Lumen
//!
//! Read-only view of what the visualizer is doing: band energies, a preview
//! of the LED strip, and the current mode / effect / frame rate. Key presses
//! become runtime commands for the visualizer.

mod app;
mod theme;
pub mod widgets;

pub use app::{AppState, FREQUENCY_STEP, MIN_FREQUENCY_FLOOR};
pub use theme::{Theme, CRT_AMBER, CRT_GREEN};
pub use widgets::{BandsWidget, HelpWidget, StatusBarWidget, StripWidget};
