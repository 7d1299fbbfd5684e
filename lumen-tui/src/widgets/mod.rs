//! Widgets for the debug view

mod bands;
mod status_bar;
mod strip;

pub use bands::BandsWidget;
pub use status_bar::{HelpWidget, StatusBarWidget};
pub use strip::StripWidget;
