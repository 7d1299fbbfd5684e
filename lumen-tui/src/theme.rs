//! CRT-style themes for the debug view

use lumen_engine::Mode;
use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    /// Primary foreground color (text, borders)
    pub fg: Color,
    /// Dimmed foreground (secondary text)
    pub fg_dim: Color,
    /// Background color
    pub bg: Color,
    /// Highlight color (titles, active elements)
    pub highlight: Color,
    /// Accent color (mid bands)
    pub accent: Color,
    /// Warning color
    pub warning: Color,
    /// Low band color
    pub low: Color,
    /// High band color
    pub high: Color,
}

impl Theme {
    /// Get style for normal text
    pub fn normal(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Get style for dimmed text
    pub fn dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    /// Get style for highlighted items
    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for borders
    pub fn border(&self) -> Style {
        Style::default().fg(self.fg_dim)
    }

    /// Get title style
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for band bars based on band index
    pub fn band_style(&self, band: usize, total_bands: usize) -> Style {
        // Color gradient: bass (warm) -> treble (cool)
        let ratio = band as f32 / total_bands.max(1) as f32;
        let color = if ratio < 0.33 {
            self.low
        } else if ratio < 0.66 {
            self.accent
        } else {
            self.high
        };
        Style::default().fg(color)
    }

    /// Get style for the mode indicator
    pub fn mode_style(&self, mode: Mode) -> Style {
        match mode {
            Mode::Active => self.highlight(),
            Mode::Idle => Style::default()
                .fg(self.bg)
                .bg(self.warning)
                .add_modifier(Modifier::BOLD),
        }
    }
}

/// Classic phosphor green CRT theme
pub const CRT_GREEN: Theme = Theme {
    name: "phosphor-green",
    fg: Color::Rgb(51, 255, 51),          // #33ff33 - phosphor green
    fg_dim: Color::Rgb(25, 128, 25),      // dimmed green
    bg: Color::Rgb(0, 10, 0),             // near black with green tint
    highlight: Color::Rgb(180, 255, 180), // bright green
    accent: Color::Rgb(100, 255, 100),    // medium green
    warning: Color::Rgb(255, 255, 100),   // yellow-green
    low: Color::Rgb(100, 255, 150),       // green-cyan
    high: Color::Rgb(150, 255, 100),      // yellow-green
};

/// Amber CRT theme (1980s monochrome)
pub const CRT_AMBER: Theme = Theme {
    name: "amber",
    fg: Color::Rgb(255, 176, 0),          // #ffb000 - amber
    fg_dim: Color::Rgb(128, 88, 0),       // dimmed amber
    bg: Color::Rgb(10, 5, 0),             // near black with amber tint
    highlight: Color::Rgb(255, 220, 128), // bright amber
    accent: Color::Rgb(255, 200, 64),     // medium amber
    warning: Color::Rgb(255, 255, 100),   // yellow
    low: Color::Rgb(255, 180, 50),        // orange-amber
    high: Color::Rgb(255, 220, 100),      // yellow-amber
};

impl Default for Theme {
    fn default() -> Self {
        CRT_GREEN
    }
}
