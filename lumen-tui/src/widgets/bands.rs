//! Band energy widget - one vertical bar per mel band

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Span,
    widgets::{Block, Borders, Widget},
};

/// Characters for vertical bar rendering (8 levels)
const BAR_CHARS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Widget for displaying smoothed band energies
pub struct BandsWidget<'a> {
    bands: &'a [f32],
    frequency_range: (f32, f32),
    theme: &'a Theme,
}

impl<'a> BandsWidget<'a> {
    pub fn new(bands: &'a [f32], frequency_range: (f32, f32), theme: &'a Theme) -> Self {
        Self {
            bands,
            frequency_range,
            theme,
        }
    }

    /// Bar cells from bottom to top for a level in `0.0..=1.0`
    pub(crate) fn render_bar(level: f32, height: u16) -> Vec<char> {
        let level = if level.is_finite() { level } else { 0.0 };
        let total_levels = (level.clamp(0.0, 1.0) * 8.0 * height as f32) as usize;
        let full_blocks = total_levels / 8;
        let partial = total_levels % 8;

        (0..height as usize)
            .map(|row| {
                if row < full_blocks {
                    '█'
                } else if row == full_blocks && partial > 0 {
                    BAR_CHARS[partial]
                } else {
                    ' '
                }
            })
            .collect()
    }
}

impl Widget for BandsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(
            " BANDS {:.0}-{:.0} Hz ",
            self.frequency_range.0, self.frequency_range.1
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border())
            .title(Span::styled(title, self.theme.title()));

        let inner = block.inner(area);
        block.render(area, buf);

        let count = self.bands.len();
        if inner.height < 1 || inner.width == 0 || count == 0 {
            return;
        }

        let width = inner.width as usize;
        let height = inner.height;
        // Normalized bands hover around 1 at the running peak
        let bars = width.min(count);
        let bar_width = (width / bars).max(1);
        let start_x = (width - bars * bar_width) / 2;

        for bar in 0..bars {
            let band = bar * count / bars;
            let cells = Self::render_bar(self.bands[band], height);
            let style = self.theme.band_style(band, count);

            for col in 0..bar_width.saturating_sub(usize::from(bar_width > 2)) {
                let x = inner.x + (start_x + bar * bar_width + col) as u16;
                for (row, &ch) in cells.iter().enumerate() {
                    if ch == ' ' {
                        continue;
                    }
                    let y = inner.y + height - 1 - row as u16;
                    buf[(x, y)].set_char(ch).set_style(style);
                }
            }
        }
    }
}
