//! LED strip preview - each pixel drawn in its own color

use crate::theme::Theme;
use lumen_fx::PixelFrame;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Span,
    widgets::{Block, Borders, Widget},
};

/// Widget previewing a [`PixelFrame`]
pub struct StripWidget<'a> {
    frame: Option<&'a PixelFrame>,
    theme: &'a Theme,
}

impl<'a> StripWidget<'a> {
    pub fn new(frame: Option<&'a PixelFrame>, theme: &'a Theme) -> Self {
        Self { frame, theme }
    }

    /// Pixel shown in terminal column `col` of `width`
    fn pixel_for_column(col: usize, width: usize, pixels: usize) -> usize {
        (col * pixels / width.max(1)).min(pixels.saturating_sub(1))
    }
}

impl Widget for StripWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border())
            .title(Span::styled(" STRIP ", self.theme.title()));

        let inner = block.inner(area);
        block.render(area, buf);

        let Some(frame) = self.frame else {
            return;
        };
        let pixels = frame.pixel_count();
        if pixels == 0 || inner.width == 0 || inner.height == 0 {
            return;
        }

        let width = inner.width as usize;
        for col in 0..width {
            let Some([r, g, b]) = frame.get(Self::pixel_for_column(col, width, pixels)) else {
                continue;
            };
            let style = Style::default().fg(Color::Rgb(r, g, b));
            for row in 0..inner.height {
                buf[(inner.x + col as u16, inner.y + row)]
                    .set_char('█')
                    .set_style(style);
            }
        }
    }
}
