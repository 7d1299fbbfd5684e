//! Status bar and help overlay

use crate::app::AppState;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// One-line summary of the visualizer state
pub struct StatusBarWidget<'a> {
    state: &'a AppState,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Text after the mode indicator
    pub(crate) fn summary(state: &AppState) -> String {
        let Some(frame) = state.latest.as_ref() else {
            return "waiting for audio...".to_string();
        };
        let source = match frame.idle {
            Some(pattern) => format!("idle {}", pattern),
            None => format!("effect {}", frame.effect),
        };
        format!(
            "{} | {:.0} fps | gain {:.3e} | {:.0}-{:.0} Hz",
            source, frame.fps, frame.gain, frame.frequency_range.0, frame.frequency_range.1
        )
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }
        let theme = &self.state.theme;

        let chunks = Layout::horizontal([
            Constraint::Length(8),  // Mode indicator
            Constraint::Min(20),    // Summary / message
            Constraint::Length(12), // Help hint
        ])
        .split(area);

        let (mode, mode_style) = match self.state.latest.as_ref() {
            Some(frame) => (frame.mode.to_string(), theme.mode_style(frame.mode)),
            None => ("--".to_string(), theme.dim()),
        };
        Paragraph::new(Span::styled(format!(" {:<6}", mode), mode_style)).render(chunks[0], buf);

        let text = match self.state.message.as_deref() {
            Some(msg) => format!(" {} | {}", Self::summary(self.state), msg),
            None => format!(" {}", Self::summary(self.state)),
        };
        Paragraph::new(Span::styled(text, theme.normal())).render(chunks[1], buf);

        Paragraph::new(Span::styled(" ? help q quit", theme.dim())).render(chunks[2], buf);
    }
}

/// Key reference overlay
pub struct HelpWidget<'a> {
    state: &'a AppState,
}

impl<'a> HelpWidget<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }
}

impl Widget for HelpWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = &self.state.theme;
        let keys = [
            ("1-4", "scroll / energy / spectrum / pump"),
            ("Tab", "next effect"),
            ("[ ]", "lower / raise min frequency"),
            ("{ }", "lower / raise max frequency"),
            ("t", "toggle theme"),
            ("?", "close help"),
            ("q", "quit"),
        ];
        let lines: Vec<Line> = keys
            .iter()
            .map(|(key, what)| {
                Line::from(vec![
                    Span::styled(format!(" {:<5}", key), theme.title()),
                    Span::styled(*what, theme.normal()),
                ])
            })
            .collect();

        Clear.render(area, buf);
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border())
                    .title(Span::styled(" HELP ", theme.title())),
            )
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_engine::{DebugFrame, Mode};
    use lumen_fx::{EffectKind, IdleKind, PixelFrame};

    fn debug_frame(idle: Option<IdleKind>) -> DebugFrame {
        DebugFrame {
            mode: if idle.is_some() { Mode::Idle } else { Mode::Active },
            effect: EffectKind::Energy,
            idle,
            bands: vec![0.0; 4],
            frame: PixelFrame::new(4),
            fps: 59.6,
            gain: 0.5,
            frequency_range: (200.0, 12000.0),
        }
    }

    #[test]
    fn test_summary_names_source() {
        let mut state = AppState::new((200.0, 12000.0), 44100);
        assert_eq!(StatusBarWidget::summary(&state), "waiting for audio...");

        state.handle_debug_frame(debug_frame(None));
        let summary = StatusBarWidget::summary(&state);
        assert!(summary.starts_with("effect energy | 60 fps"), "{}", summary);

        state.handle_debug_frame(debug_frame(Some(IdleKind::CenterScroll)));
        assert!(StatusBarWidget::summary(&state).starts_with("idle center_scroll"));
        assert_eq!(state.frames_seen, 2);
    }
}
