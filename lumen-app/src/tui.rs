//! Terminal debug view loop

use std::io::{self, stdout};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Terminal,
};
use tracing::debug;

use lumen_engine::{Command, DebugFrame};
use lumen_tui::{AppState, BandsWidget, HelpWidget, StatusBarWidget, StripWidget};

/// Frame rate for UI updates
const FPS: u64 = 30;

/// Set up the terminal, run the view until quit, and restore the terminal
pub fn run(
    state: AppState,
    frames: Receiver<DebugFrame>,
    commands: Sender<Command>,
    stream_errors: Receiver<String>,
) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_loop(&mut terminal, state, frames, commands, stream_errors);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut state: AppState,
    frames: Receiver<DebugFrame>,
    commands: Sender<Command>,
    stream_errors: Receiver<String>,
) -> anyhow::Result<()> {
    let frame_duration = Duration::from_millis(1000 / FPS);

    loop {
        if state.should_quit {
            break;
        }

        // Keep only the newest frame
        while let Ok(frame) = frames.try_recv() {
            state.handle_debug_frame(frame);
        }
        while let Ok(err) = stream_errors.try_recv() {
            state.set_message(format!("Audio error: {}", err));
        }

        terminal.draw(|frame| render_ui(frame, &state))?;

        if event::poll(frame_duration)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(command) = state.handle_key(key) {
                    debug!(?command, "Sending command");
                    if commands.try_send(command).is_err() {
                        state.set_message("Visualizer busy, command dropped");
                    }
                }
            }
        }
    }

    Ok(())
}

fn render_ui(frame: &mut ratatui::Frame, state: &AppState) {
    let area = frame.area();
    let theme = &state.theme;

    // Clear with background
    let block = ratatui::widgets::Block::default().style(theme.normal());
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // Title
        Constraint::Min(6),    // Bands
        Constraint::Length(4), // Strip preview
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    let title = Line::from(Span::styled(" LUMEN ", theme.title()));
    frame.render_widget(Paragraph::new(title), chunks[0]);

    let bands = state
        .latest
        .as_ref()
        .map(|f| f.bands.as_slice())
        .unwrap_or(&[]);
    frame.render_widget(
        BandsWidget::new(bands, state.frequency_range, theme),
        chunks[1],
    );
    frame.render_widget(
        StripWidget::new(state.latest.as_ref().map(|f| &f.frame), theme),
        chunks[2],
    );
    frame.render_widget(StatusBarWidget::new(state), chunks[3]);

    if state.show_help {
        frame.render_widget(HelpWidget::new(state), centered_rect(48, 9, area));
    }
}

/// Create a centered rectangle
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
