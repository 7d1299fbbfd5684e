//! Debug view state

use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lumen_engine::{Command, DebugFrame};
use lumen_fx::EffectKind;

/// Relative change of a frequency bound per key press
pub const FREQUENCY_STEP: f32 = 1.1;

/// Lowest minimum frequency reachable from the keyboard
pub const MIN_FREQUENCY_FLOOR: f32 = 20.0;

/// Everything the debug view renders
#[derive(Debug, Clone)]
pub struct AppState {
    /// Most recent frame from the visualizer
    pub latest: Option<DebugFrame>,
    /// Frames received since start
    pub frames_seen: u64,
    /// Frequency range last requested (or reported)
    pub frequency_range: (f32, f32),
    /// Highest frequency the band mapper accepts
    pub nyquist: f32,
    pub theme: Theme,
    pub message: Option<String>,
    pub show_help: bool,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(frequency_range: (f32, f32), sample_rate: u32) -> Self {
        Self {
            latest: None,
            frames_seen: 0,
            frequency_range,
            nyquist: sample_rate as f32 / 2.0,
            theme: Theme::default(),
            message: None,
            show_help: false,
            should_quit: false,
        }
    }

    /// Store a frame received from the visualizer
    pub fn handle_debug_frame(&mut self, frame: DebugFrame) {
        self.frequency_range = frame.frequency_range;
        self.frames_seen += 1;
        self.latest = Some(frame);
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    /// Map a key press to a visualizer command, updating local state
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('?') => {
                self.show_help = !self.show_help;
                None
            }
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                let kind = EffectKind::ALL[index];
                self.set_message(format!("Effect: {}", kind));
                Some(Command::SetEffect(kind))
            }
            KeyCode::Tab => {
                self.set_message("Next effect");
                Some(Command::NextEffect)
            }
            KeyCode::Char('[') => self.adjust_range(1.0 / FREQUENCY_STEP, 1.0),
            KeyCode::Char(']') => self.adjust_range(FREQUENCY_STEP, 1.0),
            KeyCode::Char('{') => self.adjust_range(1.0, 1.0 / FREQUENCY_STEP),
            KeyCode::Char('}') => self.adjust_range(1.0, FREQUENCY_STEP),
            KeyCode::Char('t') => {
                self.theme = if self.theme.name == "amber" {
                    Theme::default()
                } else {
                    crate::theme::CRT_AMBER
                };
                None
            }
            _ => None,
        }
    }

    /// Scale the range bounds, refusing changes that would invert or leave it
    fn adjust_range(&mut self, min_factor: f32, max_factor: f32) -> Option<Command> {
        let (min, max) = self.frequency_range;
        let new_min = (min * min_factor).max(MIN_FREQUENCY_FLOOR);
        let new_max = (max * max_factor).min(self.nyquist);
        if new_min >= new_max || (new_min == min && new_max == max) {
            self.set_message(format!("Range stays {:.0} - {:.0} Hz", min, max));
            return None;
        }
        self.frequency_range = (new_min, new_max);
        self.set_message(format!("Range {:.0} - {:.0} Hz", new_min, new_max));
        Some(Command::SetFrequencyRange {
            min: new_min,
            max: new_max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(state: &mut AppState, code: KeyCode) -> Option<Command> {
        state.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_number_keys_select_effects() {
        let mut state = AppState::new((200.0, 12000.0), 44100);
        assert_eq!(
            press(&mut state, KeyCode::Char('1')),
            Some(Command::SetEffect(EffectKind::Scroll))
        );
        assert_eq!(
            press(&mut state, KeyCode::Char('4')),
            Some(Command::SetEffect(EffectKind::Pump))
        );
        assert_eq!(press(&mut state, KeyCode::Char('5')), None);
        assert_eq!(press(&mut state, KeyCode::Tab), Some(Command::NextEffect));
    }

    #[test]
    fn test_range_keys() {
        let mut state = AppState::new((200.0, 12000.0), 44100);
        match press(&mut state, KeyCode::Char(']')) {
            Some(Command::SetFrequencyRange { min, max }) => {
                assert!((min - 220.0).abs() < 1e-3);
                assert_eq!(max, 12000.0);
            }
            other => panic!("unexpected {:?}", other),
        }

        // Max is capped at Nyquist
        for _ in 0..20 {
            press(&mut state, KeyCode::Char('}'));
        }
        assert_eq!(state.frequency_range.1, 22050.0);
        assert_eq!(press(&mut state, KeyCode::Char('}')), None);
    }

    #[test]
    fn test_range_never_inverts() {
        let mut state = AppState::new((1000.0, 1050.0), 44100);
        assert_eq!(press(&mut state, KeyCode::Char(']')), None);
        assert_eq!(state.frequency_range, (1000.0, 1050.0));
        assert!(state.message.is_some());
    }

    #[test]
    fn test_quit_keys() {
        let mut state = AppState::new((200.0, 12000.0), 44100);
        state.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(state.should_quit);

        let mut state = AppState::new((200.0, 12000.0), 44100);
        press(&mut state, KeyCode::Char('q'));
        assert!(state.should_quit);
    }
}
