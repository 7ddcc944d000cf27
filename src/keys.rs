//! Player screen key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::ControlsSettings;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    Reverse,
    Next,
    Play,
    SetBookmark,
    Pause,
    RemoveBookmark,
    SeekBack,
    SeekForward,
    Save,
    Back,
    Quit,
}

/// Key to action table, installed when the player screen is entered.
#[derive(Debug, Clone)]
pub struct Keymap {
    remove: char,
}

impl Default for Keymap {
    fn default() -> Self {
        Self { remove: 'x' }
    }
}

impl Keymap {
    pub fn new(remove: char) -> Self {
        Self { remove }
    }

    /// Settings are validated on load; a bad key falls back to the default.
    pub fn from_settings(controls: &ControlsSettings) -> Self {
        controls.remove_key().map(Self::new).unwrap_or_default()
    }

    pub fn action(&self, key: KeyEvent) -> Option<PlayerAction> {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return None;
        }
        let action = match key.code {
            KeyCode::Left => PlayerAction::Reverse,
            KeyCode::Right => PlayerAction::Next,
            KeyCode::Up => PlayerAction::Play,
            KeyCode::Down => PlayerAction::SetBookmark,
            KeyCode::Char(' ') => PlayerAction::Pause,
            KeyCode::Char(c) if c == self.remove => PlayerAction::RemoveBookmark,
            KeyCode::Char('H') => PlayerAction::SeekBack,
            KeyCode::Char('L') => PlayerAction::SeekForward,
            KeyCode::Char('s') => PlayerAction::Save,
            KeyCode::Esc | KeyCode::Char('b') => PlayerAction::Back,
            KeyCode::Char('q') => PlayerAction::Quit,
            _ => return None,
        };
        Some(action)
    }

    /// Footer help, in display order.
    pub fn help(&self, seek_seconds: u64) -> String {
        [
            "[←/→] prev/next bookmark".to_string(),
            "[↑] play".to_string(),
            "[space] pause".to_string(),
            "[↓] bookmark".to_string(),
            format!("[{}] remove bookmark", self.remove),
            format!("[H/L] seek -/+{seek_seconds}s"),
            "[s] save".to_string(),
            "[esc/b] back".to_string(),
            "[q] quit".to_string(),
        ]
        .join(" | ")
    }
}
