//! Application model types: `App`, `Screen` and `SessionContext`.
//!
//! The `App` struct holds what the chooser lists, which entry is selected,
//! which screen is active and the notice waiting to be shown.

use std::path::PathBuf;

use crate::library::AudioEntry;
use crate::session::AudioSession;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Chooser,
    Player,
}

/// Which chooser pane receives navigation keys.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Files,
    Sessions,
}

/// What the player screen is opened with: the chosen file and the session as
/// last persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub selected_file: PathBuf,
    pub session: AudioSession,
}

/// The main application model.
#[derive(Debug, Default)]
pub struct App {
    pub screen: Screen,
    pub focus: Focus,

    pub files: Vec<AudioEntry>,
    pub selected_file: usize,

    pub sessions: Vec<AudioSession>,
    pub selected_session: usize,

    pub current_dir: Option<String>,
    /// Message shown in a popup until dismissed.
    pub notice: Option<String>,
}

impl App {
    /// Create a new `App` listing `files`.
    pub fn new(files: Vec<AudioEntry>) -> Self {
        Self {
            files,
            ..Self::default()
        }
    }

    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    /// Replace the file list, keeping the selection in range.
    pub fn set_files(&mut self, files: Vec<AudioEntry>) {
        self.files = files;
        self.selected_file = clamp_selection(self.selected_file, self.files.len());
    }

    /// Replace the stored sessions, keeping the selection in range.
    pub fn set_sessions(&mut self, sessions: Vec<AudioSession>) {
        self.sessions = sessions;
        self.selected_session = clamp_selection(self.selected_session, self.sessions.len());
    }

    /// Switch focus between the file and session panes.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Files => Focus::Sessions,
            Focus::Sessions => Focus::Files,
        };
    }

    /// Move the selection down in the focused pane, wrapping around.
    pub fn next(&mut self) {
        let (selected, len) = self.focused_mut();
        if len > 0 {
            *selected = (*selected + 1) % len;
        }
    }

    /// Move the selection up in the focused pane, wrapping around.
    pub fn prev(&mut self) {
        let (selected, len) = self.focused_mut();
        if len > 0 {
            *selected = if *selected == 0 { len - 1 } else { *selected - 1 };
        }
    }

    pub fn first(&mut self) {
        let (selected, _) = self.focused_mut();
        *selected = 0;
    }

    pub fn last(&mut self) {
        let (selected, len) = self.focused_mut();
        *selected = len.saturating_sub(1);
    }

    /// The file the focused pane points at: a library entry, or the stored
    /// copy behind a session.
    pub fn selected_path(&self) -> Option<PathBuf> {
        match self.focus {
            Focus::Files => self.files.get(self.selected_file).map(|e| e.path.clone()),
            Focus::Sessions => self
                .sessions
                .get(self.selected_session)
                .map(|s| s.file_path.clone()),
        }
    }

    pub fn show_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    /// Clear the notice. Returns whether one was showing.
    pub fn dismiss_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }

    fn focused_mut(&mut self) -> (&mut usize, usize) {
        match self.focus {
            Focus::Files => (&mut self.selected_file, self.files.len()),
            Focus::Sessions => (&mut self.selected_session, self.sessions.len()),
        }
    }
}

fn clamp_selection(selected: usize, len: usize) -> usize {
    selected.min(len.saturating_sub(1))
}
