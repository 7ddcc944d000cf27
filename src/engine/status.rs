use std::fmt;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// What the player screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub state: PlaybackState,
    /// Last sampled position in seconds.
    pub position: f64,
    /// Total length in seconds, `0.0` when unknown.
    pub length: f64,
    pub elapsed: String,
    pub total: String,
    /// `index/count-1`.
    pub bookmark_label: String,
    /// Whether pausing is currently meaningful.
    pub pause_enabled: bool,
}

impl Status {
    /// Progress as a ratio in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        if self.length > 0.0 {
            (self.position / self.length).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// A recoverable condition to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    DuplicateBookmark,
    FirstBookmarkProtected,
    StatsImported,
    LoadFailed(String),
    Saved,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::DuplicateBookmark => {
                f.write_str("Time stamp already exists. You can't add it again.")
            }
            Notice::FirstBookmarkProtected => f.write_str("The first time stamp cannot be removed."),
            Notice::StatsImported => {
                f.write_str("Audio already exists in the database and stats will be imported.")
            }
            Notice::LoadFailed(reason) => write!(f, "Could not load sound: {reason}"),
            Notice::Saved => f.write_str("Session saved."),
        }
    }
}

/// Seconds as `mm:ss`. Minutes are not wrapped into hours.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}
