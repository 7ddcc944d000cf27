use std::path::PathBuf;
use std::time::Duration;

use crate::engine::format_time;

/// One selectable audio file.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioEntry {
    pub path: PathBuf,
    /// File name, which is also the session's lookup key.
    pub name: String,
    pub duration: Option<Duration>,
}

impl AudioEntry {
    /// `mm:ss`, or `--:--` when the length could not be probed.
    pub fn duration_label(&self) -> String {
        match self.duration {
            Some(d) if !d.is_zero() => format_time(d.as_secs_f64()),
            _ => "--:--".to_string(),
        }
    }
}
