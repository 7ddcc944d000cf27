use std::path::PathBuf;

use tracing::warn;

use super::diff::{self, SessionDiff};
use super::store::Record;

/// One audio file's bookmarks and listening statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSession {
    /// Store id, `None` until the session has been persisted.
    pub id: Option<i64>,
    /// Display name, the audio file's name.
    pub name: String,
    pub file_path: PathBuf,
    /// Bookmark positions in seconds.
    pub time_stamp: Vec<f64>,
    /// Audio length in whole seconds.
    pub duration: u64,
    /// Seconds spent listening.
    pub spend_time: u64,
    /// How many times playback reached the end of the audio.
    pub finished_times: u32,
}

impl AudioSession {
    /// A fresh, unsaved session with no bookmarks and zeroed counters.
    pub fn new(name: impl Into<String>, file_path: impl Into<PathBuf>) -> Self {
        Self {
            id: None,
            name: name.into(),
            file_path: file_path.into(),
            time_stamp: Vec::new(),
            duration: 0,
            spend_time: 0,
            finished_times: 0,
        }
    }

    /// Bookmarks in their stored form, e.g. `"0,12.5,30.25"`.
    pub fn time_stamp_text(&self) -> String {
        format_time_stamps(&self.time_stamp)
    }

    /// Fields of `other` that differ from `self`, keyed by store column.
    pub fn diff(&self, other: &AudioSession) -> SessionDiff {
        diff::diff(self, other)
    }
}

impl From<Record> for AudioSession {
    fn from(record: Record) -> Self {
        Self {
            id: Some(record.id),
            name: record.name,
            file_path: PathBuf::from(record.file_path),
            time_stamp: parse_time_stamps(&record.time_stamp),
            duration: record.duration.max(0) as u64,
            spend_time: record.spend_time.max(0) as u64,
            finished_times: record.finished_times.clamp(0, u32::MAX as i64) as u32,
        }
    }
}

/// Join bookmark positions with commas.
pub fn format_time_stamps(stamps: &[f64]) -> String {
    stamps
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<String>>()
        .join(",")
}

/// Parse a comma separated bookmark list, skipping entries that are not numbers.
pub fn parse_time_stamps(text: &str) -> Vec<f64> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                warn!("ignoring malformed time stamp {s:?}");
                None
            }
        })
        .collect()
}
