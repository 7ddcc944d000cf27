//! Bookmark track: the ordered set of time stamps for one audio session.
//!
//! Positions are seconds (`f64`). Two positions are the same bookmark when
//! their whole-second parts match, so the track never holds `1.2` and `1.7`
//! at the same time. The track always has at least one entry.

use crate::error::{Error, Result};

#[cfg(test)]
mod tests;

/// Whole-second key used for bookmark equality.
fn second_of(position: f64) -> i64 {
    position.trunc() as i64
}

/// Ordered, deduplicated bookmark positions with a clamped cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampTrack {
    stamps: Vec<f64>,
    index: usize,
}

impl Default for TimestampTrack {
    fn default() -> Self {
        Self {
            stamps: vec![0.0],
            index: 0,
        }
    }
}

impl TimestampTrack {
    /// Build a track from stored positions.
    ///
    /// The input is sorted and deduplicated by whole second (first wins), an
    /// empty input becomes `[0]`, and the cursor starts on the last entry so
    /// playback resumes from the most recent bookmark.
    pub fn new(stamps: impl IntoIterator<Item = f64>) -> Self {
        let mut stamps: Vec<f64> = stamps.into_iter().filter(|p| p.is_finite()).collect();
        stamps.sort_by(f64::total_cmp);
        stamps.dedup_by(|next, kept| second_of(*next) == second_of(*kept));

        if stamps.is_empty() {
            return Self::default();
        }

        let index = stamps.len() - 1;
        Self { stamps, index }
    }

    pub fn stamps(&self) -> &[f64] {
        &self.stamps
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Move the cursor to `value`, clamped to `[0, len - 1]`.
    pub fn set_index(&mut self, value: isize) {
        let last = self.stamps.len().saturating_sub(1);
        self.index = if value < 0 {
            0
        } else {
            (value as usize).min(last)
        };
    }

    /// Move the cursor by `delta` entries, clamped.
    pub fn shift(&mut self, delta: isize) {
        self.set_index(self.index as isize + delta);
    }

    /// Position under the cursor.
    pub fn stamp(&self) -> f64 {
        self.stamps.get(self.index).copied().unwrap_or(0.0)
    }

    /// Insert `position` in order and move the cursor onto it.
    ///
    /// Returns `false` without touching the track when a bookmark with the
    /// same whole second already exists.
    pub fn add(&mut self, position: f64) -> bool {
        if !position.is_finite() {
            return false;
        }

        let key = second_of(position);
        match self.stamps.binary_search_by(|s| second_of(*s).cmp(&key)) {
            Ok(_) => false,
            Err(at) => {
                self.stamps.insert(at, position);
                self.index = at;
                true
            }
        }
    }

    /// Bounds of the segment under the cursor.
    ///
    /// `end` is `None` on the last bookmark: playback runs to the end of the
    /// audio. A single-entry track always yields `(0, None)`.
    pub fn range(&self) -> (f64, Option<f64>) {
        if self.stamps.len() <= 1 {
            return (0.0, None);
        }
        (self.stamp(), self.stamps.get(self.index + 1).copied())
    }

    /// Remove the bookmark under the cursor and return it.
    ///
    /// The first bookmark is protected.
    pub fn remove(&mut self) -> Result<f64> {
        if self.index == 0 {
            return Err(Error::InvalidRemoval);
        }

        let removed = self.stamps.remove(self.index);
        self.set_index(self.index as isize);
        Ok(removed)
    }

    /// Index of the last bookmark at or before `position` (0 when none).
    pub fn segment_at(&self, position: f64) -> usize {
        self.stamps
            .partition_point(|s| *s <= position)
            .saturating_sub(1)
    }

    /// Label shown next to the progress bar: `index/count-1`.
    pub fn label(&self) -> String {
        format!("{}/{}", self.index, self.stamps.len().saturating_sub(1))
    }
}
