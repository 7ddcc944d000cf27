//! Bookmark-driven playback.
//!
//! [`NavigationEngine`] ties one session's [`TimestampTrack`] to one
//! [`PlaybackController`] and drives both from timers registered on a
//! [`Scheduler`]. The owner calls [`NavigationEngine::pump`] from its event
//! loop; every handler runs on that thread.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::{debug, info};

use crate::audio::{PlaybackController, Sound};
use crate::bookmarks::TimestampTrack;
use crate::config::PlaybackSettings;
use crate::schedule::{Scheduler, Tick, TimerHandle};
use crate::session::AudioSession;

mod status;

pub use status::{Notice, PlaybackState, Status, format_time};


/// Timer periods.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TickIntervals {
    pub progress: Duration,
    pub duration: Duration,
    pub boundary: Duration,
}

impl Default for TickIntervals {
    fn default() -> Self {
        Self {
            progress: Duration::from_millis(100),
            duration: Duration::from_secs(1),
            boundary: Duration::from_millis(100),
        }
    }
}

impl From<&PlaybackSettings> for TickIntervals {
    fn from(s: &PlaybackSettings) -> Self {
        Self {
            progress: Duration::from_millis(s.progress_interval_ms),
            duration: Duration::from_millis(s.duration_interval_ms),
            boundary: Duration::from_millis(s.boundary_interval_ms),
        }
    }
}

#[derive(Debug, Default)]
struct Timers {
    progress: Option<TimerHandle>,
    duration: Option<TimerHandle>,
    /// The watch and the segment end it was armed with.
    boundary: Option<(TimerHandle, f64)>,
}

type LabelHook = Box<dyn FnMut(usize, usize)>;

pub struct NavigationEngine<S: Sound, C: Scheduler> {
    session: AudioSession,
    track: TimestampTrack,
    player: Option<PlaybackController<S>>,
    clock: C,
    intervals: TickIntervals,
    timers: Timers,
    state: PlaybackState,
    pause_enabled: bool,
    progress: f64,
    notices: VecDeque<Notice>,
    on_label: Option<LabelHook>,
    /// Listening time not yet counted into `spend_time`, in seconds.
    listened: f64,
}

impl<S: Sound, C: Scheduler> NavigationEngine<S, C> {
    /// Build the engine for `session` around an already opened sound.
    ///
    /// The cursor starts on the last bookmark and playback resumes there.
    pub fn new(mut session: AudioSession, sound: S, clock: C, intervals: TickIntervals) -> Self {
        let track = TimestampTrack::new(session.time_stamp.iter().copied());
        let resume = track.stamp();
        let player = PlaybackController::new(sound, resume);
        session.duration = player.length() as u64;

        debug!(
            session = %session.name,
            bookmarks = track.len(),
            resume,
            "navigation engine ready"
        );

        Self {
            session,
            track,
            player: Some(player),
            clock,
            intervals,
            timers: Timers::default(),
            state: PlaybackState::Stopped,
            pause_enabled: false,
            progress: resume,
            notices: VecDeque::new(),
            on_label: None,
            listened: 0.0,
        }
    }

    /// Register the hook called with `(index, count)` after every mutation.
    pub fn on_label_change(&mut self, hook: impl FnMut(usize, usize) + 'static) {
        self.on_label = Some(Box::new(hook));
        self.notify_label();
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn track(&self) -> &TimestampTrack {
        &self.track
    }

    pub fn session(&self) -> &AudioSession {
        &self.session
    }

    pub fn is_loaded(&self) -> bool {
        self.player.is_some()
    }

    /// Start or resume playback.
    pub fn play(&mut self) {
        if self.state == PlaybackState::Playing {
            return;
        }
        let start = self.track.range().0;
        let Some(player) = self.player.as_mut() else {
            return;
        };

        let length = player.length();
        if length > 0.0 && player.current_position() >= length {
            debug!("at the end of the audio, restarting the segment at {start:.2}");
            player.set_current_position(start);
        }
        player.play();

        self.state = PlaybackState::Playing;
        self.pause_enabled = true;
        self.start_ticks();
        self.rearm_boundary();
        debug!(index = self.track.index(), "playing");
        self.notify_label();
    }

    /// Queue a notice for the owner to show.
    pub fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    /// Capture the position and stop every timer.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let Some(player) = self.player.as_mut() else {
            return;
        };
        player.pause();
        self.progress = player.current_position();

        self.state = PlaybackState::Paused;
        self.pause_enabled = false;
        self.cancel_all();
        debug!(position = self.progress, "paused");
        self.notify_label();
    }

    pub fn toggle(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            _ => self.play(),
        }
    }

    /// Bookmark the live position, then pause.
    pub fn set_bookmark(&mut self) {
        let Some(position) = self.playhead() else {
            return;
        };
        if self.track.add(position) {
            debug!(position, index = self.track.index(), "bookmark added");
        } else {
            self.notices.push_back(Notice::DuplicateBookmark);
        }
        self.pause();
        self.notify_label();
    }

    /// Move the cursor by `direction` and replay from the new segment start.
    pub fn navigate(&mut self, direction: isize) {
        if self.player.is_none() {
            return;
        }
        self.track.shift(direction);
        self.halt();
        let start = self.rearm_boundary();
        if let Some(player) = self.player.as_mut() {
            player.set_current_position(start);
        }
        self.play();
        self.notify_label();
    }

    pub fn next(&mut self) {
        self.navigate(1);
    }

    pub fn reverse(&mut self) {
        self.navigate(-1);
    }

    /// Remove the bookmark under the cursor and replay from the segment that
    /// now holds the cursor. The first bookmark cannot be removed.
    pub fn remove_bookmark(&mut self) {
        if self.player.is_none() {
            return;
        }
        match self.track.remove() {
            Ok(removed) => {
                debug!(removed, "bookmark removed");
                self.navigate(0);
            }
            Err(_) => {
                self.notices.push_back(Notice::FirstBookmarkProtected);
                self.notify_label();
            }
        }
    }

    /// Jump to `position`, keeping the cursor on the segment that contains it.
    pub fn seek(&mut self, position: f64) {
        let Some(player) = self.player.as_ref() else {
            return;
        };
        let length = player.length();
        let target = if length > 0.0 {
            position.clamp(0.0, length)
        } else {
            position.max(0.0)
        };

        self.track.set_index(self.track.segment_at(target) as isize);
        let was_playing = self.state == PlaybackState::Playing;
        self.halt();
        if let Some(player) = self.player.as_mut() {
            player.set_current_position(target);
        }
        self.progress = target;

        if was_playing {
            self.play();
        } else {
            self.rearm_boundary();
        }
        self.notify_label();
    }

    /// Seek relative to where playback is or would resume.
    pub fn seek_by(&mut self, delta: f64) {
        if let Some(base) = self.playhead() {
            self.seek(base + delta);
        }
    }

    /// The live position while playing, otherwise where playback would resume.
    fn playhead(&self) -> Option<f64> {
        let player = self.player.as_ref()?;
        Some(if self.state == PlaybackState::Playing {
            player.position()
        } else {
            player.current_position()
        })
    }

    /// Dispatch every due timer. Returns how many ticks were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some((handle, tick)) = self.clock.next_due() {
            if !self.owns(handle, tick) {
                debug!(?tick, "dropping stale timer");
                self.clock.cancel(handle);
                continue;
            }
            match tick {
                Tick::Progress => self.on_progress(),
                Tick::Duration => self.on_duration(),
                Tick::Boundary => self.on_boundary(),
            }
            handled += 1;
        }
        handled
    }

    /// Tear down: cancel timers, release the sound and hand back the session.
    pub fn leave(&mut self) -> AudioSession {
        self.cancel_all();
        if let Some(mut player) = self.player.take() {
            player.cleanup();
        }
        self.state = PlaybackState::Stopped;
        self.pause_enabled = false;
        info!(
            session = %self.session.name,
            spend_time = self.session.spend_time,
            finished_times = self.session.finished_times,
            "left playback"
        );
        self.snapshot()
    }

    /// The session as it would be persisted now.
    pub fn snapshot(&self) -> AudioSession {
        AudioSession {
            time_stamp: self.track.stamps().to_vec(),
            ..self.session.clone()
        }
    }

    pub fn status(&self) -> Status {
        let length = self.player.as_ref().map(|p| p.length()).unwrap_or(0.0);
        Status {
            state: self.state,
            position: self.progress,
            length,
            elapsed: format_time(self.progress),
            total: format_time(length),
            bookmark_label: self.track.label(),
            pause_enabled: self.pause_enabled,
        }
    }

    /// Drain queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn on_progress(&mut self) {
        let Some(player) = self.player.as_ref() else {
            return;
        };
        self.progress = player.position();
        if self.state == PlaybackState::Playing && player.is_finished() {
            self.pause();
            self.session.finished_times += 1;
            info!(
                finished_times = self.session.finished_times,
                "reached the end of the audio"
            );
        }
    }

    /// Credit one duration period; `spend_time` grows in whole seconds.
    fn on_duration(&mut self) {
        if !self.player.as_ref().is_some_and(|p| p.is_playing()) {
            return;
        }
        self.listened += self.intervals.duration.as_secs_f64();
        let whole = self.listened.floor();
        if whole >= 1.0 {
            self.session.spend_time += whole as u64;
            self.listened -= whole;
        }
    }

    fn on_boundary(&mut self) {
        let Some((_, end)) = self.timers.boundary else {
            return;
        };
        let Some(player) = self.player.as_ref() else {
            return;
        };
        let position = player.position();
        if position >= end && self.state == PlaybackState::Playing {
            debug!(end, position, "segment end reached");
            self.track.shift(1);
            self.pause();
            self.rearm_boundary();
            self.notify_label();
        }
    }

    /// Cancel any boundary watch and, when playing a bounded segment, arm a
    /// new one for the segment under the cursor. Returns the segment start.
    fn rearm_boundary(&mut self) -> f64 {
        if let Some((handle, _)) = self.timers.boundary.take() {
            self.clock.cancel(handle);
        }
        let (start, end) = self.track.range();
        if self.state == PlaybackState::Playing {
            if let Some(end) = end {
                let handle = self
                    .clock
                    .schedule_interval(self.intervals.boundary, Tick::Boundary);
                self.timers.boundary = Some((handle, end));
            }
        }
        start
    }

    fn start_ticks(&mut self) {
        if let Some(h) = self.timers.progress.take() {
            self.clock.cancel(h);
        }
        if let Some(h) = self.timers.duration.take() {
            self.clock.cancel(h);
        }
        self.timers.progress = Some(
            self.clock
                .schedule_interval(self.intervals.progress, Tick::Progress),
        );
        self.timers.duration = Some(
            self.clock
                .schedule_interval(self.intervals.duration, Tick::Duration),
        );
    }

    fn cancel_all(&mut self) {
        let timers = std::mem::take(&mut self.timers);
        for handle in [timers.progress, timers.duration, timers.boundary.map(|(h, _)| h)]
            .into_iter()
            .flatten()
        {
            self.clock.cancel(handle);
        }
    }

    /// Stop without capturing the position, leaving the engine Paused.
    fn halt(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        if let Some(player) = self.player.as_mut() {
            player.stop();
        }
        self.cancel_all();
        self.state = PlaybackState::Paused;
        self.pause_enabled = false;
    }

    fn owns(&self, handle: TimerHandle, tick: Tick) -> bool {
        let owned = match tick {
            Tick::Progress => self.timers.progress,
            Tick::Duration => self.timers.duration,
            Tick::Boundary => self.timers.boundary.map(|(h, _)| h),
        };
        owned == Some(handle)
    }

    fn notify_label(&mut self) {
        let (index, count) = (self.track.index(), self.track.len());
        if let Some(hook) = self.on_label.as_mut() {
            hook(index, count);
        }
    }

    #[cfg(test)]
    pub(crate) fn clock(&self) -> &C {
        &self.clock
    }

    #[cfg(test)]
    pub(crate) fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

impl<S: Sound, C: Scheduler> Drop for NavigationEngine<S, C> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
