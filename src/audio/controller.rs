use tracing::debug;

use super::types::Sound;

/// Owns one loaded sound and remembers where playback should resume.
///
/// The stored position is what `play` seeks to. `pause` captures the live
/// position into it, `set_current_position` overwrites it.
pub struct PlaybackController<S: Sound> {
    sound: Option<S>,
    length: f64,
    current_position: f64,
}

impl<S: Sound> PlaybackController<S> {
    pub fn new(sound: S, resume: f64) -> Self {
        let length = sound.length().unwrap_or(0.0);
        Self {
            sound: Some(sound),
            length,
            current_position: resume.max(0.0),
        }
    }

    /// Seek to the stored position and start playing.
    pub fn play(&mut self) {
        let position = self.current_position;
        if let Some(sound) = self.sound.as_mut() {
            sound.seek(position);
            sound.play();
        }
    }

    /// Remember the live position and stop. A sound that ran to its end
    /// still reports that end; otherwise a paused sound keeps the stored
    /// position.
    pub fn pause(&mut self) {
        let finished = self.is_finished();
        let Some(sound) = self.sound.as_mut() else {
            return;
        };
        if sound.is_playing() {
            self.current_position = sound.position();
            sound.stop();
        } else if finished {
            self.current_position = sound.position();
        }
    }

    /// Stop without touching the stored position.
    pub fn stop(&mut self) {
        if let Some(sound) = self.sound.as_mut() {
            sound.stop();
        }
    }

    /// Live position, `0.0` once unloaded.
    pub fn position(&self) -> f64 {
        self.sound.as_ref().map(|s| s.position()).unwrap_or(0.0)
    }

    pub fn is_playing(&self) -> bool {
        self.sound.as_ref().is_some_and(|s| s.is_playing())
    }

    /// True once the playhead reached the end. Always false when the length
    /// is unknown.
    pub fn is_finished(&self) -> bool {
        self.length > 0.0 && self.position() >= self.length
    }

    pub fn set_current_position(&mut self, position: f64) {
        self.current_position = position.max(0.0);
    }

    pub fn current_position(&self) -> f64 {
        self.current_position
    }

    /// Length in seconds, `0.0` when unknown.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn is_loaded(&self) -> bool {
        self.sound.is_some()
    }

    /// Stop and release the sound.
    pub fn cleanup(&mut self) {
        if let Some(mut sound) = self.sound.take() {
            sound.stop();
            sound.unload();
            debug!("playback controller released its sound");
        }
    }
}

impl<S: Sound> Drop for PlaybackController<S> {
    fn drop(&mut self) {
        self.cleanup();
    }
}
