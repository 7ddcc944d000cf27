//! The sound primitive the playback controller drives.

/// One loaded sound. Positions and lengths are in seconds.
pub trait Sound {
    /// Total length, `None` when the backend cannot tell.
    fn length(&self) -> Option<f64>;

    /// Live playhead position.
    fn position(&self) -> f64;

    /// Move the playhead without changing the play/stop state.
    fn seek(&mut self, position: f64);

    fn play(&mut self);

    /// Stop producing audio, keeping the playhead where it is.
    fn stop(&mut self);

    fn is_playing(&self) -> bool;

    /// Release the underlying resource. Safe to call more than once.
    fn unload(&mut self);
}
