//! In-memory [`Sound`] whose clock is advanced by hand.

use std::cell::RefCell;
use std::rc::Rc;

use super::types::Sound;

#[derive(Debug, Default)]
pub struct FakeState {
    pub length: Option<f64>,
    pub position: f64,
    pub playing: bool,
    pub unloaded: u32,
    pub seeks: Vec<f64>,
}

/// Cloning shares the state, so a test can keep a handle after giving the
/// sound away.
#[derive(Debug, Clone, Default)]
pub struct FakeSound(Rc<RefCell<FakeState>>);

impl FakeSound {
    pub fn with_length(length: f64) -> Self {
        let sound = Self::default();
        sound.0.borrow_mut().length = Some(length);
        sound
    }

    pub fn unknown_length() -> Self {
        Self::default()
    }

    /// Move the playhead forward as if audio played for `secs`. Stops at the end.
    pub fn advance(&self, secs: f64) {
        let mut state = self.0.borrow_mut();
        if !state.playing {
            return;
        }
        state.position += secs;
        let length = state.length.unwrap_or(f64::INFINITY);
        if state.position >= length {
            state.position = length;
            state.playing = false;
        }
    }

    pub fn state(&self) -> std::cell::Ref<'_, FakeState> {
        self.0.borrow()
    }
}

impl Sound for FakeSound {
    fn length(&self) -> Option<f64> {
        self.0.borrow().length
    }

    fn position(&self) -> f64 {
        self.0.borrow().position
    }

    fn seek(&mut self, position: f64) {
        let mut state = self.0.borrow_mut();
        state.position = match state.length {
            Some(length) => position.clamp(0.0, length),
            None => position.max(0.0),
        };
        state.seeks.push(position);
    }

    fn play(&mut self) {
        self.0.borrow_mut().playing = true;
    }

    fn stop(&mut self) {
        self.0.borrow_mut().playing = false;
    }

    fn is_playing(&self) -> bool {
        self.0.borrow().playing
    }

    fn unload(&mut self) {
        let mut state = self.0.borrow_mut();
        state.playing = false;
        state.unloaded += 1;
    }
}
