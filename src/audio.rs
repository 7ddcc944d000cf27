//! Audio playback.
//!
//! [`Sound`] is the seam to the external playback engine; [`RodioSound`]
//! implements it on top of `rodio`. [`PlaybackController`] owns one sound and
//! keeps the resume position used across pause, seek and play.

mod controller;
mod sink;
mod types;

pub use controller::PlaybackController;
pub use sink::RodioSound;
pub use types::Sound;

#[cfg(test)]
pub(crate) mod testing;
