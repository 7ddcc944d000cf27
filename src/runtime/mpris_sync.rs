use crate::audio::Sound;
use crate::engine::PlaybackState;
use crate::mpris::MprisHandle;
use crate::runtime::player::PlayerScreen;
use crate::schedule::Scheduler;

/// Publish the playback state. The title follows the engine's label hook.
pub fn update_mpris<S: Sound, C: Scheduler>(mpris: &MprisHandle, player: Option<&PlayerScreen<S, C>>) {
    let playback = player
        .map(|p| p.engine().state())
        .unwrap_or(PlaybackState::Stopped);
    mpris.set_playback(playback);
}
