//! MPRIS media-key surface.
//!
//! The D-Bus service runs on its own thread and only forwards commands to the
//! event loop over a channel. The event loop publishes what to show through
//! [`MprisHandle`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use tracing::{info, warn};
use zbus::{Connection, interface};
use zvariant::{OwnedValue, Value};

use crate::engine::PlaybackState;

#[cfg(test)]
mod tests;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    /// Next bookmark.
    Next,
    /// Previous bookmark.
    Prev,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    length_micros: Option<i64>,
}

#[derive(Clone)]
pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlaybackState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
    }

    pub fn set_title(&self, title: Option<String>) {
        if let Ok(mut s) = self.state.lock() {
            s.title = title;
        }
    }

    /// Length in seconds; unknown (`<= 0`) clears it.
    pub fn set_length(&self, seconds: f64) {
        if let Ok(mut s) = self.state.lock() {
            s.length_micros = (seconds > 0.0).then(|| (seconds * 1_000_000.0) as i64);
        }
    }

    /// Forget the current session, e.g. when returning to the chooser.
    pub fn clear(&self) {
        if let Ok(mut s) = self.state.lock() {
            *s = SharedState::default();
        }
    }
}

/// `name [index/count-1]`, what players show as the track title.
pub fn session_title(name: &str, index: usize, count: usize) -> String {
    format!("{name} [{index}/{}]", count.saturating_sub(1))
}

const BUS_NAME: &str = "org.mpris.MediaPlayer2.shadowing";
const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";

/// Hands media-key commands to the event loop. A closed channel means the
/// app is shutting down, so send failures are dropped.
#[derive(Clone)]
struct Forward(Sender<ControlCmd>);

impl Forward {
    fn send(&self, cmd: ControlCmd) {
        let _ = self.0.send(cmd);
    }
}

struct RootIface {
    forward: Forward,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {}

    fn quit(&self) {
        self.forward.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "shadowing"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        Vec::new()
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        Vec::new()
    }
}

struct PlayerIface {
    forward: Forward,
    state: Arc<Mutex<SharedState>>,
}

impl PlayerIface {
    fn snapshot(&self) -> Option<(PlaybackState, Option<String>, Option<i64>)> {
        let s = self.state.lock().ok()?;
        Some((s.playback, s.title.clone(), s.length_micros))
    }
}

/// Bookmark navigation is exposed as track navigation.
#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        self.forward.send(ControlCmd::Next);
    }

    fn previous(&self) {
        self.forward.send(ControlCmd::Prev);
    }

    fn play(&self) {
        self.forward.send(ControlCmd::Play);
    }

    fn pause(&self) {
        self.forward.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        self.forward.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        self.forward.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        match self.snapshot().map(|(playback, ..)| playback) {
            Some(PlaybackState::Playing) => "Playing",
            Some(PlaybackState::Paused) => "Paused",
            Some(PlaybackState::Stopped) | None => "Stopped",
        }
    }

    /// Every control is available while a session is open.
    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let Some((_, title, length)) = self.snapshot() else {
            return HashMap::new();
        };

        let title = Some(Value::from(title.unwrap_or_default()));
        let length = length.map(Value::from);
        [("xesam:title", title), ("mpris:length", length)]
            .into_iter()
            .filter_map(|(key, value)| {
                let owned = OwnedValue::try_from(value?).ok()?;
                Some((key.to_string(), owned))
            })
            .collect()
    }
}

async fn serve(tx: Sender<ControlCmd>, state: Arc<Mutex<SharedState>>) -> zbus::Result<Connection> {
    let connection = Connection::session().await?;
    connection.request_name(BUS_NAME).await?;

    let forward = Forward(tx);
    let server = connection.object_server();
    server
        .at(
            OBJECT_PATH,
            RootIface {
                forward: forward.clone(),
            },
        )
        .await?;
    server.at(OBJECT_PATH, PlayerIface { forward, state }).await?;
    Ok(connection)
}

/// Register the MPRIS service on a background thread. Without a session bus
/// the app runs on, just without media keys.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let shared = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            // The connection must outlive the loop below.
            let _connection = match serve(tx, shared).await {
                Ok(connection) => connection,
                Err(e) => {
                    warn!("MPRIS unavailable: {e}");
                    return;
                }
            };
            info!("MPRIS service registered as {BUS_NAME}");

            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle { state }
}
