use super::*;
use std::sync::mpsc;

fn handle() -> (MprisHandle, Arc<Mutex<SharedState>>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    (
        MprisHandle {
            state: state.clone(),
        },
        state,
    )
}

#[test]
fn handle_sets_and_clears_shared_state() {
    let (handle, state) = handle();

    handle.set_title(Some(session_title("lesson.mp3", 2, 4)));
    handle.set_length(1.5);
    handle.set_playback(PlaybackState::Playing);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("lesson.mp3 [2/3]"));
        assert_eq!(s.length_micros, Some(1_500_000));
        assert_eq!(s.playback, PlaybackState::Playing);
    }

    handle.set_length(0.0);
    assert_eq!(state.lock().unwrap().length_micros, None);

    handle.clear();
    let s = state.lock().unwrap();
    assert_eq!(s.title, None);
    assert_eq!(s.playback, PlaybackState::Stopped);
}

#[test]
fn session_title_matches_bookmark_label() {
    assert_eq!(session_title("a.mp3", 0, 1), "a.mp3 [0/0]");
    assert_eq!(session_title("a.mp3", 0, 0), "a.mp3 [0/0]");
}

#[test]
fn playback_status_maps_state_to_mpris_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        forward: Forward(tx),
        state: state.clone(),
    };

    assert_eq!(iface.playback_status(), "Stopped");

    state.lock().unwrap().playback = PlaybackState::Playing;
    assert_eq!(iface.playback_status(), "Playing");

    state.lock().unwrap().playback = PlaybackState::Paused;
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn metadata_includes_title_and_known_length() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        forward: Forward(tx),
        state: state.clone(),
    };

    let map = iface.metadata();
    assert!(map.contains_key("xesam:title"));
    assert!(!map.contains_key("mpris:length"));

    {
        let mut s = state.lock().unwrap();
        s.title = Some("Title".to_string());
        s.length_micros = Some(42);
    }
    let map = iface.metadata();
    for k in ["xesam:title", "mpris:length"] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn player_methods_forward_commands() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        forward: Forward(tx),
        state,
    };

    iface.next();
    iface.previous();
    iface.play_pause();
    iface.stop();

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::Next,
            ControlCmd::Prev,
            ControlCmd::PlayPause,
            ControlCmd::Stop
        ]
    );
}
