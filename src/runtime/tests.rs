use std::fs;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempfile::{TempDir, tempdir};

use crate::app::SessionContext;
use crate::audio::testing::FakeSound;
use crate::config::Settings;
use crate::engine::{Notice, PlaybackState};
use crate::keys::PlayerAction;
use crate::mpris::ControlCmd;
use crate::schedule::ManualClock;
use crate::session::{SessionReconciler, SqliteStore};

use super::player::{Flow, PlayerScreen};
use super::startup;

type Screen = PlayerScreen<FakeSound, ManualClock>;

struct Fixture {
    _dir: TempDir,
    reconciler: SessionReconciler<SqliteStore>,
    context: SessionContext,
}

fn fixture() -> Fixture {
    let dir = tempdir().unwrap();
    let source = dir.path().join("lesson.mp3");
    fs::write(&source, b"not really audio").unwrap();

    let store = SqliteStore::open_in_memory().unwrap();
    let mut reconciler = SessionReconciler::new(store, dir.path().join("audio"));
    let session = reconciler.find_or_create(&source).unwrap().into_session();

    Fixture {
        _dir: dir,
        reconciler,
        context: SessionContext {
            selected_file: source,
            session,
        },
    }
}

fn screen(fx: &Fixture, settings: &Settings) -> (Screen, FakeSound) {
    let sound = FakeSound::with_length(30.0);
    let screen = PlayerScreen::new(
        fx.context.clone(),
        sound.clone(),
        ManualClock::new(),
        settings,
        None,
    );
    (screen, sound)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn save_writes_new_bookmarks_and_keeps_playing() {
    let mut fx = fixture();
    let (mut player, sound) = screen(&fx, &Settings::default());

    player.apply(PlayerAction::Play, &mut fx.reconciler).unwrap();
    sound.advance(4.0);
    player.apply(PlayerAction::SetBookmark, &mut fx.reconciler).unwrap();
    player.apply(PlayerAction::Play, &mut fx.reconciler).unwrap();

    let flow = player.apply(PlayerAction::Save, &mut fx.reconciler).unwrap();
    assert_eq!(flow, Flow::Continue);
    assert_eq!(player.engine().state(), PlaybackState::Playing);
    assert_eq!(player.take_notices(), vec![Notice::Saved]);

    let stored = fx.reconciler.list().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].time_stamp, vec![0.0, 4.0]);
    assert_eq!(stored[0].duration, 30);
}

#[test]
fn saving_twice_without_changes_writes_nothing() {
    let mut fx = fixture();
    let (mut player, _sound) = screen(&fx, &Settings::default());

    assert!(player.save(&mut fx.reconciler).unwrap());
    assert!(!player.save(&mut fx.reconciler).unwrap());
    assert_eq!(player.take_notices(), vec![Notice::Saved]);
}

#[test]
fn close_persists_and_releases_the_sound() {
    let mut fx = fixture();
    let (mut player, sound) = screen(&fx, &Settings::default());

    player.apply(PlayerAction::Play, &mut fx.reconciler).unwrap();
    sound.advance(7.0);
    player.apply(PlayerAction::SetBookmark, &mut fx.reconciler).unwrap();

    let session = player.close(&mut fx.reconciler).unwrap();
    assert_eq!(session.time_stamp, vec![0.0, 7.0]);
    assert!(sound.state().unloaded >= 1);
    assert!(!sound.state().playing);

    let stored = fx.reconciler.list().unwrap();
    assert_eq!(stored[0].time_stamp, vec![0.0, 7.0]);
}

#[test]
fn keys_map_to_flows() {
    let mut fx = fixture();
    let (mut player, _sound) = screen(&fx, &Settings::default());

    let mut press = |code| player.handle_key(key(code), &mut fx.reconciler).unwrap();
    assert_eq!(press(KeyCode::Char('z')), Flow::Continue);
    assert_eq!(press(KeyCode::Esc), Flow::Back);
    assert_eq!(press(KeyCode::Char('b')), Flow::Back);
    assert_eq!(press(KeyCode::Char('q')), Flow::Quit);
}

#[test]
fn up_key_starts_playback() {
    let mut fx = fixture();
    let (mut player, sound) = screen(&fx, &Settings::default());

    player.handle_key(key(KeyCode::Up), &mut fx.reconciler).unwrap();
    assert_eq!(player.engine().state(), PlaybackState::Playing);
    assert!(sound.state().playing);
}

#[test]
fn media_keys_drive_the_engine() {
    let fx = fixture();
    let (mut player, _sound) = screen(&fx, &Settings::default());

    assert_eq!(player.control(ControlCmd::PlayPause), Flow::Continue);
    assert_eq!(player.engine().state(), PlaybackState::Playing);

    player.control(ControlCmd::Stop);
    assert_eq!(player.engine().state(), PlaybackState::Paused);

    player.control(ControlCmd::Play);
    assert_eq!(player.engine().state(), PlaybackState::Playing);

    assert_eq!(player.control(ControlCmd::Quit), Flow::Quit);
}

#[test]
fn panel_uses_configured_keys() {
    let fx = fixture();
    let mut settings = Settings::default();
    settings.controls.remove_bookmark_key = "d".to_string();
    settings.playback.seek_seconds = 10;
    let (player, _sound) = screen(&fx, &settings);

    let panel = player.panel();
    assert_eq!(panel.name, "lesson.mp3");
    assert!(panel.help.contains("[d] remove bookmark"));
    assert!(panel.help.contains("-/+10s"));
    assert_eq!(panel.status.bookmark_label, "0/0");
}

#[test]
fn remove_key_comes_from_settings() {
    let mut fx = fixture();
    let mut settings = Settings::default();
    settings.controls.remove_bookmark_key = "d".to_string();
    let (mut player, sound) = screen(&fx, &settings);

    player.apply(PlayerAction::Play, &mut fx.reconciler).unwrap();
    sound.advance(3.0);
    player.apply(PlayerAction::SetBookmark, &mut fx.reconciler).unwrap();
    assert_eq!(player.engine().track().len(), 2);

    player
        .handle_key(key(KeyCode::Char('d')), &mut fx.reconciler)
        .unwrap();
    assert_eq!(player.engine().track().len(), 1);
}

#[test]
fn library_dir_prefers_argument_then_config() {
    let mut settings = Settings::default();
    settings.ui.start_dir = Some("/music".into());

    assert_eq!(
        startup::library_dir(Some("/lessons".to_string()), &settings),
        Path::new("/lessons")
    );
    assert_eq!(startup::library_dir(None, &settings), Path::new("/music"));
}
