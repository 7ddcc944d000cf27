use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::{App, Screen, SessionContext};
use crate::audio::RodioSound;
use crate::config;
use crate::engine::Notice;
use crate::error::Error;
use crate::library::scan;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::runtime::player::{Flow, PlayerScreen};
use crate::schedule::IntervalClock;
use crate::session::{SessionReconciler, SqliteStore};
use crate::ui;

type Player = PlayerScreen<RodioSound, IntervalClock>;

/// How long to wait for input before running timers again.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// The player screen while it is open.
    pub player: Option<Player>,
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// Everything the loop reads or writes besides the terminal.
pub struct Services<'a> {
    pub settings: &'a config::Settings,
    pub reconciler: &'a mut SessionReconciler<SqliteStore>,
    pub mpris: &'a MprisHandle,
    pub library_dir: &'a Path,
}

/// Main terminal event loop: runs playback timers, draws, and handles input
/// and MPRIS commands. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    services: &mut Services<'_>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = drive(terminal, app, services, control_rx, state);

    // Every exit path persists and releases the open session.
    if let Some(player) = state.player.take() {
        if let Err(e) = player.close(&mut *services.reconciler) {
            warn!("could not save session on exit: {e}");
        }
    }
    result
}

fn drive(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    services: &mut Services<'_>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        if let Some(player) = state.player.as_mut() {
            player.tick();
            for notice in player.take_notices() {
                app.show_notice(notice.to_string());
            }
        }
        update_mpris(services.mpris, state.player.as_ref());

        let panel = state.player.as_ref().map(|p| p.panel());
        terminal.draw(|f| ui::draw(f, app, panel.as_ref(), &services.settings.ui))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, state) {
                return Ok(());
            }
        }

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                // A notice is modal: the key that closes it does nothing else.
                if app.dismiss_notice() {
                    continue;
                }
                if handle_key_event(key, app, services, state)? {
                    return Ok(());
                }
            }
        }
    }
}

/// Returns `true` when the app should quit.
fn handle_control_cmd(cmd: ControlCmd, state: &mut EventLoopState) -> bool {
    match state.player.as_mut() {
        Some(player) => player.control(cmd) == Flow::Quit,
        None => cmd == ControlCmd::Quit,
    }
}

/// Returns `true` when the app should quit.
fn handle_key_event(
    key: KeyEvent,
    app: &mut App,
    services: &mut Services<'_>,
    state: &mut EventLoopState,
) -> Result<bool, Box<dyn std::error::Error>> {
    if let Some(player) = state.player.as_mut() {
        let flow = match player.handle_key(key, &mut *services.reconciler) {
            Ok(flow) => flow,
            Err(e) => {
                warn!("player action failed: {e}");
                app.show_notice(e.to_string());
                Flow::Continue
            }
        };
        return match flow {
            Flow::Continue => Ok(false),
            Flow::Quit => Ok(true),
            Flow::Back => {
                leave_player(app, services, state);
                Ok(false)
            }
        };
    }

    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            return Ok(true);
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            app.last();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.pending_gg = false;
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.pending_gg = false;
            app.prev();
        }
        KeyCode::Tab => {
            state.pending_gg = false;
            app.toggle_focus();
        }
        KeyCode::Char('r') => {
            state.pending_gg = false;
            refresh_lists(app, services);
        }
        KeyCode::Enter => {
            state.pending_gg = false;
            enter_player(app, services, state);
        }
        _ => {
            // g pending should clear on any other key
            state.pending_gg = false;
        }
    }

    Ok(false)
}

/// Rescan the library directory and reload the stored sessions.
pub fn refresh_lists(app: &mut App, services: &mut Services<'_>) {
    app.set_files(scan(services.library_dir, &services.settings.library));
    match services.reconciler.list() {
        Ok(sessions) => app.set_sessions(sessions),
        Err(e) => {
            warn!("could not list sessions: {e}");
            app.show_notice(e.to_string());
        }
    }
}

fn enter_player(app: &mut App, services: &mut Services<'_>, state: &mut EventLoopState) {
    let Some(selected_file) = app.selected_path() else {
        return;
    };

    let lookup = match services.reconciler.find_or_create(&selected_file) {
        Ok(lookup) => lookup,
        Err(e) => {
            warn!("could not prepare session for {}: {e}", selected_file.display());
            app.show_notice(e.to_string());
            return;
        }
    };
    if lookup.is_existing() {
        app.show_notice(Notice::StatsImported.to_string());
    }

    let context = SessionContext {
        selected_file,
        session: lookup.into_session(),
    };
    match PlayerScreen::open(context, services.settings, services.mpris) {
        Ok(player) => {
            state.player = Some(player);
            app.screen = Screen::Player;
        }
        Err(e) => {
            let reason = match &e {
                Error::Load { reason, .. } => reason.clone(),
                other => other.to_string(),
            };
            warn!("{e}");
            app.show_notice(Notice::LoadFailed(reason).to_string());
        }
    }
}

fn leave_player(app: &mut App, services: &mut Services<'_>, state: &mut EventLoopState) {
    if let Some(player) = state.player.take() {
        match player.close(&mut *services.reconciler) {
            Ok(session) => info!(session = %session.name, "back to chooser"),
            Err(e) => {
                warn!("could not save session: {e}");
                app.show_notice(e.to_string());
            }
        }
    }
    app.screen = Screen::Chooser;
    services.mpris.clear();
    refresh_lists(app, services);
}
