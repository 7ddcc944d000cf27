use std::env;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::mpris::ControlCmd;

mod event_loop;
mod mpris_sync;
mod player;
mod startup;

#[cfg(test)]
mod tests;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, fallback) = startup::load_settings();

    let first = env::args().nth(1);
    if first.as_deref() == Some("--print-config") {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    let library_dir = startup::library_dir(first, &settings);
    let _log_guard = startup::start_logging(&settings);
    startup::report_fallback(fallback.as_deref());
    info!(dir = %library_dir.display(), "starting");

    let mut reconciler = startup::open_sessions(&settings)?;

    let mut app = App::new(Vec::new());
    app.set_current_dir(library_dir.display().to_string());

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    let mut services = event_loop::Services {
        settings: &settings,
        reconciler: &mut reconciler,
        mpris: &mpris,
        library_dir: &library_dir,
    };
    event_loop::refresh_lists(&mut app, &mut services);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(&mut terminal, &mut app, &mut services, &control_rx, &mut state)
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("shutting down");
    run_result
}
