mod app;
mod audio;
mod bookmarks;
mod config;
mod engine;
mod error;
mod import;
mod keys;
mod library;
mod logging;
mod mpris;
mod runtime;
mod schedule;
mod session;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
