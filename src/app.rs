//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the chooser lists,
//! selection, active screen and pending notice.

mod model;

pub use model::*;
