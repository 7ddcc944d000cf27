//! Per-file listening sessions and their persistence.
//!
//! An [`AudioSession`] is the in-memory view of one audio file's bookmarks and
//! statistics. [`SessionStore`] is the record store behind it (SQLite in the
//! application), and [`SessionReconciler`] ties the two together: it finds or
//! creates the session for a chosen file and writes back only what changed.

mod diff;
mod model;
mod reconcile;
mod store;

pub use diff::{Column, FieldValue, SessionDiff};
pub use model::{AudioSession, format_time_stamps, parse_time_stamps};
pub use reconcile::{Lookup, SessionReconciler};
pub use store::{Record, SessionStore, SqliteStore};

#[cfg(test)]
mod tests;
