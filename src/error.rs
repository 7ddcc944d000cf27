//! Error types shared across the crate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the playback engine, the session store and the importer.
#[derive(Debug, Error)]
pub enum Error {
    /// The audio resource could not be opened or decoded.
    #[error("could not load sound {}: {reason}", .path.display())]
    Load { path: PathBuf, reason: String },

    /// The leading bookmark of a track is protected.
    #[error("the first bookmark cannot be removed")]
    InvalidRemoval,

    #[error("session store error: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("could not import {}: {source}", .path.display())]
    Import {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
