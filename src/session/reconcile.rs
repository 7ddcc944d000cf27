use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::import;

use super::diff::SessionDiff;
use super::model::AudioSession;
use super::store::SessionStore;

/// Outcome of [`SessionReconciler::find_or_create`].
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// A session with the same file name was already stored; its statistics
    /// are reused.
    Existing(AudioSession),
    /// The file was imported and a fresh session created for it.
    Created(AudioSession),
}

impl Lookup {
    pub fn is_existing(&self) -> bool {
        matches!(self, Lookup::Existing(_))
    }

    pub fn into_session(self) -> AudioSession {
        match self {
            Lookup::Existing(s) | Lookup::Created(s) => s,
        }
    }
}

/// Keeps in-memory sessions and the store in step.
pub struct SessionReconciler<S: SessionStore> {
    store: S,
    audio_dir: PathBuf,
}

impl<S: SessionStore> SessionReconciler<S> {
    /// `audio_dir` is the managed directory chosen files are imported into.
    pub fn new(store: S, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            audio_dir: audio_dir.into(),
        }
    }

    /// Return the stored session for `file_path`'s name, or import the file
    /// and create one.
    pub fn find_or_create(&mut self, file_path: &Path) -> Result<Lookup> {
        let name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Import {
                path: file_path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file"),
            })?;

        if let Some(record) = self.store.find_by_name(&name)? {
            info!(id = record.id, "reusing stored session for {name}");
            return Ok(Lookup::Existing(record.into()));
        }

        let stored = match import::copy_file(file_path, &self.audio_dir) {
            Ok(Some(path)) => path,
            Ok(None) => {
                warn!(
                    "{name} is already in {} without a session, reusing the stored copy",
                    self.audio_dir.display()
                );
                self.audio_dir.join(&name)
            }
            Err(source) => {
                return Err(Error::Import {
                    path: file_path.to_path_buf(),
                    source,
                });
            }
        };

        let record = self.store.create(&name, &stored)?;
        info!(id = record.id, "created session for {}", stored.display());
        Ok(Lookup::Created(record.into()))
    }

    /// Persist `changes` for session `id`.
    pub fn save(&mut self, id: i64, changes: &SessionDiff) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }
        debug!(id, fields = changes.len(), "saving session");
        self.store.update_fields(id, changes)
    }

    /// Write whatever differs between `persisted` and `current`, then adopt
    /// `current` as the persisted snapshot.
    ///
    /// Returns whether anything was written.
    pub fn flush(&mut self, persisted: &mut AudioSession, current: AudioSession) -> Result<bool> {
        let changes = persisted.diff(&current);
        if changes.is_empty() {
            return Ok(false);
        }

        let Some(id) = current.id.or(persisted.id) else {
            warn!("session {} was never stored, not saving", current.name);
            return Ok(false);
        };

        self.save(id, &changes)?;
        *persisted = current;
        Ok(true)
    }

    /// Every stored session, oldest first.
    pub fn list(&self) -> Result<Vec<AudioSession>> {
        Ok(self
            .store
            .list_all()?
            .into_iter()
            .map(AudioSession::from)
            .collect())
    }
}
