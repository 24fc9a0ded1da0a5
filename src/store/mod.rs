// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Playlist persistence.
//!
//! Every backend stores one [`Collection`] per username behind the
//! [`StorageBackend`] trait. [`DocumentStore`] sits on top of a relational
//! backend and a file backend and decides which one serves each request.
//!
//! # Fallback
//!
//! The store starts in [`StoreState::Relational`] when a relational backend is
//! configured. The first time that backend fails (to connect, read, write or
//! close) the store logs the failure, switches to [`StoreState::File`] for the
//! rest of the process and repeats the failed operation against the file.
//! Only a failure of the file backend reaches the caller.

pub mod file;
pub mod memory;

use log::{debug, error, info, warn};
use thiserror::Error;

use crate::model::Collection;

pub use crate::db::SqliteBackend;
pub use file::JsonFileBackend;
pub use memory::MemoryBackend;

/// A failure inside a single backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed playlist record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Simulated(String),
}

/// A failure of the [`DocumentStore`] as a whole.
///
/// The message names the operation and the user but not the backend; the
/// backend failure is kept as the error source.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("playlist storage is unavailable while {operation} playlists for '{username}'")]
    Unavailable {
        operation: &'static str,
        username: String,
        #[source]
        source: BackendError,
    },
}

/// Raw record storage, one collection per user.
pub trait StorageBackend {
    /// Short human-readable name, used in logs.
    fn name(&self) -> &'static str;

    /// Returns the user's record, or `None` if the user has never been saved.
    fn fetch(&mut self, username: &str) -> Result<Option<Collection>, BackendError>;

    /// Replaces the user's whole record.
    fn store(&mut self, username: &str, collection: &Collection) -> Result<(), BackendError>;

    /// Releases any held resources. Must be safe to call more than once.
    fn close(&mut self) -> Result<(), BackendError>;
}

/// Which backend is serving requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreState {
    Relational,
    File,
}

pub struct DocumentStore {
    relational: Option<Box<dyn StorageBackend>>,
    file: Box<dyn StorageBackend>,
    seed: Collection,
    state: StoreState,
}

impl DocumentStore {
    /// Creates a store.
    ///
    /// # Arguments
    ///
    /// * `relational` - The preferred backend, or `None` to use the file only.
    /// * `file` - The backend used when there is no relational backend or
    ///   after it has failed.
    /// * `seed` - The collection handed out for users with no stored record.
    pub fn new(
        relational: Option<Box<dyn StorageBackend>>,
        file: Box<dyn StorageBackend>,
        seed: Collection,
    ) -> Self {
        let state = if relational.is_some() {
            StoreState::Relational
        } else {
            StoreState::File
        };

        Self {
            relational,
            file,
            seed,
            state,
        }
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    /// Names the backend currently serving requests.
    pub fn describe(&self) -> &'static str {
        match (self.state, self.relational.as_deref()) {
            (StoreState::Relational, Some(backend)) => backend.name(),
            _ => self.file.name(),
        }
    }

    /// Loads a user's collection, or a copy of the seed collection if the user
    /// has no record yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the file backend fails, either
    /// directly or after falling back from the relational backend.
    pub fn load(&mut self, username: &str) -> Result<Collection, StoreError> {
        match self.run("loading", username, |b| b.fetch(username))? {
            Some(collection) => {
                info!(
                    "Loaded {} moods for '{}' from {}",
                    collection.mood_count(),
                    username,
                    self.describe()
                );
                Ok(collection)
            }
            None => {
                info!("No stored playlists for '{username}', starting from defaults");
                Ok(self.seed.clone())
            }
        }
    }

    /// Overwrites a user's stored collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the file backend fails, either
    /// directly or after falling back from the relational backend.
    pub fn save(&mut self, username: &str, collection: &Collection) -> Result<(), StoreError> {
        self.run("saving", username, |b| b.store(username, collection))?;
        debug!(
            "Saved {} moods for '{}' to {}",
            collection.mood_count(),
            username,
            self.describe()
        );
        Ok(())
    }

    /// Closes both backends. Calling this again is harmless.
    pub fn close(&mut self) -> Result<(), StoreError> {
        if let Some(backend) = self.relational.as_deref_mut() {
            if let Err(e) = backend.close() {
                warn!("Failed to close {}: {e}", backend.name());
            }
        }

        self.file.close().map_err(|source| StoreError::Unavailable {
            operation: "closing",
            username: String::new(),
            source,
        })
    }

    fn run<T>(
        &mut self,
        operation: &'static str,
        username: &str,
        mut op: impl FnMut(&mut dyn StorageBackend) -> Result<T, BackendError>,
    ) -> Result<T, StoreError> {
        if self.state == StoreState::Relational {
            if let Some(backend) = self.relational.as_deref_mut() {
                match op(backend) {
                    Ok(value) => return Ok(value),
                    Err(e) => self.fall_back(operation, &e),
                }
            }
        }

        op(self.file.as_mut()).map_err(|source| {
            error!(
                "{} failed while {operation} playlists for '{username}': {source}",
                self.file.name()
            );
            StoreError::Unavailable {
                operation,
                username: username.to_string(),
                source,
            }
        })
    }

    fn fall_back(&mut self, operation: &str, cause: &BackendError) {
        self.state = StoreState::File;

        if let Some(mut backend) = self.relational.take() {
            warn!(
                "{} failed while {operation} playlists ({cause}); using {} for the rest of this session",
                backend.name(),
                self.file.name()
            );
            if let Err(e) = backend.close() {
                debug!("Ignoring error while closing {}: {e}", backend.name());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> Collection {
        Collection::from_entries([("happy", vec!["Happy"]), ("calm", vec![])]).unwrap()
    }

    fn store_with(relational: Option<&MemoryBackend>, file: &MemoryBackend) -> DocumentStore {
        DocumentStore::new(
            relational.map(|b| Box::new(b.clone()) as Box<dyn StorageBackend>),
            Box::new(file.clone()),
            seed(),
        )
    }

    #[test]
    fn starts_in_file_state_without_relational_backend() {
        let file = MemoryBackend::new();
        let store = store_with(None, &file);

        assert_eq!(store.state(), StoreState::File);
        assert_eq!(store.describe(), "memory");
    }

    #[test]
    fn load_returns_seed_for_unknown_user() {
        let relational = MemoryBackend::new();
        let file = MemoryBackend::new();
        let mut store = store_with(Some(&relational), &file);

        assert_eq!(store.load("ann").unwrap(), seed());
        assert_eq!(store.state(), StoreState::Relational);
    }

    #[test]
    fn relational_backend_serves_while_healthy() {
        let relational = MemoryBackend::new();
        let file = MemoryBackend::new();
        let mut store = store_with(Some(&relational), &file);
        let mut c = seed();
        c.create_mood("focus").unwrap();

        store.save("ann", &c).unwrap();

        assert_eq!(relational.record("ann"), Some(c.clone()));
        assert_eq!(file.record("ann"), None);
        assert_eq!(store.load("ann").unwrap(), c);
    }

    #[test]
    fn failed_load_falls_back_to_file_for_good() {
        let relational = MemoryBackend::failing();
        let file = MemoryBackend::new();
        let mut store = store_with(Some(&relational), &file);

        assert_eq!(store.load("ann").unwrap(), seed());
        assert_eq!(store.state(), StoreState::File);

        relational.set_failing(false);
        store.save("ann", &Collection::new()).unwrap();

        assert_eq!(relational.store_count(), 0);
        assert_eq!(file.record("ann"), Some(Collection::new()));
        assert_eq!(store.state(), StoreState::File);
        assert_eq!(store.describe(), "memory");
    }

    #[test]
    fn failed_save_is_retried_on_file() {
        let relational = MemoryBackend::new();
        let file = MemoryBackend::new();
        let mut store = store_with(Some(&relational), &file);
        store.load("ann").unwrap();

        relational.set_failing(true);
        store.save("ann", &seed()).unwrap();

        assert_eq!(store.state(), StoreState::File);
        assert_eq!(file.record("ann"), Some(seed()));
    }

    #[test]
    fn file_failure_after_fallback_is_unavailable() {
        let relational = MemoryBackend::failing();
        let file = MemoryBackend::failing();
        let mut store = store_with(Some(&relational), &file);

        let err = store.load("ann").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Unavailable { operation: "loading", ref username, .. } if username == "ann"
        ));

        let err = store.save("ann", &seed()).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable { operation: "saving", .. }));
    }

    #[test]
    fn close_is_idempotent() {
        let relational = MemoryBackend::new();
        let file = MemoryBackend::new();
        let mut store = store_with(Some(&relational), &file);

        store.close().unwrap();
        store.close().unwrap();

        assert_eq!(file.close_count(), 2);
    }
}
