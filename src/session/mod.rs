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

//! User operations.
//!
//! A [`Session`] binds one username to its loaded [`Collection`] and to the
//! [`DocumentStore`] it came from. Every change that succeeds in memory is
//! saved straight away. If that save fails the change is kept in memory and
//! the caller gets [`SessionError::Persistence`]; [`Session::save`] retries.

mod export;

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use thiserror::Error;

use crate::{
    model::{Collection, PlaylistError, SearchResults, Statistics},
    store::{DocumentStore, StoreError},
};

pub use export::{ExportFormat, UnknownFormat};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("username cannot be empty")]
    InvalidUsername,

    #[error(transparent)]
    Playlist(#[from] PlaylistError),

    #[error("could not load playlists for '{username}'")]
    Load {
        username: String,
        #[source]
        source: StoreError,
    },

    #[error("{operation} succeeded but the change could not be saved")]
    Persistence {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("could not export playlists to {}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SessionError>;

pub struct Session<'a> {
    username: String,
    collection: Collection,
    store: &'a mut DocumentStore,
}

impl<'a> Session<'a> {
    /// Loads the user's collection and opens a session for it.
    ///
    /// # Errors
    ///
    /// * [`SessionError::InvalidUsername`] if `username` is blank.
    /// * [`SessionError::Load`] if the store cannot provide a collection.
    pub fn open(store: &'a mut DocumentStore, username: &str) -> Result<Self> {
        let username = username.trim();
        if username.is_empty() {
            return Err(SessionError::InvalidUsername);
        }

        let collection = store.load(username).map_err(|source| SessionError::Load {
            username: username.to_string(),
            source,
        })?;

        info!(
            "User '{}' opened a session with {} moods",
            username,
            collection.mood_count()
        );

        Ok(Self {
            username: username.to_string(),
            collection,
            store,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Names the storage backend currently in use.
    pub fn storage(&self) -> &'static str {
        self.store.describe()
    }

    pub fn create_mood(&mut self, name: &str) -> Result<()> {
        self.apply(|c| c.create_mood(name))?;
        info!("User '{}' created mood '{}'", self.username, name.trim());
        self.persist("creating the mood")
    }

    pub fn delete_mood(&mut self, name: &str) -> Result<Vec<String>> {
        let songs = self.apply(|c| c.delete_mood(name))?;
        info!(
            "User '{}' deleted mood '{}' with {} songs",
            self.username,
            name.trim(),
            songs.len()
        );
        self.persist("deleting the mood")?;
        Ok(songs)
    }

    pub fn rename_mood(&mut self, old: &str, new: &str) -> Result<()> {
        self.apply(|c| c.rename_mood(old, new))?;
        info!(
            "User '{}' renamed mood '{}' to '{}'",
            self.username,
            old.trim(),
            new.trim()
        );
        self.persist("renaming the mood")
    }

    pub fn add_song(&mut self, mood: &str, song: &str) -> Result<()> {
        self.apply(|c| c.add_song(mood, song))?;
        info!(
            "User '{}' added song '{}' to mood '{}'",
            self.username,
            song.trim(),
            mood.trim()
        );
        self.persist("adding the song")
    }

    /// Removes the song at the 0-based `index`, returning its name.
    pub fn delete_song(&mut self, mood: &str, index: usize) -> Result<String> {
        let removed = self.apply(|c| c.delete_song(mood, index))?;
        info!(
            "User '{}' deleted song '{}' from mood '{}'",
            self.username,
            removed,
            mood.trim()
        );
        self.persist("deleting the song")?;
        Ok(removed)
    }

    /// Renames the song at the 0-based `index`, returning its old name.
    pub fn rename_song(&mut self, mood: &str, index: usize, new_name: &str) -> Result<String> {
        let old = self.apply(|c| c.rename_song(mood, index, new_name))?;
        info!(
            "User '{}' renamed song '{}' to '{}' in mood '{}'",
            self.username,
            old,
            new_name.trim(),
            mood.trim()
        );
        self.persist("renaming the song")?;
        Ok(old)
    }

    pub fn clear_songs(&mut self) -> Result<()> {
        self.collection.clear_songs();
        warn!("User '{}' cleared all playlists", self.username);
        self.persist("clearing the playlists")
    }

    pub fn search(&self, keyword: &str) -> SearchResults<'_> {
        debug!("User '{}' searched for '{}'", self.username, keyword.trim());
        self.collection.search(keyword)
    }

    pub fn surprise_me(&self, mood: Option<&str>) -> Result<(&str, &str)> {
        let (mood, song) = self.collection.surprise_me(mood).inspect_err(|e| {
            warn!("User '{}' asked for a surprise: {e}", self.username);
        })?;
        debug!("User '{}' got '{song}' from mood '{mood}'", self.username);
        Ok((mood, song))
    }

    pub fn statistics(&self) -> Statistics {
        self.collection.statistics()
    }

    /// Saves the current collection, for retrying after a
    /// [`SessionError::Persistence`].
    pub fn save(&mut self) -> Result<()> {
        self.persist("saving")
    }

    /// Writes the whole collection to `sink` in the given format.
    pub fn export(&self, format: ExportFormat, sink: &mut impl Write) -> io::Result<()> {
        export::write(format, &self.collection, sink)
    }

    /// Writes the whole collection to a file, replacing any existing file and
    /// creating missing parent directories.
    pub fn export_to_path(&self, format: ExportFormat, path: &Path) -> Result<()> {
        let write = || -> io::Result<()> {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let mut writer = BufWriter::new(File::create(path)?);
            self.export(format, &mut writer)?;
            writer.flush()
        };

        write().map_err(|source| {
            warn!(
                "User '{}' failed to export to {}: {source}",
                self.username,
                path.display()
            );
            SessionError::Export {
                path: path.to_path_buf(),
                source,
            }
        })?;

        info!(
            "User '{}' exported playlists as {} to {}",
            self.username,
            format,
            path.display()
        );
        Ok(())
    }

    fn apply<T>(
        &mut self,
        change: impl FnOnce(&mut Collection) -> std::result::Result<T, PlaylistError>,
    ) -> Result<T> {
        change(&mut self.collection).map_err(|e| {
            warn!("User '{}' change rejected: {e}", self.username);
            SessionError::from(e)
        })
    }

    fn persist(&mut self, operation: &'static str) -> Result<()> {
        self.store
            .save(&self.username, &self.collection)
            .map_err(|source| SessionError::Persistence { operation, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;

    fn store(file: &MemoryBackend) -> DocumentStore {
        let seed = Collection::from_entries([("happy", vec!["Song A"]), ("sad", vec![])]).unwrap();
        DocumentStore::new(None, Box::new(file.clone()), seed)
    }

    #[test]
    fn open_rejects_blank_username() {
        let file = MemoryBackend::new();
        let mut store = store(&file);

        assert!(matches!(
            Session::open(&mut store, "  "),
            Err(SessionError::InvalidUsername)
        ));
    }

    #[test]
    fn open_fails_when_storage_is_down() {
        let file = MemoryBackend::failing();
        let mut store = store(&file);

        assert!(matches!(
            Session::open(&mut store, "ann"),
            Err(SessionError::Load { .. })
        ));
    }

    #[test]
    fn every_mutation_is_written_through() {
        let file = MemoryBackend::new();
        let mut store = store(&file);
        let mut session = Session::open(&mut store, "ann").unwrap();

        session.create_mood("Focus").unwrap();
        session.add_song("focus", "Deep Work").unwrap();
        session.rename_song("focus", 0, "Deeper Work").unwrap();
        session.rename_mood("focus", "Study").unwrap();
        assert_eq!(session.delete_song("happy", 0).unwrap(), "Song A");
        session.delete_mood("sad").unwrap();

        assert_eq!(file.store_count(), 6);
        assert_eq!(file.record("ann").as_ref(), Some(session.collection()));

        session.clear_songs().unwrap();
        assert_eq!(file.store_count(), 7);
        assert_eq!(file.record("ann").unwrap().song_count(), 0);
    }

    #[test]
    fn rejected_changes_are_not_saved() {
        let file = MemoryBackend::new();
        let mut store = store(&file);
        let mut session = Session::open(&mut store, "ann").unwrap();

        let err = session.add_song("HAPPY", "song a").unwrap_err();
        assert!(matches!(
            err,
            SessionError::Playlist(PlaylistError::DuplicateSong { .. })
        ));
        assert_eq!(file.store_count(), 0);
    }

    #[test]
    fn failed_save_keeps_change_in_memory() {
        let file = MemoryBackend::new();
        let mut store = store(&file);
        let mut session = Session::open(&mut store, "ann").unwrap();

        file.set_failing(true);
        let err = session.add_song("happy", "Song B").unwrap_err();
        assert!(matches!(
            err,
            SessionError::Persistence {
                operation: "adding the song",
                ..
            }
        ));
        assert_eq!(session.collection().songs("happy").unwrap(), ["Song A", "Song B"]);
        assert_eq!(file.record("ann"), None);

        file.set_failing(false);
        session.save().unwrap();
        assert_eq!(file.record("ann").as_ref(), Some(session.collection()));
    }

    #[test]
    fn reads_do_not_save() {
        let file = MemoryBackend::new();
        let mut store = store(&file);
        let session = Session::open(&mut store, "ann").unwrap();

        assert_eq!(session.search("song").count(), 1);
        assert_eq!(session.surprise_me(None).unwrap(), ("happy", "Song A"));
        assert_eq!(session.statistics().total_songs, 1);
        assert_eq!(file.store_count(), 0);
    }

    #[test]
    fn sessions_load_their_own_user() {
        let file = MemoryBackend::new();
        let mut store = store(&file);
        let mut other = Collection::new();
        other.create_mood("jazz").unwrap();
        file.insert("bob", other.clone());

        assert_eq!(Session::open(&mut store, "bob").unwrap().collection(), &other);
        assert_eq!(Session::open(&mut store, " ann ").unwrap().username(), "ann");
    }
}
