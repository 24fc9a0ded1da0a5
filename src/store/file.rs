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

//! JSON document storage backend.
//!
//! All users share one JSON file shaped as `{ username: { mood: [songs] } }`.
//! Saving a user rewrites the whole file, replacing only that user's entry;
//! other entries are carried over as raw JSON values without being decoded.
//!
//! A missing file is an empty document. A file that is not valid JSON, or
//! whose top level is not an object, is logged and treated as empty, so the
//! next save replaces it.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    model::Collection,
    store::{BackendError, StorageBackend},
};

type Document = Map<String, Value>;

#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Document, BackendError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(document)) => Ok(document),
            Ok(_) => {
                warn!(
                    "Unexpected data format in {}, treating it as empty",
                    self.path.display()
                );
                Ok(Document::new())
            }
            Err(e) => {
                warn!(
                    "Corrupted playlist file {} ({e}), treating it as empty",
                    self.path.display()
                );
                Ok(Document::new())
            }
        }
    }

    /// Writes to a temporary sibling first and renames it over the target so
    /// a failed write never leaves a truncated document behind.
    fn write_document(&self, document: &Document) -> Result<(), BackendError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        let written = write_pretty(&tmp, document).and_then(|()| fs::rename(&tmp, &self.path).map_err(BackendError::from));

        if written.is_err() {
            if let Err(e) = fs::remove_file(&tmp) {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!("Failed to remove {}: {e}", tmp.display());
                }
            }
        }

        written
    }
}

fn write_pretty(path: &Path, document: &Document) -> Result<(), BackendError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, document)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

impl StorageBackend for JsonFileBackend {
    fn name(&self) -> &'static str {
        "JSON file"
    }

    fn fetch(&mut self, username: &str) -> Result<Option<Collection>, BackendError> {
        let document = self.read_document()?;

        match document.get(username) {
            Some(value) => Ok(Some(Collection::deserialize(value)?)),
            None => Ok(None),
        }
    }

    fn store(&mut self, username: &str, collection: &Collection) -> Result<(), BackendError> {
        let mut document = self.read_document()?;
        document.insert(username.to_string(), serde_json::to_value(collection)?);
        self.write_document(&document)
    }

    fn close(&mut self) -> Result<(), BackendError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn backend() -> (TempDir, JsonFileBackend) {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("playlists.json"));
        (dir, backend)
    }

    fn sample() -> Collection {
        Collection::from_entries([("Zen", vec!["b", "a"]), ("alpha", vec![])]).unwrap()
    }

    #[test]
    fn missing_file_has_no_records() {
        let (_dir, mut backend) = backend();

        assert_eq!(backend.fetch("ann").unwrap(), None);
    }

    #[test]
    fn stores_and_fetches_in_order() {
        let (_dir, mut backend) = backend();
        backend.store("ann", &sample()).unwrap();

        assert_eq!(backend.fetch("ann").unwrap(), Some(sample()));

        let raw: Value = serde_json::from_str(&fs::read_to_string(backend.path()).unwrap()).unwrap();
        let moods: Vec<_> = raw["ann"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(moods, ["Zen", "alpha"]);
    }

    #[test]
    fn saving_one_user_leaves_other_entries_alone() {
        let (_dir, mut backend) = backend();
        fs::write(
            backend.path(),
            r#"{"bob": {"password": "x", "playlists": {"rock": ["a"]}}, "cy": {"jazz": []}}"#,
        )
        .unwrap();

        backend.store("ann", &sample()).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(backend.path()).unwrap()).unwrap();
        assert_eq!(raw["bob"]["playlists"]["rock"][0], "a");
        assert_eq!(raw["bob"]["password"], "x");
        assert_eq!(backend.fetch("cy").unwrap().unwrap().mood_count(), 1);
        assert_eq!(backend.fetch("ann").unwrap(), Some(sample()));
    }

    #[test]
    fn corrupt_file_is_treated_as_empty_and_rewritten() {
        let (_dir, mut backend) = backend();
        fs::write(backend.path(), "{ not json").unwrap();

        assert_eq!(backend.fetch("ann").unwrap(), None);

        backend.store("ann", &sample()).unwrap();
        assert_eq!(backend.fetch("ann").unwrap(), Some(sample()));
    }

    #[test]
    fn non_object_document_is_treated_as_empty() {
        let (_dir, mut backend) = backend();
        fs::write(backend.path(), "[1, 2, 3]").unwrap();

        assert_eq!(backend.fetch("ann").unwrap(), None);
    }

    #[test]
    fn malformed_user_entry_is_an_error() {
        let (_dir, mut backend) = backend();
        fs::write(backend.path(), r#"{"ann": {"happy": "not a list"}}"#).unwrap();

        assert!(matches!(backend.fetch("ann"), Err(BackendError::Json(_))));
    }

    #[test]
    fn failed_write_leaves_no_temporary_file() {
        let (dir, backend) = backend();
        fs::create_dir(backend.path()).unwrap();

        assert!(backend.write_document(&Document::new()).is_err());
        assert!(!dir.path().join("playlists.json.tmp").exists());
        assert!(backend.path().is_dir());
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = JsonFileBackend::new(dir.path().join("nested/deeper/playlists.json"));

        backend.store("ann", &sample()).unwrap();
        assert!(backend.path().exists());
    }
}
