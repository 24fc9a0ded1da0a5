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

//! Relational storage backend.
//!
//! This module stores playlists in an SQLite database, one row per user, with
//! the user's whole collection serialised as JSON in the `data` column.
//!
//! # Tables
//!
//! * `playlists` - Keyed by username; holds the collection plus creation and
//!   update timestamps.
//!
//! The connection is opened on first use rather than on construction, so a
//! database that cannot be reached surfaces as a failed `fetch` or `store`
//! and the [`DocumentStore`](crate::store::DocumentStore) can fall back.

mod model;

use std::path::{Path, PathBuf};

use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, params};

use crate::{
    model::Collection,
    store::{BackendError, StorageBackend},
};

/// Opens a connection to the SQLite database and prepares it for use.
///
/// This function performs the following setup:
/// * **WAL Mode**: Requests Write-Ahead Logging, keeping the default journal
///   if the database cannot use it.
/// * **Performance Tuning**: Sets synchronous mode to `NORMAL`.
/// * **Schema**: Executes [`create_schema`] to ensure the table exists.
///
/// # Errors
///
/// Returns an error if the database file cannot be opened or created, or if
/// the schema initialisation fails.
pub(crate) fn init_db(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;

    let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
    if journal_mode != "wal" {
        debug!("WAL unavailable for {}, journal mode is {journal_mode}", path.display());
    }

    conn.execute_batch("PRAGMA synchronous = NORMAL;")?;

    create_schema(&conn)?;

    Ok(conn)
}

/// Create the database schema.
fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS playlists (
            username TEXT PRIMARY KEY NOT NULL,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );",
    )
}

/// Fetches the stored collection for a user.
///
/// # Errors
///
/// Returns a [`rusqlite::Error`] if the query fails or if the stored `data`
/// column does not decode as a collection.
pub(crate) fn fetch_playlists(conn: &Connection, username: &str) -> rusqlite::Result<Option<Collection>> {
    let mut stmt = conn.prepare_cached("SELECT data FROM playlists WHERE username = ?1")?;
    stmt.query_row([username], |row| row.get(0)).optional()
}

/// Inserts or replaces the stored collection for a user.
pub(crate) fn upsert_playlists(
    conn: &Connection,
    username: &str,
    collection: &Collection,
) -> rusqlite::Result<()> {
    let sql = "
        INSERT INTO playlists (username, data)
        VALUES (?1, ?2)
        ON CONFLICT (username)
        DO UPDATE SET data = ?2, updated_at = CURRENT_TIMESTAMP";

    let mut stmt = conn.prepare_cached(sql)?;
    stmt.execute(params![username, collection])?;

    Ok(())
}

/// SQLite implementation of [`StorageBackend`].
pub struct SqliteBackend {
    path: PathBuf,
    conn: Option<Connection>,
}

impl SqliteBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: None,
        }
    }

    fn connection(&mut self) -> rusqlite::Result<&Connection> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                let conn = init_db(&self.path)?;
                info!("Connected to SQLite database {}", self.path.display());
                conn
            }
        };

        Ok(self.conn.insert(conn))
    }
}

impl StorageBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "SQLite database"
    }

    fn fetch(&mut self, username: &str) -> Result<Option<Collection>, BackendError> {
        Ok(fetch_playlists(self.connection()?, username)?)
    }

    fn store(&mut self, username: &str, collection: &Collection) -> Result<(), BackendError> {
        Ok(upsert_playlists(self.connection()?, username, collection)?)
    }

    fn close(&mut self) -> Result<(), BackendError> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| e)?;
            info!("Closed SQLite database {}", self.path.display());
        }
        Ok(())
    }
}
