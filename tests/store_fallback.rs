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

use std::fs;

use moodlist::{
    model::Collection,
    session::{ExportFormat, Session},
    store::{DocumentStore, JsonFileBackend, SqliteBackend, StorageBackend, StoreState},
};
use serde_json::Value;
use tempfile::TempDir;

fn seed() -> Collection {
    Collection::from_entries([("happy", vec!["Song A"]), ("sad", vec![])]).unwrap()
}

fn store(relational: SqliteBackend, json: &std::path::Path) -> DocumentStore {
    DocumentStore::new(
        Some(Box::new(relational) as Box<dyn StorageBackend>),
        Box::new(JsonFileBackend::new(json)),
        seed(),
    )
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn healthy_database_keeps_the_json_file_untouched() {
    let dir = TempDir::new().unwrap();
    let json = dir.path().join("playlists.json");
    let mut store = store(SqliteBackend::new(dir.path().join("playlists.db")), &json);

    {
        let mut session = Session::open(&mut store, "ann").unwrap();
        session.add_song("happy", "Song B").unwrap();
        assert_eq!(session.storage(), "SQLite database");
    }
    store.close().unwrap();

    assert_eq!(store.state(), StoreState::Relational);
    assert!(!json.exists());

    let mut reopened = SqliteBackend::new(dir.path().join("playlists.db"));
    let saved = reopened.fetch("ann").unwrap().unwrap();
    assert_eq!(saved.songs("happy").unwrap(), ["Song A", "Song B"]);
}

#[test]
fn unreachable_database_loads_defaults_and_saves_to_file() {
    let dir = TempDir::new().unwrap();
    let json = dir.path().join("playlists.json");
    let unreachable = SqliteBackend::new(dir.path().join("no/such/dir/playlists.db"));
    let mut store = store(unreachable, &json);

    let mut session = Session::open(&mut store, "ann").unwrap();
    assert_eq!(session.collection(), &seed());
    assert_eq!(session.storage(), "JSON file");

    session.create_mood("Focus").unwrap();
    session.add_song("focus", "Deep Work").unwrap();
    drop(session);

    assert_eq!(store.state(), StoreState::File);
    assert!(!dir.path().join("no").exists());

    let document = read_json(&json);
    assert_eq!(document["ann"]["Focus"][0], "Deep Work");
    assert_eq!(document["ann"]["sad"], Value::Array(vec![]));

    let moods: Vec<_> = document["ann"].as_object().unwrap().keys().cloned().collect();
    assert_eq!(moods, ["happy", "sad", "Focus"]);
}

#[test]
fn fallback_load_matches_a_fresh_file_load() {
    let dir = TempDir::new().unwrap();
    let unreachable = SqliteBackend::new(dir.path().join("missing/playlists.db"));
    let mut fallen_back = store(unreachable, &dir.path().join("a.json"));

    let mut file_only = DocumentStore::new(
        None,
        Box::new(JsonFileBackend::new(dir.path().join("b.json"))),
        seed(),
    );

    assert_eq!(fallen_back.load("ann").unwrap(), file_only.load("ann").unwrap());
    assert_eq!(fallen_back.state(), StoreState::File);
    assert_eq!(file_only.state(), StoreState::File);
}

#[test]
fn saving_one_user_keeps_the_others() {
    let dir = TempDir::new().unwrap();
    let json = dir.path().join("playlists.json");
    let mut store = DocumentStore::new(None, Box::new(JsonFileBackend::new(&json)), seed());

    Session::open(&mut store, "ann")
        .unwrap()
        .create_mood("Focus")
        .unwrap();
    Session::open(&mut store, "bob")
        .unwrap()
        .delete_mood("happy")
        .unwrap();
    Session::open(&mut store, "ann")
        .unwrap()
        .add_song("focus", "Deep Work")
        .unwrap();

    let ann = store.load("ann").unwrap();
    let bob = store.load("bob").unwrap();
    assert_eq!(ann.songs("focus").unwrap(), ["Deep Work"]);
    assert_eq!(ann.mood_count(), 3);
    assert!(!bob.contains("happy"));
    assert_eq!(bob.mood_count(), 1);
}

#[test]
fn json_export_reloads_through_the_file_store() {
    let dir = TempDir::new().unwrap();
    let mut store = DocumentStore::new(
        None,
        Box::new(JsonFileBackend::new(dir.path().join("playlists.json"))),
        seed(),
    );

    let mut session = Session::open(&mut store, "ann").unwrap();
    session.add_song("sad", "Fix You, \"Live\"").unwrap();
    let export = dir.path().join("exports/ann.json");
    session.export_to_path(ExportFormat::Json, &export).unwrap();
    let expected = session.collection().clone();
    drop(session);

    let exported = read_json(&export);
    let document = serde_json::json!({ "carol": exported });
    let imported_path = dir.path().join("imported.json");
    fs::write(&imported_path, document.to_string()).unwrap();

    let mut imported = JsonFileBackend::new(&imported_path);
    assert_eq!(imported.fetch("carol").unwrap(), Some(expected));
}

#[test]
fn export_overwrites_existing_files() {
    let dir = TempDir::new().unwrap();
    let mut store = DocumentStore::new(
        None,
        Box::new(JsonFileBackend::new(dir.path().join("playlists.json"))),
        seed(),
    );
    let session = Session::open(&mut store, "ann").unwrap();
    let path = dir.path().join("ann.txt");
    fs::write(&path, "old contents that are much longer than the export\n".repeat(10)).unwrap();

    session.export_to_path(ExportFormat::Txt, &path).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "happy\n  Song A\n\nsad\n  (empty)\n\n"
    );
}
