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

//! Application configuration.
//!
//! This module manages the application configuration file, read and written
//! with `confy` as TOML. Missing files are created with the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{Collection, PlaylistError};

const CONFIG_NAME: &str = "moodlist";

/// A mood, with its songs, handed to users who have no stored playlists.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DefaultMood {
    pub name: String,
    pub songs: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    /// Prefer the SQLite database over the JSON file.
    pub use_relational_store: bool,
    pub database_file: String,
    pub json_file: String,
    pub export_dir: String,
    /// Default log filter; `RUST_LOG` takes precedence.
    pub log_level: String,
    /// File that log lines are appended to; empty logs to stderr.
    pub log_file: String,
    pub default_moods: Vec<DefaultMood>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            use_relational_store: true,
            database_file: "playlists.db".into(),
            json_file: "playlists.json".into(),
            export_dir: "exports".into(),
            log_level: "info".into(),
            log_file: "moodlist.log".into(),
            default_moods: default_moods(),
        }
    }
}

impl AppConfig {
    /// Builds the seed collection from [`AppConfig::default_moods`].
    ///
    /// # Errors
    ///
    /// Returns a [`PlaylistError`] if the configured moods break the naming
    /// rules, for example two moods that differ only in case.
    pub fn seed_collection(&self) -> Result<Collection, PlaylistError> {
        Collection::from_entries(
            self.default_moods
                .iter()
                .map(|m| (m.name.as_str(), m.songs.iter().map(String::as_str).collect())),
        )
    }
}

fn default_moods() -> Vec<DefaultMood> {
    let mood = |name: &str, songs: [&str; 3]| DefaultMood {
        name: name.into(),
        songs: songs.iter().map(|s| s.to_string()).collect(),
    };

    vec![
        mood(
            "happy",
            [
                "Happy - Pharrell Williams",
                "Can't Stop the Feeling - Justin Timberlake",
                "Uptown Funk - Bruno Mars",
            ],
        ),
        mood(
            "sad",
            [
                "Someone Like You - Adele",
                "Let Her Go - Passenger",
                "Fix You - Coldplay",
            ],
        ),
        mood(
            "energetic",
            [
                "Stronger - Kanye West",
                "Eye of the Tiger - Survivor",
                "Titanium - David Guetta ft. Sia",
            ],
        ),
        mood(
            "calm",
            [
                "Weightless - Marconi Union",
                "River Flows in You - Yiruma",
                "Sunrise - Norah Jones",
            ],
        ),
    ]
}

/// Loads the configuration from `path`, or from the platform default
/// location when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, confy::ConfyError> {
    match path {
        Some(path) => confy::load_path(path),
        None => confy::load(CONFIG_NAME, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_seed_has_four_moods() {
        let seed = AppConfig::default().seed_collection().unwrap();

        let names: Vec<_> = seed.moods().iter().map(|m| m.name()).collect();
        assert_eq!(names, ["happy", "sad", "energetic", "calm"]);
        assert_eq!(seed.song_count(), 12);
    }

    #[test]
    fn invalid_seed_is_rejected() {
        let config = AppConfig {
            default_moods: vec![
                DefaultMood {
                    name: "Chill".into(),
                    songs: vec![],
                },
                DefaultMood {
                    name: "chill".into(),
                    songs: vec![],
                },
            ],
            ..AppConfig::default()
        };

        assert_eq!(
            config.seed_collection(),
            Err(PlaylistError::DuplicateMood("Chill".into()))
        );
    }

    #[test]
    fn round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moodlist.toml");

        let created = load_config(Some(path.as_path())).unwrap();
        assert!(path.exists());
        assert!(created.use_relational_store);

        let mut changed = created.clone();
        changed.use_relational_store = false;
        changed.log_file = String::new();
        changed.default_moods.truncate(1);
        confy::store_path(&path, &changed).unwrap();

        let loaded = load_config(Some(path.as_path())).unwrap();
        assert!(!loaded.use_relational_store);
        assert_eq!(loaded.log_file, "");
        assert_eq!(loaded.default_moods, changed.default_moods);
    }
}
