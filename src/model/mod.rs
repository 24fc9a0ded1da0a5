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

//! Domain models and core data structures.
//!
//! This module defines the playlist [`Collection`], an ordered mapping from
//! mood name to an ordered list of song names, together with every rule that
//! governs how it may change.
//!
//! # Names
//!
//! Mood and song names are trimmed of surrounding whitespace before they are
//! validated, compared or stored. Identity is case-insensitive, but the casing
//! given by the user is what gets stored and displayed.
//!
//! # Indices
//!
//! Song positions are 0-based everywhere in this module. Presentation layers
//! that number songs from one must convert before calling in.

mod document;
pub mod search;
pub mod stats;

use rand::{rng, seq::IndexedRandom};
use thiserror::Error;

pub use search::SearchResults;
pub use stats::{MoodCount, Statistics};

/// Errors raised by [`Collection`] operations.
///
/// A failed operation never leaves the collection partially modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaylistError {
    #[error("{0} name cannot be empty")]
    InvalidName(&'static str),

    #[error("mood '{0}' already exists")]
    DuplicateMood(String),

    #[error("song '{song}' already exists in mood '{mood}'")]
    DuplicateSong { mood: String, song: String },

    #[error("mood '{0}' not found")]
    MoodNotFound(String),

    #[error("song number {} does not exist in mood '{mood}', which has {len} songs", .index.saturating_add(1))]
    IndexOutOfRange {
        mood: String,
        index: usize,
        len: usize,
    },

    #[error("mood '{0}' has no songs")]
    EmptyMood(String),

    #[error("no songs available in any mood")]
    EmptyCollection,
}

pub type Result<T> = std::result::Result<T, PlaylistError>;

/// A named, ordered list of songs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mood {
    name: String,
    songs: Vec<String>,
}

impl Mood {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn songs(&self) -> &[String] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    fn position(&self, song: &str) -> Option<usize> {
        let key = fold(song);
        self.songs.iter().position(|s| fold(s) == key)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.songs.len() {
            Ok(())
        } else {
            Err(PlaylistError::IndexOutOfRange {
                mood: self.name.clone(),
                index,
                len: self.songs.len(),
            })
        }
    }
}

/// A user's moods, in the order they were created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    moods: Vec<Mood>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from `(mood, songs)` pairs, applying the same
    /// validation as [`Collection::create_mood`] and [`Collection::add_song`].
    ///
    /// # Errors
    ///
    /// Returns the first [`PlaylistError`] raised while inserting, such as a
    /// blank name or two moods that differ only in case.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: AsRef<str>,
    {
        let mut collection = Self::new();
        for (mood, songs) in entries {
            collection.create_mood(mood.as_ref())?;
            for song in songs {
                collection.add_song(mood.as_ref(), song.as_ref())?;
            }
        }
        Ok(collection)
    }

    pub fn moods(&self) -> &[Mood] {
        &self.moods
    }

    pub fn mood_count(&self) -> usize {
        self.moods.len()
    }

    pub fn song_count(&self) -> usize {
        self.moods.iter().map(Mood::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.moods.is_empty()
    }

    /// Looks up a mood ignoring case and surrounding whitespace.
    pub fn get(&self, name: &str) -> Option<&Mood> {
        self.index_of(name).map(|idx| &self.moods[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Returns the songs of a mood.
    ///
    /// # Errors
    ///
    /// Returns [`PlaylistError::MoodNotFound`] if no mood matches `name`.
    pub fn songs(&self, name: &str) -> Result<&[String]> {
        self.get(name)
            .map(Mood::songs)
            .ok_or_else(|| not_found(name))
    }

    pub fn create_mood(&mut self, name: &str) -> Result<()> {
        let name = valid_name(name, "mood")?;
        if let Some(existing) = self.get(name) {
            return Err(PlaylistError::DuplicateMood(existing.name.clone()));
        }

        self.moods.push(Mood {
            name: name.to_string(),
            songs: Vec::new(),
        });

        Ok(())
    }

    /// Removes a mood and hands back the songs it held.
    pub fn delete_mood(&mut self, name: &str) -> Result<Vec<String>> {
        let idx = self.index_of(name).ok_or_else(|| not_found(name))?;
        Ok(self.moods.remove(idx).songs)
    }

    /// Renames a mood in place, keeping its songs and its position.
    ///
    /// A new name that differs from the current one only in case is accepted
    /// and simply updates the stored casing.
    pub fn rename_mood(&mut self, old: &str, new: &str) -> Result<()> {
        let idx = self.index_of(old).ok_or_else(|| not_found(old))?;
        let new = valid_name(new, "mood")?;

        if let Some(other) = self.index_of(new) {
            if other != idx {
                return Err(PlaylistError::DuplicateMood(self.moods[other].name.clone()));
            }
        }

        self.moods[idx].name = new.to_string();
        Ok(())
    }

    pub fn add_song(&mut self, mood: &str, song: &str) -> Result<()> {
        let mood = self.mood_mut(mood)?;
        let song = valid_name(song, "song")?;

        if let Some(pos) = mood.position(song) {
            return Err(PlaylistError::DuplicateSong {
                mood: mood.name.clone(),
                song: mood.songs[pos].clone(),
            });
        }

        mood.songs.push(song.to_string());
        Ok(())
    }

    /// Removes the song at `index`; every later song moves up one place.
    pub fn delete_song(&mut self, mood: &str, index: usize) -> Result<String> {
        let mood = self.mood_mut(mood)?;
        mood.check_index(index)?;
        Ok(mood.songs.remove(index))
    }

    /// Replaces the name of the song at `index`, returning the old name.
    pub fn rename_song(&mut self, mood: &str, index: usize, new_name: &str) -> Result<String> {
        let mood = self.mood_mut(mood)?;
        mood.check_index(index)?;
        let new_name = valid_name(new_name, "song")?;

        if let Some(pos) = mood.position(new_name) {
            if pos != index {
                return Err(PlaylistError::DuplicateSong {
                    mood: mood.name.clone(),
                    song: mood.songs[pos].clone(),
                });
            }
        }

        Ok(std::mem::replace(
            &mut mood.songs[index],
            new_name.to_string(),
        ))
    }

    /// Empties every mood but keeps the moods themselves.
    pub fn clear_songs(&mut self) {
        for mood in &mut self.moods {
            mood.songs.clear();
        }
    }

    /// Lazily finds every song whose name contains `keyword`, ignoring case.
    ///
    /// The keyword is trimmed first, so a blank keyword matches every song.
    pub fn search(&self, keyword: &str) -> SearchResults<'_> {
        SearchResults::new(&self.moods, keyword)
    }

    /// Picks a random song, returned as `(mood, song)`.
    ///
    /// With a mood, the pick is uniform over that mood's songs. Without one,
    /// every song across all moods is pooled so each is equally likely,
    /// however the songs are spread between moods.
    ///
    /// # Errors
    ///
    /// * [`PlaylistError::MoodNotFound`] if the given mood does not exist.
    /// * [`PlaylistError::EmptyMood`] if the given mood has no songs.
    /// * [`PlaylistError::EmptyCollection`] if no mood has any songs.
    pub fn surprise_me(&self, mood: Option<&str>) -> Result<(&str, &str)> {
        let mut rng = rng();

        match mood {
            Some(name) => {
                let mood = self.get(name).ok_or_else(|| not_found(name))?;
                let song = mood
                    .songs
                    .choose(&mut rng)
                    .ok_or_else(|| PlaylistError::EmptyMood(mood.name.clone()))?;
                Ok((mood.name.as_str(), song.as_str()))
            }
            None => {
                let pool: Vec<(&str, &str)> = self
                    .moods
                    .iter()
                    .flat_map(|m| m.songs.iter().map(move |s| (m.name.as_str(), s.as_str())))
                    .collect();

                pool.choose(&mut rng)
                    .copied()
                    .ok_or(PlaylistError::EmptyCollection)
            }
        }
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::of(&self.moods)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        let key = fold(name);
        self.moods.iter().position(|m| fold(&m.name) == key)
    }

    fn mood_mut(&mut self, name: &str) -> Result<&mut Mood> {
        match self.index_of(name) {
            Some(idx) => Ok(&mut self.moods[idx]),
            None => Err(not_found(name)),
        }
    }
}

/// Case-insensitive comparison key for a name.
fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}

fn valid_name<'a>(name: &'a str, kind: &'static str) -> Result<&'a str> {
    let name = name.trim();
    if name.is_empty() {
        Err(PlaylistError::InvalidName(kind))
    } else {
        Ok(name)
    }
}

fn not_found(name: &str) -> PlaylistError {
    PlaylistError::MoodNotFound(name.trim().to_string())
}
