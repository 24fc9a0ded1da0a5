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

//! Song search across moods.
//!
//! This module provides [`SearchResults`], a lazy iterator over the songs of a
//! collection whose names contain a keyword. Nothing is matched until the
//! iterator is advanced, and cloning it restarts from the same position.

use crate::model::Mood;

#[derive(Debug, Clone)]
pub struct SearchResults<'a> {
    moods: &'a [Mood],
    keyword: String,
    mood_idx: usize,
    song_idx: usize,
}

impl<'a> SearchResults<'a> {
    pub(crate) fn new(moods: &'a [Mood], keyword: &str) -> Self {
        Self {
            moods,
            keyword: keyword.trim().to_lowercase(),
            mood_idx: 0,
            song_idx: 0,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}

impl<'a> Iterator for SearchResults<'a> {
    /// A matching `(mood, song)` pair.
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(mood) = self.moods.get(self.mood_idx) {
            while let Some(song) = mood.songs().get(self.song_idx) {
                self.song_idx += 1;
                if song.to_lowercase().contains(&self.keyword) {
                    return Some((mood.name(), song.as_str()));
                }
            }

            self.mood_idx += 1;
            self.song_idx = 0;
        }

        None
    }
}
