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

//! Collection statistics.

use crate::model::Mood;

/// Song count for a single mood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodCount {
    pub mood: String,
    pub songs: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Per-mood counts, in mood order.
    pub moods: Vec<MoodCount>,
    pub total_songs: usize,
    pub mood_count: usize,
    /// The mood with the most songs; the earliest one wins a tie.
    pub longest: Option<MoodCount>,
    /// The mood with the fewest songs; the earliest one wins a tie.
    pub shortest: Option<MoodCount>,
}

impl Statistics {
    pub(crate) fn of(moods: &[Mood]) -> Self {
        let counts: Vec<MoodCount> = moods
            .iter()
            .map(|m| MoodCount {
                mood: m.name().to_string(),
                songs: m.len(),
            })
            .collect();

        let mut longest: Option<&MoodCount> = None;
        let mut shortest: Option<&MoodCount> = None;
        for count in &counts {
            if longest.is_none_or(|l| count.songs > l.songs) {
                longest = Some(count);
            }
            if shortest.is_none_or(|s| count.songs < s.songs) {
                shortest = Some(count);
            }
        }

        Self {
            total_songs: counts.iter().map(|c| c.songs).sum(),
            mood_count: counts.len(),
            longest: longest.cloned(),
            shortest: shortest.cloned(),
            moods: counts,
        }
    }
}
