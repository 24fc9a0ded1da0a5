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

use crate::model::Statistics;

/// Formats a count with the singular or plural form of `noun`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(plural(1, "song"), "1 song");
/// assert_eq!(plural(3, "song"), "3 songs");
/// ```
pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Numbers songs from one for display, or marks the list as empty.
pub(crate) fn song_lines(songs: &[String]) -> Vec<String> {
    if songs.is_empty() {
        return vec!["  (empty)".to_string()];
    }

    songs
        .iter()
        .enumerate()
        .map(|(i, song)| format!("  {:>2}. {song}", i + 1))
        .collect()
}

pub(crate) fn statistics_lines(stats: &Statistics) -> Vec<String> {
    let mut lines = vec![
        format!("Total songs: {}", stats.total_songs),
        format!("Moods: {}", stats.mood_count),
    ];

    if let Some(longest) = &stats.longest {
        lines.push(format!(
            "Longest playlist: {} ({})",
            longest.mood,
            plural(longest.songs, "song")
        ));
    }
    if let Some(shortest) = &stats.shortest {
        lines.push(format!(
            "Shortest playlist: {} ({})",
            shortest.mood,
            plural(shortest.songs, "song")
        ));
    }

    lines.extend(
        stats
            .moods
            .iter()
            .map(|m| format!("  {}: {}", m.mood, plural(m.songs, "song"))),
    );

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Collection;

    #[test]
    fn numbers_songs_from_one() {
        let songs = vec!["a".to_string(), "b".to_string()];

        assert_eq!(song_lines(&songs), ["   1. a", "   2. b"]);
        assert_eq!(song_lines(&[]), ["  (empty)"]);
    }

    #[test]
    fn describes_statistics() {
        let c = Collection::from_entries([("happy", vec!["a", "b"]), ("sad", vec!["c"])]).unwrap();

        assert_eq!(
            statistics_lines(&c.statistics()),
            [
                "Total songs: 3",
                "Moods: 2",
                "Longest playlist: happy (2 songs)",
                "Shortest playlist: sad (1 song)",
                "  happy: 2 songs",
                "  sad: 1 song",
            ]
        );
    }
}
