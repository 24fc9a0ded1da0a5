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

//! Interactive text menu.
//!
//! This module implements a numbered menu over any line-based input and
//! output. It reads the user's choices, prompts for the names and numbers each
//! action needs, calls into the [`Session`] and prints the results.
//!
//! Songs are numbered from one here; the conversion to the 0-based positions
//! used by the session happens at the prompt.

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use thiserror::Error;

use crate::{
    session::{ExportFormat, Session, SessionError},
    util::format::{plural, song_lines, statistics_lines},
};

const MENU: &[(&str, &str)] = &[
    ("1", "Show all playlists"),
    ("2", "Show songs for a mood"),
    ("3", "Add a song to a mood"),
    ("4", "Delete a song from a mood"),
    ("5", "Rename a song"),
    ("6", "Create a new mood"),
    ("7", "Rename a mood"),
    ("8", "Delete a mood"),
    ("9", "Search for a song"),
    ("10", "Surprise me (random song)"),
    ("11", "Playlist statistics"),
    ("12", "Export playlists to a file"),
    ("13", "Clear all playlists"),
    ("0", "Quit"),
];

enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Error)]
enum ActionError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Session(#[from] SessionError),
}

type Action = Result<(), ActionError>;

pub struct Shell<'s, R, W> {
    input: R,
    output: W,
    session: Session<'s>,
    export_dir: PathBuf,
}

impl<'s, R: BufRead, W: Write> Shell<'s, R, W> {
    pub fn new(input: R, output: W, session: Session<'s>, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            input,
            output,
            session,
            export_dir: export_dir.into(),
        }
    }

    /// Runs the menu until the user quits or the input ends.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails; errors
    /// from the actions themselves are printed and the menu carries on.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(
            self.output,
            "Welcome, {}! Your playlists are kept in the {}.",
            self.session.username(),
            self.session.storage()
        )?;

        loop {
            self.print_menu()?;
            let flow = self
                .prompt("Choose an option: ")
                .and_then(|choice| self.dispatch(&choice));

            match flow {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            }
        }

        writeln!(self.output, "Goodbye!")
    }

    fn dispatch(&mut self, choice: &str) -> io::Result<Flow> {
        let parts: Vec<&str> = choice.split_whitespace().collect();

        let result = match parts.as_slice() {
            ["1"] => self.show_all(),
            ["2"] => self.show_mood(),
            ["3"] => self.add_song(),
            ["4"] => self.delete_song(),
            ["5"] => self.rename_song(),
            ["6"] => self.create_mood(),
            ["7"] => self.rename_mood(),
            ["8"] => self.delete_mood(),
            ["9"] => self.search(),
            ["10"] => self.surprise_me(),
            ["11"] => self.statistics(),
            ["12"] => self.export(),
            ["13"] => self.clear(),

            ["0"] | ["q"] | ["quit"] => return Ok(Flow::Quit),

            [] => Ok(()),

            _ => {
                writeln!(self.output, "Unknown option '{}'.", choice.trim())?;
                Ok(())
            }
        };

        match result {
            Ok(()) => {}
            Err(ActionError::Session(e)) => self.report(&e)?,
            Err(ActionError::Io(e)) => return Err(e),
        }

        Ok(Flow::Continue)
    }

    fn show_all(&mut self) -> Action {
        let mut lines = Vec::new();
        for mood in self.session.collection().moods() {
            lines.push(format!("{} ({})", mood.name(), plural(mood.len(), "song")));
            lines.extend(song_lines(mood.songs()));
        }
        if lines.is_empty() {
            lines.push("You have no moods yet.".to_string());
        }

        self.print_lines(&lines)
    }

    fn show_mood(&mut self) -> Action {
        let mood = self.prompt("Mood: ")?;
        self.list_songs(&mood)
    }

    fn add_song(&mut self) -> Action {
        let mood = self.prompt("Mood: ")?;
        let song = self.prompt("Song name: ")?;
        self.session.add_song(&mood, &song)?;
        writeln!(self.output, "Added '{}' to '{}'.", song.trim(), mood.trim())?;
        Ok(())
    }

    fn delete_song(&mut self) -> Action {
        let mood = self.prompt("Mood: ")?;
        self.list_songs(&mood)?;
        let index = self.prompt_number("Song number to delete: ")?;
        let removed = self.session.delete_song(&mood, index)?;
        writeln!(self.output, "Deleted '{removed}'.")?;
        Ok(())
    }

    fn rename_song(&mut self) -> Action {
        let mood = self.prompt("Mood: ")?;
        self.list_songs(&mood)?;
        let index = self.prompt_number("Song number to rename: ")?;
        let new_name = self.prompt("New song name: ")?;
        let old = self.session.rename_song(&mood, index, &new_name)?;
        writeln!(self.output, "Renamed '{old}' to '{}'.", new_name.trim())?;
        Ok(())
    }

    fn create_mood(&mut self) -> Action {
        let mood = self.prompt("New mood name: ")?;
        self.session.create_mood(&mood)?;
        writeln!(self.output, "Created mood '{}'.", mood.trim())?;
        Ok(())
    }

    fn rename_mood(&mut self) -> Action {
        let old = self.prompt("Mood to rename: ")?;
        let new = self.prompt("New mood name: ")?;
        self.session.rename_mood(&old, &new)?;
        writeln!(self.output, "Renamed mood '{}' to '{}'.", old.trim(), new.trim())?;
        Ok(())
    }

    fn delete_mood(&mut self) -> Action {
        let mood = self.prompt("Mood to delete: ")?;
        let songs = self.session.delete_mood(&mood)?;
        writeln!(
            self.output,
            "Deleted mood '{}' and its {}.",
            mood.trim(),
            plural(songs.len(), "song")
        )?;
        Ok(())
    }

    fn search(&mut self) -> Action {
        let answer = self.prompt("Search for: ")?;
        let results = self.session.search(&answer);
        let keyword = results.keyword().to_string();
        let lines: Vec<String> = results
            .map(|(mood, song)| format!("  [{mood}] {song}"))
            .collect();

        if lines.is_empty() {
            writeln!(self.output, "No songs match '{keyword}'.")?;
            return Ok(());
        }

        writeln!(self.output, "Found {}:", plural(lines.len(), "song"))?;
        self.print_lines(&lines)
    }

    fn surprise_me(&mut self) -> Action {
        let mood = self.prompt("Mood (leave blank for any): ")?;
        let mood = Some(mood.trim()).filter(|m| !m.is_empty());

        let line = {
            let (mood, song) = self.session.surprise_me(mood)?;
            format!("Your surprise song: {song} (from '{mood}')")
        };

        writeln!(self.output, "{line}")?;
        Ok(())
    }

    fn statistics(&mut self) -> Action {
        let lines = statistics_lines(&self.session.statistics());
        self.print_lines(&lines)
    }

    fn export(&mut self) -> Action {
        let format = self.prompt("Format (txt, csv, json): ")?;
        let format: ExportFormat = match format.parse() {
            Ok(format) => format,
            Err(e) => {
                writeln!(self.output, "{e}")?;
                return Ok(());
            }
        };

        let default_name = format!("{}_playlists.{}", self.session.username(), format.extension());
        let name = self.prompt(&format!("File name [{default_name}]: "))?;
        let name = match name.trim() {
            "" => default_name,
            name => name.to_string(),
        };

        let path = self.export_dir.join(name);
        self.session.export_to_path(format, &path)?;
        writeln!(self.output, "Exported to {}.", path.display())?;
        Ok(())
    }

    fn clear(&mut self) -> Action {
        let answer = self.prompt("This empties every mood. Type 'yes' to continue: ")?;
        if answer.trim().eq_ignore_ascii_case("yes") {
            self.session.clear_songs()?;
            writeln!(self.output, "All playlists cleared.")?;
        } else {
            writeln!(self.output, "Nothing was changed.")?;
        }
        Ok(())
    }

    fn list_songs(&mut self, mood: &str) -> Action {
        let lines = song_lines(self.session.collection().songs(mood).map_err(SessionError::from)?);
        self.print_lines(&lines)
    }

    fn report(&mut self, error: &SessionError) -> io::Result<()> {
        writeln!(self.output, "Error: {error}")?;
        if let SessionError::Persistence { .. } = error {
            writeln!(
                self.output,
                "The change is kept for this session and will be saved with the next successful change."
            )?;
        }
        Ok(())
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        for (key, label) in MENU {
            writeln!(self.output, "{key:>2}. {label}")?;
        }
        Ok(())
    }

    fn print_lines(&mut self, lines: &[String]) -> Action {
        for line in lines {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> io::Result<String> {
        read_answer(&mut self.input, &mut self.output, label)
    }

    /// Asks for a song number counted from one and returns it as a 0-based
    /// index, asking again until the answer is a positive whole number.
    fn prompt_number(&mut self, label: &str) -> io::Result<usize> {
        loop {
            let answer = self.prompt(label)?;
            match answer.trim().parse::<usize>() {
                Ok(n) if n >= 1 => return Ok(n - 1),
                _ => writeln!(self.output, "Please enter a number of 1 or more.")?,
            }
        }
    }
}

/// Asks for a username until a non-blank one is given.
pub fn ask_username<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<String> {
    loop {
        let name = read_answer(input, output, "Username: ")?;
        if !name.trim().is_empty() {
            return Ok(name.trim().to_string());
        }
        writeln!(output, "Username cannot be empty.")?;
    }
}

/// Prints `label`, then reads one line without its line ending.
///
/// End of input is reported as [`io::ErrorKind::UnexpectedEof`].
fn read_answer<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> io::Result<String> {
    write!(output, "{label}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
    }

    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}
