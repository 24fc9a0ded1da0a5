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

//! Collection export formats.
//!
//! * **TXT**: each mood on its own line, its songs indented beneath it and a
//!   blank line after each mood.
//! * **CSV**: a `mood,song` header and one row per song. An empty mood gets a
//!   single row with an empty song so that it is not lost.
//! * **JSON**: an object mapping each mood to its songs, the same shape the
//!   JSON file store keeps per user.

use std::{fmt, io, str::FromStr};

use thiserror::Error;

use crate::model::Collection;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Txt,
    Csv,
    Json,
}

#[derive(Debug, Error)]
#[error("unknown export format '{0}', expected txt, csv or json")]
pub struct UnknownFormat(String);

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "txt" => Ok(ExportFormat::Txt),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(UnknownFormat(s.trim().to_string())),
        }
    }
}

pub(crate) fn write(format: ExportFormat, collection: &Collection, w: &mut impl io::Write) -> io::Result<()> {
    match format {
        ExportFormat::Txt => write_txt(collection, w),
        ExportFormat::Csv => write_csv(collection, w),
        ExportFormat::Json => write_json(collection, w),
    }
}

fn write_txt(collection: &Collection, w: &mut impl io::Write) -> io::Result<()> {
    for mood in collection.moods() {
        writeln!(w, "{}", mood.name())?;
        if mood.is_empty() {
            writeln!(w, "  (empty)")?;
        }
        for song in mood.songs() {
            writeln!(w, "  {song}")?;
        }
        writeln!(w)?;
    }
    Ok(())
}

fn write_csv(collection: &Collection, w: &mut impl io::Write) -> io::Result<()> {
    w.write_all(b"mood,song\r\n")?;
    for mood in collection.moods() {
        if mood.is_empty() {
            write!(w, "{},\r\n", csv_field(mood.name()))?;
        }
        for song in mood.songs() {
            write!(w, "{},{}\r\n", csv_field(mood.name()), csv_field(song))?;
        }
    }
    Ok(())
}

fn write_json(collection: &Collection, w: &mut impl io::Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, collection)?;
    writeln!(w)
}

/// Quotes a field when it holds a delimiter, quote or line break.
fn csv_field(value: &str) -> std::borrow::Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\"")).into()
    } else {
        value.into()
    }
}
