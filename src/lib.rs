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

//! # Mood playlist manager.
//!
//! A library for keeping named song collections ("moods") per user, with a
//! small interactive shell on top.
//!
//! ## Architecture
//!
//! * [`model`]: The in-memory [`Collection`](model::Collection) and every
//!   rule about names, duplicates and song positions. No I/O.
//! * [`store`]: Storage backends and the [`DocumentStore`](store::DocumentStore)
//!   that prefers the SQLite database and falls back to a JSON file for the
//!   rest of the process once the database fails.
//! * [`session`]: A user's [`Session`](session::Session), which applies
//!   changes to the collection and writes each one through to the store.
//! * [`shell`]: The numbered text menu used by the binary.
//! * [`config`]: The `confy` configuration file.

pub mod config;
mod db;
pub mod model;
pub mod session;
pub mod shell;
pub mod store;
mod util;
