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
//! Opens the configured playlist storage, starts a session for a user and
//! runs the interactive menu until the user quits.

use std::{
    fs::OpenOptions,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};

use moodlist::{
    config::{self, AppConfig},
    session::Session,
    shell::{self, Shell},
    store::{DocumentStore, JsonFileBackend, SqliteBackend, StorageBackend},
};

#[derive(Parser, Debug)]
#[command(name = "moodlist")]
#[command(about = "Manage mood playlists from the terminal", long_about = None)]
struct Args {
    /// User whose playlists to open (asked for when omitted)
    #[arg(short, long)]
    user: Option<String>,

    /// Configuration file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep playlists in the JSON file even if a database is configured
    #[arg(long)]
    file_store: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// The entry point of the application.
///
/// Loads configuration, sets up logging and storage, runs the menu for one
/// user and always closes the storage before returning.
fn main() -> Result<()> {
    let args = Args::parse();

    let (config, config_error) = match config::load_config(args.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_logging(&config, args.verbose)?;
    if let Some(e) = config_error {
        warn!("Failed to load configuration ({e}), using defaults");
    }
    info!("moodlist started");

    let mut store = open_store(&config, args.file_store)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();

    let res = match args.user {
        Some(user) => run(&mut store, &user, &config, input, output),
        None => shell::ask_username(&mut input, &mut output)
            .context("Failed to read username")
            .and_then(|user| run(&mut store, &user, &config, input, output)),
    };

    let closed = store.close().context("Failed to close playlist storage");
    info!("moodlist stopped");

    finish(res, closed)
}

/// Combines the outcome of the session with the outcome of closing the store.
///
/// A session error wins over a close error; the close error is always logged
/// so it is not lost either way.
fn finish(res: Result<()>, closed: Result<()>) -> Result<()> {
    if let Err(e) = &closed {
        error!("{e:#}");
    }
    res.and(closed)
}

/// Configures `env_logger`, appending to the configured log file if there is
/// one. `RUST_LOG` overrides the configured level.
fn init_logging(config: &AppConfig, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { config.log_level.as_str() };
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));

    if !config.log_file.is_empty() {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .with_context(|| format!("Failed to open log file {}", config.log_file))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

/// Builds the document store, with the SQLite backend in front of the JSON
/// file unless the file store is forced.
fn open_store(config: &AppConfig, force_file: bool) -> Result<DocumentStore> {
    let seed = config
        .seed_collection()
        .context("Invalid default moods in configuration")?;

    let relational = (config.use_relational_store && !force_file)
        .then(|| Box::new(SqliteBackend::new(&config.database_file)) as Box<dyn StorageBackend>);
    let file = Box::new(JsonFileBackend::new(&config.json_file));

    Ok(DocumentStore::new(relational, file, seed))
}

fn run(
    store: &mut DocumentStore,
    user: &str,
    config: &AppConfig,
    input: impl BufRead,
    output: impl Write,
) -> Result<()> {
    let session = Session::open(store, user).context("Failed to open session")?;

    Shell::new(input, output, session, &config.export_dir)
        .run()
        .context("Terminal input/output failed")
}
