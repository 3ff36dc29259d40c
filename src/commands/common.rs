//! Common CLI options shared across commands.
//!
//! This module provides shared argument structures that can be composed into
//! command structs using `#[command(flatten)]`, plus small output helpers.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use lanekit_lib::store::MemoryStore;

/// Store-file option shared by every command.
#[derive(Debug, Clone, Args)]
pub struct StoreOptions {
    /// JSON store snapshot file
    #[arg(short = 's', long = "store")]
    pub store: PathBuf,
}

impl StoreOptions {
    /// Load the store snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or not a valid snapshot.
    pub fn load(&self) -> Result<MemoryStore> {
        MemoryStore::load(&self.store)
    }
}

/// Serialize a listing as pretty JSON to a file, or to stdout when no
/// output path was given.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_json<T: Serialize>(output: Option<&PathBuf>, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write listing: {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("Failed to write listing to stdout")
        }
    }
}
