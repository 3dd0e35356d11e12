//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `autostart-sync` command-line tool. Each subcommand is defined in its own
//! file.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the global options and the parsed
//!   `Args` and performs the command's logic.
//!
//! Every command scans the autostart directories first and, when it edits
//! anything, calls [`finish`] so pending saves are written before the process
//! exits.

pub mod add;
pub mod edit;
pub mod import;
pub mod list;
pub mod remove;
pub mod toggle;

use anyhow::{bail, Result};
use log::debug;

use autostart_sync::entry::AutostartEntry;
use autostart_sync::error::Error;
use autostart_sync::registry::Registry;

use crate::cli::GlobalArgs;

/// Build a registry from the global options and scan every directory.
pub fn open_registry(global: &GlobalArgs) -> Result<Registry> {
    let settings = global.settings()?;
    debug!(
        "User directory {}, {} system directories",
        settings.user_dir.display(),
        settings.system_dirs.len()
    );
    let mut registry = Registry::new(settings);
    registry.scan();
    Ok(registry)
}

/// Look up an entry, failing with a message naming it if it is not known.
pub fn require_entry<'a>(registry: &'a Registry, filename: &str) -> Result<&'a AutostartEntry> {
    registry.find(filename).ok_or_else(|| {
        Error::UnknownEntry {
            filename: filename.to_string(),
        }
        .into()
    })
}

/// Write every pending save and report the ones that failed.
pub fn finish(mut registry: Registry) -> Result<()> {
    let failures = registry.shutdown();
    if failures.is_empty() {
        return Ok(());
    }
    for (filename, error) in &failures {
        eprintln!("Failed to save {}: {}", filename, error);
    }
    bail!("{} change(s) could not be saved", failures.len())
}
