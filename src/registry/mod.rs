//! # Entry Registry
//!
//! This module defines [`Registry`], which owns every known
//! [`AutostartEntry`] keyed by file name and implements the sync engine
//! around them.
//!
//! ## Operations
//!
//! - **Loading** ([`load`]): `load`, `scan`, `file_changed`, `file_removed`.
//!   Merges the user directory and the system directories by rank.
//! - **Editing** ([`edit`]): `update`, `set_hidden`, `delete`. Edits only
//!   touch memory and arm a deferred save.
//! - **Saving** ([`save`]): `flush`, `run_due_saves`, `next_save_deadline`.
//!   Writes dirty fields into the user copy, or removes the user copy when it
//!   became identical to the system file it overrides.
//! - **Creating** ([`create`]): `create`, `copy_from`.
//!
//! ## Driving the deferred save
//!
//! The registry never sleeps. Whoever owns the event loop asks
//! [`Registry::next_save_deadline`] when to wake up and then calls
//! [`Registry::run_due_saves`]. Before exiting, call [`Registry::shutdown`];
//! dropping a registry does not write anything.
//!
//! ```no_run
//! use autostart_sync::config::Settings;
//! use autostart_sync::registry::Registry;
//!
//! let mut registry = Registry::new(Settings::from_env());
//! registry.scan();
//! registry.set_hidden("foo.desktop", true)?;
//! for (filename, error) in registry.shutdown() {
//!     eprintln!("{}: {}", filename, error);
//! }
//! # Ok::<(), autostart_sync::error::Error>(())
//! ```

pub mod create;
pub mod edit;
pub mod load;
pub mod save;

use std::collections::BTreeMap;

use log::warn;

use crate::clock::{Clock, SystemClock};
use crate::config::Settings;
use crate::entry::AutostartEntry;
use crate::error::{Error, Result};
use crate::events::{EntryEvent, Observers, SubscriptionId};
use crate::layout::AutostartDirs;

pub use create::NewLauncher;
pub use save::FlushOutcome;

/// Owner of all autostart entries, at most one per file name.
#[derive(Debug)]
pub struct Registry<C: Clock = SystemClock> {
    settings: Settings,
    dirs: AutostartDirs,
    entries: BTreeMap<String, AutostartEntry>,
    observers: Observers,
    clock: C,
}

impl Registry<SystemClock> {
    pub fn new(settings: Settings) -> Self {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> Registry<C> {
    pub fn with_clock(settings: Settings, clock: C) -> Self {
        let dirs = AutostartDirs::from_settings(&settings);
        Self {
            settings,
            dirs,
            entries: BTreeMap::new(),
            observers: Observers::default(),
            clock,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn dirs(&self) -> &AutostartDirs {
        &self.dirs
    }

    pub fn find(&self, filename: &str) -> Option<&AutostartEntry> {
        self.entries.get(filename)
    }

    /// All entries, sorted by display name (case-insensitive), then file name.
    pub fn entries(&self) -> Vec<&AutostartEntry> {
        let mut entries: Vec<&AutostartEntry> = self.entries.values().collect();
        entries.sort_by_cached_key(|entry| {
            (
                entry.name().unwrap_or_default().to_lowercase(),
                entry.filename().to_string(),
            )
        });
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a callback for entry events. Delivery is synchronous.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&EntryEvent) + 'static,
    {
        self.observers.subscribe(Box::new(observer))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Force any armed save of `filename`, then drop it from the registry.
    ///
    /// When the forced save fails the entry stays registered, still dirty,
    /// and the error is returned.
    pub fn close(&mut self, filename: &str) -> Result<()> {
        let entry = self.entry(filename)?;
        if entry.is_save_armed() || !entry.dirty_fields().is_empty() {
            self.flush(filename)?;
        }
        self.entries.remove(filename);
        Ok(())
    }

    /// Force every pending save and empty the registry.
    ///
    /// Returns the saves that failed; those edits are lost once this returns.
    pub fn shutdown(&mut self) -> Vec<(String, Error)> {
        let pending: Vec<String> = self
            .entries
            .values()
            .filter(|entry| entry.is_save_armed() || !entry.dirty_fields().is_empty())
            .map(|entry| entry.filename().to_string())
            .collect();

        let mut failures = Vec::new();
        for filename in pending {
            if let Err(e) = self.flush(&filename) {
                warn!("Discarding unsaved changes to {}: {}", filename, e);
                failures.push((filename, e));
            }
        }
        self.entries.clear();
        failures
    }

    fn entry(&self, filename: &str) -> Result<&AutostartEntry> {
        self.entries.get(filename).ok_or_else(|| unknown(filename))
    }

    fn emit(&mut self, event: EntryEvent) {
        self.observers.emit(event);
    }
}

fn unknown(filename: &str) -> Error {
    Error::UnknownEntry {
        filename: filename.to_string(),
    }
}
