//! Deferred saves.
//!
//! Arming a save promotes the entry to the user directory and sets a
//! deadline. When the deadline passes, the dirty fields are merged into the
//! file the entry came from and written to the user copy, or the user copy
//! is removed when it no longer differs from the system file it overrides.

use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

use log::{debug, info, warn};

use super::{unknown, Registry};
use crate::clock::Clock;
use crate::entry::{AutostartEntry, USER_RANK};
use crate::error::{Error, Result};
use crate::keyfile::DesktopFile;
use crate::layout::AutostartDirs;

/// What a flush did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Dirty fields were written to the user copy
    Written,
    /// The user copy matched the system file and was removed
    ShadowRemoved,
    /// Nothing was pending
    Idle,
}

/// Arm (or re-arm) the deferred save of `entry`.
///
/// The first arm of an entry living outside the user directory remembers
/// where it came from and moves its source path into the user directory.
pub(crate) fn arm(entry: &mut AutostartEntry, dirs: &AutostartDirs, deadline: Instant) {
    if entry.directory_rank != Some(USER_RANK) {
        // Already set means an earlier save failed; keep retrying from that base.
        if entry.pending_original_path.is_none() {
            entry.pending_original_path = Some(entry.source_path.clone());
        }
        entry.source_path = dirs.user_path_for(&entry.filename);
        entry.directory_rank = Some(USER_RANK);
    }
    entry.save_deadline = Some(deadline);
}

impl<C: Clock> Registry<C> {
    /// Earliest deadline among armed saves.
    pub fn next_save_deadline(&self) -> Option<Instant> {
        self.entries
            .values()
            .filter_map(|entry| entry.save_deadline)
            .min()
    }

    /// Flush every entry whose deadline has passed.
    ///
    /// Returns the saves that failed. Failed entries stay dirty and are
    /// retried on their next arm.
    pub fn run_due_saves(&mut self) -> Vec<(String, Error)> {
        let now = self.clock.now();
        let due: Vec<String> = self
            .entries
            .values()
            .filter(|entry| entry.save_deadline.is_some_and(|deadline| deadline <= now))
            .map(|entry| entry.filename.clone())
            .collect();

        let mut failures = Vec::new();
        for filename in due {
            if let Err(e) = self.flush(&filename) {
                failures.push((filename, e));
            }
        }
        failures
    }

    /// Run the save of `filename` now.
    ///
    /// The save timer is cleared whatever the outcome. On failure the dirty
    /// fields and the merge base are kept so a later save retries the same
    /// write.
    pub fn flush(&mut self, filename: &str) -> Result<FlushOutcome> {
        let locale = self.settings.locale.clone();
        let dirs = &self.dirs;
        let entry = self
            .entries
            .get_mut(filename)
            .ok_or_else(|| unknown(filename))?;

        if entry.save_deadline.is_none() && entry.dirty.is_empty() {
            return Ok(FlushOutcome::Idle);
        }
        entry.save_deadline = None;

        if let Some(shadow) = entry.shadowed_system_rank {
            if let Some(system_path) = dirs.path_at(shadow, filename) {
                match DesktopFile::load(&system_path) {
                    Ok(system) if entry.matches_document(&system, locale.as_ref()) => {
                        if entry.directory_rank == Some(USER_RANK) && entry.source_path != system_path
                        {
                            remove_override(&entry.source_path)?;
                        }
                        info!(
                            "{} matches {}, using the system file",
                            filename,
                            system_path.display()
                        );
                        entry.source_path = system_path;
                        entry.directory_rank = Some(shadow);
                        entry.suppress_next_change = false;
                        entry.dirty.clear();
                        entry.pending_original_path = None;
                        return Ok(FlushOutcome::ShadowRemoved);
                    }
                    Ok(_) => {}
                    Err(e) => debug!("Cannot compare with {}: {}", system_path.display(), e),
                }
            }
        }

        let base = entry
            .pending_original_path
            .clone()
            .unwrap_or_else(|| entry.source_path.clone());
        let mut document = match DesktopFile::load(&base) {
            Ok(document) => document,
            Err(e) => {
                debug!("Starting {} from scratch: {}", filename, e);
                DesktopFile::new_application()
            }
        };
        entry.merge_dirty_into(&mut document, locale.as_ref());

        let target = entry.source_path.clone();
        let written = std::fs::create_dir_all(dirs.user_dir())
            .map_err(|e| Error::Write {
                path: dirs.user_dir().to_path_buf(),
                message: e.to_string(),
            })
            .and_then(|()| document.save(&target));

        match written {
            Ok(()) => {
                entry.suppress_next_change = true;
                entry.dirty.clear();
                entry.pending_original_path = None;
                info!("Saved {}", target.display());
                Ok(FlushOutcome::Written)
            }
            Err(e) => {
                warn!("Could not save {}: {}", filename, e);
                Err(e)
            }
        }
    }
}

fn remove_override(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => {
            warn!("Could not remove {}: {}", path.display(), e);
            Err(Error::Write {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    }
}
