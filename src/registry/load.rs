//! Loading entries from the autostart directories.
//!
//! A file name may be defined in several directories. The definition with
//! the lowest rank wins; the lowest system rank that also defines it is
//! remembered as the shadowed system rank, so a user override that matches
//! the system file again can be dropped on save.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use super::Registry;
use crate::clock::Clock;
use crate::defaults::DESKTOP_SUFFIX;
use crate::entry::{is_launchable, AutostartEntry, Rank, USER_RANK};
use crate::error::{Error, Result};
use crate::events::EntryEvent;
use crate::keyfile::DesktopFile;

/// What a call to [`Registry::load`] did with the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadOutcome {
    /// A new entry was registered, or an existing one rebuilt from the file
    Loaded,
    /// The file did not change the registered entry
    Skipped,
}

impl<C: Clock> Registry<C> {
    /// Load or reload the desktop file at `path`, found in the directory at
    /// `rank`.
    ///
    /// Returns `None` when the file cannot be parsed, is not launchable in
    /// the current desktop, is a notification of our own write, or is a
    /// lower-priority duplicate of a known entry.
    pub fn load(&mut self, path: &Path, rank: Rank) -> Option<&AutostartEntry> {
        let filename = desktop_filename(path)?;
        match self.load_entry(path, &filename, rank) {
            Ok(LoadOutcome::Loaded) => self.entries.get(&filename),
            Ok(LoadOutcome::Skipped) => None,
            Err(e) => {
                warn!("Not loading {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Load every desktop file in the user directory, then in each system
    /// directory in rank order.
    ///
    /// Returns the number of entries known afterwards.
    pub fn scan(&mut self) -> usize {
        let dirs: Vec<(Rank, PathBuf)> = self
            .dirs
            .iter()
            .map(|(rank, dir)| (rank, dir.to_path_buf()))
            .collect();

        for (rank, dir) in dirs {
            if !dir.is_dir() {
                debug!("Skipping missing autostart directory {}", dir.display());
                continue;
            }
            for item in WalkDir::new(&dir)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
            {
                match item {
                    Ok(item) if is_desktop_file(item.path()) && item.path().is_file() => {
                        self.load(item.path(), rank);
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Failed to read {}: {}", dir.display(), e),
                }
            }
        }

        debug!("Scan found {} autostart entries", self.entries.len());
        self.entries.len()
    }

    /// Handle a created or modified file reported by a directory watcher.
    pub fn file_changed(&mut self, path: &Path) -> Option<&AutostartEntry> {
        if !is_desktop_file(path) {
            return None;
        }
        let Some(rank) = self.dirs.rank_of(path) else {
            debug!("Ignoring change outside autostart directories: {}", path.display());
            return None;
        };
        self.load(path, rank)
    }

    /// Handle a deleted file reported by a directory watcher.
    ///
    /// When the removed file was the entry's source, the next definition in
    /// rank order takes over; with none left the entry is dropped.
    pub fn file_removed(&mut self, path: &Path) {
        let (Some(rank), Some(filename)) = (self.dirs.rank_of(path), desktop_filename(path)) else {
            return;
        };
        let Some(entry) = self.entries.get_mut(&filename) else {
            return;
        };
        if entry.is_save_armed() || !entry.dirty.is_empty() {
            debug!("Ignoring removal of {}: a save is pending", path.display());
            return;
        }

        if entry.source_path != path {
            if entry.shadowed_system_rank == Some(rank) {
                let dirs = &self.dirs;
                entry.shadowed_system_rank = dirs
                    .system_ranks_after(rank)
                    .find(|next| dirs.path_at(*next, &filename).is_some_and(|p| p.is_file()));
                debug!(
                    "{} now shadows system rank {:?}",
                    filename, entry.shadowed_system_rank
                );
            }
            return;
        }

        entry.directory_rank = None;
        entry.shadowed_system_rank = None;

        let fallbacks: Vec<(Rank, PathBuf)> = self
            .dirs
            .system_ranks_after(rank)
            .filter_map(|next| self.dirs.path_at(next, &filename).map(|p| (next, p)))
            .filter(|(_, p)| p.is_file())
            .collect();
        for (next, fallback) in fallbacks {
            if self.load(&fallback, next).is_some() {
                return;
            }
        }

        debug!("{} has no remaining definition", filename);
        self.entries.remove(&filename);
        self.emit(EntryEvent::Removed(filename));
    }

    fn load_entry(&mut self, path: &Path, filename: &str, rank: Rank) -> Result<LoadOutcome> {
        if let Some(existing) = self.entries.get_mut(filename) {
            if existing.directory_rank == Some(rank) && existing.suppress_next_change {
                existing.suppress_next_change = false;
                debug!("Ignoring our own write to {}", path.display());
                return Ok(LoadOutcome::Skipped);
            }

            let outranked = existing.directory_rank.is_some_and(|current| current < rank);
            let pending = existing.is_save_armed() || !existing.dirty.is_empty();
            if outranked || pending {
                if rank > USER_RANK {
                    existing.shadowed_system_rank =
                        Some(existing.shadowed_system_rank.map_or(rank, |s| s.min(rank)));
                }
                debug!(
                    "Keeping {} over {} (rank {})",
                    existing.source_path.display(),
                    path.display(),
                    rank
                );
                return Ok(LoadOutcome::Skipped);
            }
        }

        let document = match DesktopFile::load(path) {
            Ok(document) => document,
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
                return Ok(LoadOutcome::Skipped);
            }
        };
        if !is_launchable(&document, &self.settings.desktop_names) {
            debug!("{} is not shown in {:?}", path.display(), self.settings.desktop_names);
            return Ok(LoadOutcome::Skipped);
        }

        let previous = self.entries.get(filename);
        let mut shadow = previous.and_then(|entry| entry.shadowed_system_rank);
        if rank > USER_RANK {
            if let Some(recorded) = shadow {
                if rank > recorded {
                    return Err(Error::Invariant {
                        message: format!(
                            "{} loaded from rank {} after system rank {} was recorded",
                            filename, rank, recorded
                        ),
                    });
                }
            }
            shadow = Some(rank);
        }

        let mut entry = AutostartEntry::from_document(
            filename,
            path,
            &document,
            self.settings.locale.as_ref(),
            rank,
        );
        entry.shadowed_system_rank = shadow;

        let reloaded = self.entries.insert(filename.to_string(), entry).is_some();
        let filename = filename.to_string();
        self.emit(if reloaded {
            EntryEvent::Changed(filename)
        } else {
            EntryEvent::Added(filename)
        });
        Ok(LoadOutcome::Loaded)
    }
}

fn is_desktop_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(DESKTOP_SUFFIX) && name.len() > DESKTOP_SUFFIX.len())
}

fn desktop_filename(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}
