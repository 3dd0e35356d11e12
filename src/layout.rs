//! Autostart directory layout.
//!
//! Maps directory ranks to paths and back. Rank 0 is the user directory,
//! ranks 1..N are the system directories in search order.

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::entry::{Rank, USER_RANK};

/// The ordered list of autostart directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutostartDirs {
    dirs: Vec<PathBuf>,
}

impl AutostartDirs {
    pub fn new(user_dir: impl Into<PathBuf>, system_dirs: Vec<PathBuf>) -> Self {
        let mut dirs = Vec::with_capacity(system_dirs.len() + 1);
        dirs.push(user_dir.into());
        dirs.extend(system_dirs);
        Self { dirs }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.user_dir.clone(), settings.system_dirs.clone())
    }

    pub fn user_dir(&self) -> &Path {
        &self.dirs[0]
    }

    /// Number of directories, user directory included.
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Directory at `rank`, or `None` past the last system directory.
    pub fn directory_path_at(&self, rank: Rank) -> Option<&Path> {
        self.dirs.get(rank as usize).map(PathBuf::as_path)
    }

    /// Path of `filename` inside the directory at `rank`.
    pub fn path_at(&self, rank: Rank, filename: &str) -> Option<PathBuf> {
        self.directory_path_at(rank).map(|dir| dir.join(filename))
    }

    /// Path of `filename` inside the user directory.
    pub fn user_path_for(&self, filename: &str) -> PathBuf {
        self.user_dir().join(filename)
    }

    /// Rank of the directory directly containing `path`.
    ///
    /// The first match wins when the same directory is listed twice.
    pub fn rank_of(&self, path: &Path) -> Option<Rank> {
        let parent = path.parent()?;
        self.dirs
            .iter()
            .position(|dir| dir == parent)
            .map(|index| index as Rank)
    }

    /// `(rank, directory)` pairs in search order.
    pub fn iter(&self) -> impl Iterator<Item = (Rank, &Path)> {
        self.dirs
            .iter()
            .enumerate()
            .map(|(index, dir)| (index as Rank, dir.as_path()))
    }

    /// System ranks strictly after `rank`, in search order.
    pub fn system_ranks_after(&self, rank: Rank) -> impl Iterator<Item = Rank> {
        let first = rank.max(USER_RANK) + 1;
        first..self.dirs.len() as Rank
    }
}
