//! Shared test utilities for integration and E2E tests.
//!
//! This module provides a fixture with a user autostart directory and two
//! system autostart directories inside one temporary directory, plus helpers
//! to build a registry on top of it.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_system_file(1, "a.desktop", entries::SIMPLE);
//!     let mut registry = fixture.registry();
//!     registry.scan();
//! }
//! ```

use std::path::{Path, PathBuf};

use assert_fs::prelude::*;
use autostart_sync::clock::ManualClock;
use autostart_sync::config::Settings;
use autostart_sync::registry::Registry;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::entries;
    pub use super::TestFixture;
}

/// Common desktop entry snippets for testing.
#[allow(dead_code)]
pub mod entries {
    /// A plain application entry.
    pub const SIMPLE: &str = "[Desktop Entry]\nType=Application\nName=Simple\nExec=simple\n";

    /// A vendor entry with comments, translations and unknown keys.
    pub const VENDOR: &str = "# Installed by the distribution
[Desktop Entry]
Type=Application
Name=Power Manager
Name[de]=Energieverwaltung
Comment=Power management daemon
Comment[de]=Energieverwaltungsdienst
Exec=mate-power-manager
Icon=mate-power-manager
X-MATE-Bugzilla-Product=mate-power-manager
";

    /// An entry restricted to another desktop.
    pub const KDE_ONLY: &str = "[Desktop Entry]\nType=Application\nName=Klipper\nExec=klipper\nOnlyShowIn=KDE;\n";

    /// Text that is not a desktop file.
    pub const INVALID: &str = "this is not a desktop file\n";
}

/// A temporary autostart layout: `user/` (rank 0), `sys1/` (rank 1) and
/// `sys2/` (rank 2).
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
    clock: ManualClock,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new fixture; directories are created lazily by the builders.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
            clock: ManualClock::new(),
        }
    }

    /// Add a file to the user directory.
    pub fn with_user_file(self, filename: &str, content: &str) -> Self {
        self.write(0, filename, content);
        self
    }

    /// Add a file to the system directory at `rank` (1 or 2).
    pub fn with_system_file(self, rank: u32, filename: &str, content: &str) -> Self {
        assert!(rank == 1 || rank == 2, "fixture has two system directories");
        self.write(rank, filename, content);
        self
    }

    /// Write (or overwrite) a file in the directory at `rank`.
    pub fn write(&self, rank: u32, filename: &str, content: &str) -> PathBuf {
        let child = self.temp_dir.child(Self::dir_name(rank)).child(filename);
        child.write_str(content).expect("Failed to write file");
        child.path().to_path_buf()
    }

    /// Read a file from the directory at `rank`.
    pub fn read(&self, rank: u32, filename: &str) -> String {
        std::fs::read_to_string(self.path_at(rank, filename)).expect("Failed to read file")
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn dir(&self, rank: u32) -> PathBuf {
        self.temp_dir.path().join(Self::dir_name(rank))
    }

    pub fn path_at(&self, rank: u32, filename: &str) -> PathBuf {
        self.dir(rank).join(filename)
    }

    /// Settings for this layout, everything else at its default.
    pub fn settings(&self) -> Settings {
        Settings::new(self.dir(0), vec![self.dir(1), self.dir(2)])
            .with_desktop_names(["MATE"])
            .with_locale(None)
    }

    /// A registry on this layout driven by the fixture's clock.
    pub fn registry(&self) -> Registry<ManualClock> {
        Registry::with_clock(self.settings(), self.clock.clone())
    }

    /// Registry with custom settings, still driven by the fixture's clock.
    pub fn registry_with(&self, settings: Settings) -> Registry<ManualClock> {
        Registry::with_clock(settings, self.clock.clone())
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// A command for the `autostart-sync` binary pointed at this layout.
    ///
    /// Environment that would leak the host's directories or desktop is
    /// cleared.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("autostart-sync");
        cmd.current_dir(self.path())
            .env_remove("AUTOSTART_SYNC_CONFIG")
            .env_remove("AUTOSTART_SYSTEM_DIRS")
            .env_remove("RUST_LOG")
            .env("XDG_CURRENT_DESKTOP", "MATE")
            .env("LC_ALL", "C")
            .env("AUTOSTART_USER_DIR", self.dir(0))
            .arg("--system-dir")
            .arg(self.dir(1))
            .arg("--system-dir")
            .arg(self.dir(2));
        cmd
    }

    fn dir_name(rank: u32) -> String {
        match rank {
            0 => "user".to_string(),
            n => format!("sys{}", n),
        }
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_layout() {
        let fixture = TestFixture::new()
            .with_user_file("a.desktop", entries::SIMPLE)
            .with_system_file(2, "b.desktop", entries::SIMPLE);
        assert!(fixture.path_at(0, "a.desktop").is_file());
        assert!(fixture.path_at(2, "b.desktop").is_file());
        assert!(!fixture.dir(1).exists());
    }

    #[test]
    fn test_entry_snippets_are_valid() {
        for content in [entries::SIMPLE, entries::VENDOR, entries::KDE_ONLY] {
            ini::Ini::load_from_str(content).expect("snippet should be a valid key file");
        }
    }
}
