//! Default values for autostart-sync.
//!
//! This module provides centralized policy constants and platform default
//! directories, so the registry, the settings loader and the CLI agree on them.

use std::path::PathBuf;
use std::time::Duration;

/// Suffix every autostart desktop file carries.
pub const DESKTOP_SUFFIX: &str = ".desktop";

/// Name of the autostart directory below each XDG config directory.
pub const AUTOSTART_SUBDIR: &str = "autostart";

/// Debounce delay between the last edit and the write to disk.
pub const SAVE_DELAY: Duration = Duration::from_secs(2);

/// Maximum number of candidate names tried when looking for a free file name.
pub const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Desktop identifier used when `XDG_CURRENT_DESKTOP` is unset.
pub const DEFAULT_DESKTOP: &str = "MATE";

/// Returns the default per-user autostart directory.
///
/// Uses the platform config directory (`$XDG_CONFIG_HOME` or `~/.config` on
/// Linux). Falls back to `.config/autostart` relative to the current directory
/// if no config directory can be determined.
pub fn default_user_autostart_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join(AUTOSTART_SUBDIR)
}

/// Returns the default system config directories, in search order.
///
/// This is the XDG default for `$XDG_CONFIG_DIRS`.
pub fn default_system_config_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("/etc/xdg")]
}
