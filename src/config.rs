//! # Settings
//!
//! This module defines [`Settings`], the runtime configuration of the
//! registry: where the autostart directories are, which desktop we are
//! running in, which locale translations are read and written for, and the
//! two policy knobs (save debounce delay and free-name attempt bound).
//!
//! Settings are built in layers:
//!
//! 1. **Environment**: [`Settings::from_env`] follows the XDG base directory
//!    variables (`XDG_CONFIG_HOME`, `XDG_CONFIG_DIRS`, `XDG_CURRENT_DESKTOP`)
//!    and the usual locale variables.
//! 2. **Settings file**: an optional YAML file parsed into [`SettingsFile`],
//!    where every key is optional, overlaid with [`Settings::apply`].
//! 3. **Explicit values**: builder methods, used by the CLI flags and tests.
//!
//! ## Example settings file
//!
//! ```yaml
//! user-dir: /home/me/.config/autostart
//! system-dirs:
//!   - /etc/xdg/autostart
//! desktop-names: [MATE]
//! locale: de_DE.UTF-8
//! save-delay-secs: 2
//! max-name-attempts: 10000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::defaults::{
    default_system_config_dirs, default_user_autostart_dir, AUTOSTART_SUBDIR, DEFAULT_DESKTOP,
    MAX_NAME_ATTEMPTS, SAVE_DELAY,
};
use crate::error::{Error, Result};
use crate::locale::Locale;

/// Runtime configuration for a [`Registry`](crate::registry::Registry).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Per-user autostart directory (rank 0)
    pub user_dir: PathBuf,
    /// System autostart directories in search order (ranks 1..N)
    pub system_dirs: Vec<PathBuf>,
    /// Identifiers of the running desktop, matched against `OnlyShowIn`/`NotShowIn`
    pub desktop_names: Vec<String>,
    /// Locale used to read and write translated keys
    pub locale: Option<Locale>,
    /// Debounce delay before an edit is written
    pub save_delay: Duration,
    /// Bound on the free file name search
    pub max_name_attempts: u32,
}

impl Settings {
    /// Settings for explicit directories, with every other value at its default.
    pub fn new(user_dir: impl Into<PathBuf>, system_dirs: Vec<PathBuf>) -> Self {
        Self {
            user_dir: user_dir.into(),
            system_dirs,
            desktop_names: vec![DEFAULT_DESKTOP.to_string()],
            locale: None,
            save_delay: SAVE_DELAY,
            max_name_attempts: MAX_NAME_ATTEMPTS,
        }
    }

    /// Settings derived from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Settings derived from an environment-like lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let user_dir = lookup("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .filter(|dir| dir.is_absolute())
            .map(|dir| dir.join(AUTOSTART_SUBDIR))
            .unwrap_or_else(default_user_autostart_dir);

        let config_dirs: Vec<PathBuf> = lookup("XDG_CONFIG_DIRS")
            .map(|dirs| split_path_list(&dirs))
            .filter(|dirs| !dirs.is_empty())
            .unwrap_or_else(default_system_config_dirs);
        let system_dirs = config_dirs
            .into_iter()
            .map(|dir| dir.join(AUTOSTART_SUBDIR))
            .collect();

        let desktop_names = lookup("XDG_CURRENT_DESKTOP")
            .map(|value| split_desktop_names(&value))
            .filter(|names| !names.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_DESKTOP.to_string()]);

        Self {
            user_dir,
            system_dirs,
            desktop_names,
            locale: Locale::from_lookup(&lookup),
            save_delay: SAVE_DELAY,
            max_name_attempts: MAX_NAME_ATTEMPTS,
        }
    }

    /// Overlay the values present in a settings file.
    pub fn apply(&mut self, file: SettingsFile) -> Result<()> {
        if let Some(user_dir) = file.user_dir {
            self.user_dir = user_dir;
        }
        if let Some(system_dirs) = file.system_dirs {
            self.system_dirs = system_dirs;
        }
        if let Some(desktop_names) = file.desktop_names {
            self.desktop_names = desktop_names;
        }
        if let Some(locale) = file.locale {
            self.locale = Locale::parse(&locale);
        }
        if let Some(secs) = file.save_delay_secs {
            self.save_delay = Duration::from_secs(secs);
        }
        if let Some(attempts) = file.max_name_attempts {
            self.max_name_attempts = attempts;
        }
        self.validate()
    }

    /// Check the values that have a lower bound.
    pub fn validate(&self) -> Result<()> {
        if self.max_name_attempts == 0 {
            return Err(Error::Config {
                message: "max-name-attempts must be at least 1".to_string(),
                hint: Some("remove the key to use the default of 10000".to_string()),
            });
        }
        if self.user_dir.as_os_str().is_empty() {
            return Err(Error::Config {
                message: "user-dir must not be empty".to_string(),
                hint: None,
            });
        }
        Ok(())
    }

    pub fn with_desktop_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.desktop_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_locale(mut self, locale: Option<Locale>) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = delay;
        self
    }

    pub fn with_max_name_attempts(mut self, attempts: u32) -> Self {
        self.max_name_attempts = attempts;
        self
    }
}

/// Optional overrides read from a YAML settings file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SettingsFile {
    pub user_dir: Option<PathBuf>,
    pub system_dirs: Option<Vec<PathBuf>>,
    pub desktop_names: Option<Vec<String>>,
    pub locale: Option<String>,
    pub save_delay_secs: Option<u64>,
    pub max_name_attempts: Option<u32>,
}

/// Parse a YAML settings file.
pub fn parse(yaml: &str) -> Result<SettingsFile> {
    if yaml.trim().is_empty() {
        return Ok(SettingsFile::default());
    }
    Ok(serde_yaml::from_str(yaml)?)
}

/// Read and parse a YAML settings file from disk.
pub fn from_file(path: &Path) -> Result<SettingsFile> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read settings file {}: {}", path.display(), e),
        hint: None,
    })?;
    parse(&content)
}

fn split_path_list(value: &str) -> Vec<PathBuf> {
    value
        .split(':')
        .filter(|part| !part.trim().is_empty())
        .map(PathBuf::from)
        .collect()
}

fn split_desktop_names(value: &str) -> Vec<String> {
    value
        .split(':')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
