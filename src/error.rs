//! # Error Handling
//!
//! This module defines the centralized error type for `autostart-sync`. It uses
//! the `thiserror` library to build an `Error` enum covering every failure the
//! library can report, each variant carrying enough context to produce a
//! useful message.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failures. Parse failures, write failures,
//!   name exhaustion and copy failures are all local to one autostart entry;
//!   nothing here is fatal to the process.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Some conditions are deliberately *not* errors: a desktop file that is not
//! launchable in the current desktop, or a change notification that the
//! registry caused itself, simply produce no entry.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for autostart-sync operations
#[derive(Error, Debug)]
pub enum Error {
    /// A desktop entry file could not be parsed.
    ///
    /// Includes the file path when the document was loaded from disk, and the
    /// 1-based line number of the offending line.
    #[error("Desktop entry parse error{}: line {line}: {message}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    Parse {
        /// File the document was read from, if any
        path: Option<PathBuf>,
        line: usize,
        message: String,
    },

    /// Writing a desktop entry file (or its directory) failed.
    ///
    /// The in-memory edits are kept so the next save retries them.
    #[error("Failed to write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },

    /// The free file name search ran out of attempts.
    #[error("No free file name for '{base}' after {attempts} attempts")]
    NameExhausted { base: String, attempts: u32 },

    /// A launcher command line was blank or could not be tokenized.
    #[error("Invalid command line '{command}': {message}")]
    InvalidCommand { command: String, message: String },

    /// Copying an external desktop file into the user directory failed.
    #[error("Copy error: {src} -> {dst}: {message}")]
    Copy {
        src: String,
        dst: String,
        message: String,
    },

    /// No autostart entry is registered under this file name.
    #[error("Unknown autostart entry: {filename}")]
    UnknownEntry { filename: String },

    /// The settings are invalid.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A directory rank arrived out of order.
    #[error("Invariant violated: {message}")]
    Invariant { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error in a settings file, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A URI parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_parse_without_path() {
        let error = Error::Parse {
            path: None,
            line: 3,
            message: "Key file does not start with a group".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Desktop entry parse error"));
        assert!(display.contains("line 3"));
        assert!(!display.contains(" in "));
    }

    #[test]
    fn test_error_display_parse_with_path() {
        let error = Error::Parse {
            path: Some(PathBuf::from("/etc/xdg/autostart/foo.desktop")),
            line: 7,
            message: "Invalid line".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("in /etc/xdg/autostart/foo.desktop"));
        assert!(display.contains("line 7"));
        assert!(display.contains("Invalid line"));
    }

    #[test]
    fn test_error_display_write() {
        let error = Error::Write {
            path: PathBuf::from("/home/u/.config/autostart/foo.desktop"),
            message: "Permission denied".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to write"));
        assert!(display.contains("foo.desktop"));
        assert!(display.contains("Permission denied"));
    }

    #[test]
    fn test_error_display_name_exhausted() {
        let error = Error::NameExhausted {
            base: "foo".to_string(),
            attempts: 10000,
        };
        let display = format!("{}", error);
        assert!(display.contains("'foo'"));
        assert!(display.contains("10000 attempts"));
    }

    #[test]
    fn test_error_display_config_with_hint() {
        let error = Error::Config {
            message: "max-name-attempts must be at least 1".to_string(),
            hint: Some("remove the key to use the default".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration error"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn test_error_display_copy() {
        let error = Error::Copy {
            src: "/tmp/a.desktop".to_string(),
            dst: "/home/u/.config/autostart/a.desktop".to_string(),
            message: "No such file or directory".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Copy error"));
        assert!(display.contains("/tmp/a.desktop -> "));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: [unclosed").unwrap_err();
        let error: Error = yaml_error.into();
        assert!(format!("{}", error).contains("YAML parsing error"));
    }

    #[test]
    fn test_error_unknown_entry() {
        let error = Error::UnknownEntry {
            filename: "missing.desktop".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Unknown autostart entry: missing.desktop"
        );
    }
}
