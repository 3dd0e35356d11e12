//! # Autostart Sync Library
//!
//! This library keeps an in-memory model of the XDG autostart entries of a
//! desktop session and synchronizes edits back to disk. It is used by the
//! `autostart-sync` command-line tool, and can drive a session properties
//! dialog or any other front end that edits autostart entries.
//!
//! ## Quick Example
//!
//! ```
//! use autostart_sync::config::Settings;
//! use autostart_sync::registry::{NewLauncher, Registry};
//!
//! let temp = tempfile::tempdir().unwrap();
//! let settings = Settings::new(temp.path().join("autostart"), Vec::new());
//! let mut registry = Registry::new(settings);
//!
//! let filename = registry
//!     .create(NewLauncher::new("redshift -l 52:4").name("Redshift"))
//!     .unwrap();
//! assert_eq!(filename, "redshift.desktop");
//!
//! // Nothing is written until the deferred save runs
//! assert!(!temp.path().join("autostart/redshift.desktop").exists());
//! assert!(registry.shutdown().is_empty());
//! assert!(temp.path().join("autostart/redshift.desktop").exists());
//! ```
//!
//! ## Core Concepts
//!
//! - **Directories (`layout`)**: one user directory (rank 0) and any number
//!   of system directories (ranks 1..N). The same file name in several
//!   directories is one entry; the lowest rank wins.
//! - **Desktop files (`keyfile`)**: a lossless key file document. Comments,
//!   unknown keys and translations survive a load-modify-save round trip.
//! - **Entries (`entry`)**: the fields of one autostart file plus its sync
//!   state: rank, shadowed system rank, dirty fields, pending merge base.
//! - **Registry (`registry`)**: owns the entries and implements loading,
//!   editing, the deferred save with shadow removal, and creation.
//! - **Events (`events`)**: synchronous `Added`/`Changed`/`Removed`
//!   notifications.
//!
//! ## Saving
//!
//! Edits never write synchronously. Editing a system entry first promotes it
//! to the user directory; the save then merges only the dirty fields into a
//! copy of the system file. When a user copy ends up identical to the system
//! file it overrides, the user copy is deleted instead of written.

pub mod clock;
pub mod config;
pub mod defaults;
pub mod entry;
pub mod error;
pub mod events;
pub mod keyfile;
pub mod layout;
pub mod locale;
pub mod registry;
pub mod shell;

#[cfg(test)]
mod keyfile_proptest;
