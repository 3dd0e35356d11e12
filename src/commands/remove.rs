//! # Remove Command Implementation
//!
//! Deletes a user-only entry outright. An entry that a system directory also
//! provides cannot disappear, so it is hidden with a user override instead.

use anyhow::Result;
use clap::Args;

use crate::cli::GlobalArgs;
use crate::commands::{finish, open_registry};

/// Remove an autostart entry
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// File name of the entry, e.g. `redshift.desktop`
    pub filename: String,
}

/// Execute the `remove` command.
pub fn execute(global: &GlobalArgs, args: RemoveArgs) -> Result<()> {
    let mut registry = open_registry(global)?;
    registry.delete(&args.filename)?;

    if registry.find(&args.filename).is_some() {
        println!("{} is provided by the system; hiding it", args.filename);
    }
    finish(registry)
}
