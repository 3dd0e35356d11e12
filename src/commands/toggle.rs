//! # Enable / Disable Command Implementation
//!
//! Sets or clears the `Hidden` key of an entry. Disabling a system entry
//! writes a user override; enabling it again removes that override when
//! nothing else differs from the system file.

use anyhow::Result;
use clap::Args;

use crate::cli::GlobalArgs;
use crate::commands::{finish, open_registry, require_entry};

#[derive(Args, Debug)]
pub struct ToggleArgs {
    /// File name of the entry, e.g. `redshift.desktop`
    pub filename: String,
}

/// Execute the `enable` (`enabled = true`) or `disable` command.
pub fn execute(global: &GlobalArgs, args: ToggleArgs, enabled: bool) -> Result<()> {
    let mut registry = open_registry(global)?;
    require_entry(&registry, &args.filename)?;

    if !registry.set_hidden(&args.filename, !enabled)? {
        let state = if enabled { "enabled" } else { "disabled" };
        println!("{} is already {}", args.filename, state);
    }
    finish(registry)
}
