//! # Edit Command Implementation
//!
//! Changes the name, comment, command or delay of an entry. Options that are
//! not given keep their current value. Editing a system entry creates a user
//! override with only the changed keys rewritten.

use anyhow::Result;
use clap::Args;

use crate::cli::GlobalArgs;
use crate::commands::{finish, open_registry, require_entry};

/// Change an autostart entry
#[derive(Args, Debug)]
pub struct EditArgs {
    /// File name of the entry, e.g. `redshift.desktop`
    pub filename: String,

    /// New display name
    #[arg(short, long)]
    pub name: Option<String>,

    /// New description
    #[arg(short, long)]
    pub comment: Option<String>,

    /// New command line
    #[arg(short, long, value_name = "CMD")]
    pub exec: Option<String>,

    /// New startup delay in seconds
    #[arg(short, long)]
    pub delay: Option<u32>,
}

/// Execute the `edit` command.
pub fn execute(global: &GlobalArgs, args: EditArgs) -> Result<()> {
    let mut registry = open_registry(global)?;
    let entry = require_entry(&registry, &args.filename)?;

    let name = args.name.or_else(|| entry.name().map(str::to_string));
    let comment = args.comment.or_else(|| entry.comment().map(str::to_string));
    let exec = args.exec.or_else(|| entry.exec().map(str::to_string));
    let delay = args.delay.unwrap_or(entry.delay());

    let changed = registry.update(
        &args.filename,
        name.as_deref(),
        comment.as_deref(),
        exec.as_deref(),
        delay,
    )?;
    if !changed {
        println!("{} is unchanged", args.filename);
    }
    finish(registry)
}
