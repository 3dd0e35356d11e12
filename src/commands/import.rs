//! # Import Command Implementation
//!
//! Copies an existing desktop file (a path or a `file://` URL) into the user
//! autostart directory under a free file name and prints that name.

use anyhow::Result;
use clap::Args;

use crate::cli::GlobalArgs;
use crate::commands::{finish, open_registry};

/// Copy a desktop file into the user autostart directory
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Desktop file path or file:// URL
    #[arg(value_name = "FILE")]
    pub source: String,
}

/// Execute the `import` command.
pub fn execute(global: &GlobalArgs, args: ImportArgs) -> Result<()> {
    let mut registry = open_registry(global)?;
    let filename = registry.copy_from(&args.source)?;
    finish(registry)?;
    println!("{}", filename);
    Ok(())
}
