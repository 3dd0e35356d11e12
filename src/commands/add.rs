//! # Add Command Implementation
//!
//! Creates a launcher in the user autostart directory from a command line and
//! prints the file name that was chosen for it.

use anyhow::Result;
use clap::Args;

use autostart_sync::registry::NewLauncher;

use crate::cli::GlobalArgs;
use crate::commands::{finish, open_registry};

/// Create a new autostart launcher
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Command line to run at login
    #[arg(short, long, value_name = "CMD")]
    pub exec: String,

    /// Display name (defaults to the command line)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Description shown next to the name
    #[arg(short, long)]
    pub comment: Option<String>,

    /// Seconds to wait after login before starting
    #[arg(short, long, default_value_t = 0)]
    pub delay: u32,

    /// File name to use instead of one derived from the command
    #[arg(long, value_name = "NAME")]
    pub filename: Option<String>,
}

/// Execute the `add` command.
pub fn execute(global: &GlobalArgs, args: AddArgs) -> Result<()> {
    let mut registry = open_registry(global)?;

    let mut launcher = NewLauncher::new(args.exec).delay(args.delay);
    if let Some(name) = args.name {
        launcher = launcher.name(name);
    }
    if let Some(comment) = args.comment {
        launcher = launcher.comment(comment);
    }
    if let Some(filename) = args.filename {
        launcher = launcher.basename(filename);
    }

    let filename = registry.create(launcher)?;
    finish(registry)?;
    println!("{}", filename);
    Ok(())
}
