//! # List Command Implementation
//!
//! Prints one line per autostart entry: an enabled marker, the file name and
//! the display name. Entries marked `NoDisplay` are left out unless `--all`
//! is given. This command never writes anything.

use anyhow::Result;
use clap::Args;

use autostart_sync::entry::AutostartEntry;

use crate::cli::GlobalArgs;
use crate::commands::open_registry;

/// List autostart entries
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Include entries marked NoDisplay
    #[arg(short, long)]
    pub all: bool,

    /// Also show directory rank, shadowed system rank and command
    #[arg(short, long)]
    pub long: bool,
}

/// Execute the `list` command.
pub fn execute(global: &GlobalArgs, args: ListArgs) -> Result<()> {
    let registry = open_registry(global)?;

    for entry in registry.entries() {
        if entry.no_display() && !args.all {
            continue;
        }
        println!("{}", format_line(entry, args.long));
    }
    Ok(())
}

fn format_line(entry: &AutostartEntry, long: bool) -> String {
    let marker = if entry.is_enabled() { "[x]" } else { "[ ]" };
    let name = entry.name().unwrap_or_default();
    if !long {
        return format!("{} {}  {}", marker, entry.filename(), name);
    }

    format!(
        "{} {}  {}  rank={} shadow={}  exec={}",
        marker,
        entry.filename(),
        name,
        format_rank(entry.directory_rank()),
        format_rank(entry.shadowed_system_rank()),
        entry.exec().unwrap_or_default()
    )
}

fn format_rank(rank: Option<u32>) -> String {
    rank.map_or_else(|| "-".to_string(), |rank| rank.to_string())
}
