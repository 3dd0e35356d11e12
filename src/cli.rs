//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use autostart_sync::config::{self, Settings};

use crate::commands;

/// Autostart Sync - Inspect and edit the applications started at login
#[derive(Parser, Debug)]
#[command(name = "autostart-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// YAML file with settings overrides
    #[arg(long, global = true, value_name = "FILE", env = "AUTOSTART_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Per-user autostart directory
    ///
    /// Defaults to `$XDG_CONFIG_HOME/autostart`.
    #[arg(long, global = true, value_name = "DIR", env = "AUTOSTART_USER_DIR")]
    pub user_dir: Option<PathBuf>,

    /// System autostart directory, in search order (repeatable)
    ///
    /// Defaults to `autostart` under each entry of `$XDG_CONFIG_DIRS`.
    #[arg(
        long = "system-dir",
        global = true,
        value_name = "DIR",
        env = "AUTOSTART_SYSTEM_DIRS",
        value_delimiter = ':'
    )]
    pub system_dirs: Vec<PathBuf>,

    /// Desktop name matched against OnlyShowIn/NotShowIn (repeatable)
    #[arg(
        long = "desktop",
        global = true,
        value_name = "NAME",
        env = "XDG_CURRENT_DESKTOP",
        value_delimiter = ':'
    )]
    pub desktops: Vec<String>,
}

impl GlobalArgs {
    /// Environment first, then the settings file, then explicit flags.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::from_env();

        if let Some(path) = &self.config {
            let file = config::from_file(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?;
            settings.apply(file)?;
        }
        if let Some(user_dir) = &self.user_dir {
            settings.user_dir = user_dir.clone();
        }
        if !self.system_dirs.is_empty() {
            settings.system_dirs = self.system_dirs.clone();
        }
        if !self.desktops.is_empty() {
            settings = settings.with_desktop_names(self.desktops.iter().cloned());
        }

        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List autostart entries
    List(commands::list::ListArgs),

    /// Create a new autostart launcher
    Add(commands::add::AddArgs),

    /// Change the name, comment, command or delay of an entry
    Edit(commands::edit::EditArgs),

    /// Start an entry at login
    Enable(commands::toggle::ToggleArgs),

    /// Stop starting an entry at login
    Disable(commands::toggle::ToggleArgs),

    /// Remove an entry (hides it when a system file provides it)
    Remove(commands::remove::RemoveArgs),

    /// Copy a desktop file into the user autostart directory
    Import(commands::import::ImportArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.global.log_level);

        let global = self.global;
        match self.command {
            Commands::List(args) => commands::list::execute(&global, args),
            Commands::Add(args) => commands::add::execute(&global, args),
            Commands::Edit(args) => commands::edit::execute(&global, args),
            Commands::Enable(args) => commands::toggle::execute(&global, args, true),
            Commands::Disable(args) => commands::toggle::execute(&global, args, false),
            Commands::Remove(args) => commands::remove::execute(&global, args),
            Commands::Import(args) => commands::import::execute(&global, args),
        }
    }
}

/// `RUST_LOG` wins over `--log-level` when set.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
