//! CLI definitions and command dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ezfc_core::{ConfigStore, MAX_PRIORITY};

use crate::commands::{AddArgs, FontsArgs, RemoveArgs, ShowArgs};

#[derive(Parser)]
#[command(name = "ezfc-tool", version)]
#[command(about = "Manage font aliases, substitutes and rendering properties")]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,
    #[command(subcommand)]
    pub command: Commands,
}

/// Options selecting which layer a command works on.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Priority number in the file name
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(..=MAX_PRIORITY as i64))]
    pub priority: u32,
    /// Extra name used in the file name
    #[arg(short, long)]
    pub name: Option<String>,
    /// Directory holding the configuration files
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
    /// Leave files in the legacy directory alone
    #[arg(long)]
    pub no_migration: bool,
}

impl ConfigArgs {
    /// A store configured for the selected layer; nothing is read yet.
    pub fn store(&self) -> Result<ConfigStore> {
        let mut store = ConfigStore::new();
        store.set_priority(self.priority).context("Invalid priority")?;
        store.set_name(self.name.as_deref()).context("Invalid name")?;
        if let Some(dir) = &self.config_dir {
            store.set_config_dir(dir);
        }
        store.set_migration(!self.no_migration);
        Ok(store)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add an alias, substitutes or rendering properties for a font
    Add(AddArgs),
    /// Remove an alias, substitute or rendering properties
    Remove(RemoveArgs),
    /// Show aliases, features or the settings of a font
    Show(ShowArgs),
    /// List installed fonts for an alias and language
    Fonts(FontsArgs),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        for line in self.command.run(&self.config)? {
            println!("{line}");
        }
        Ok(())
    }
}

impl Commands {
    /// Run the command and return the lines to print.
    pub fn run(self, config: &ConfigArgs) -> Result<Vec<String>> {
        match self {
            Commands::Add(args) => args.run(config),
            Commands::Remove(args) => args.run(config),
            Commands::Show(args) => args.run(config),
            Commands::Fonts(args) => args.run(),
        }
    }
}
