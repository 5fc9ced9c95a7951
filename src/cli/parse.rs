//! CLI parse: clap types for kiln. No behavior; definitions only.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// kiln CLI - client for the kiln image build service
#[derive(Parser)]
#[command(name = "kiln")]
#[command(about = "Command line client for the kiln image build service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Emit one machine-readable JSON document instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,

    /// Service URL (overrides configuration)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Request timeout in seconds (overrides configuration)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage blueprints on the build service
    Blueprints {
        #[command(subcommand)]
        command: BlueprintCommands,
    },
    /// Inspect composes and fetch their artifacts
    Compose {
        #[command(subcommand)]
        command: ComposeCommands,
    },
    /// Query module metadata
    Modules {
        #[command(subcommand)]
        command: ModuleCommands,
    },
}

#[derive(Subcommand)]
pub enum BlueprintCommands {
    /// Show the blueprints in TOML format
    Show {
        /// Blueprint names (comma-separated lists allowed)
        #[arg(required = true)]
        blueprints: Vec<String>,
    },
    /// Save the blueprints to TOML files named BLUEPRINT.toml
    Save {
        /// Blueprint names (comma-separated lists allowed)
        #[arg(required = true)]
        blueprints: Vec<String>,
    },
    /// Show the blueprints depsolved package and module versions
    Freeze(FreezeArgs),
}

#[derive(Args)]
#[command(args_conflicts_with_subcommands = true)]
pub struct FreezeArgs {
    #[command(subcommand)]
    pub command: Option<FreezeCommands>,

    /// Blueprint names (comma-separated lists allowed)
    pub blueprints: Vec<String>,
}

#[derive(Subcommand)]
pub enum FreezeCommands {
    /// Show the complete frozen blueprints in TOML format
    Show {
        /// Blueprint names (comma-separated lists allowed)
        #[arg(required = true)]
        blueprints: Vec<String>,
    },
    /// Save the frozen blueprints to BLUEPRINT.frozen.toml files
    Save {
        /// Blueprint names (comma-separated lists allowed)
        #[arg(required = true)]
        blueprints: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum ComposeCommands {
    /// Show detailed information on the compose
    Info {
        /// Compose UUID
        uuid: String,
    },
    /// Download a tar of the logs for the compose
    Logs {
        /// Compose UUID
        uuid: String,
    },
    /// Download a tar of the metadata for the compose
    Metadata {
        /// Compose UUID
        uuid: String,
    },
}

#[derive(Subcommand)]
pub enum ModuleCommands {
    /// Show detailed info about the listed modules
    Info {
        /// Return results for this distribution only
        #[arg(long)]
        distro: Option<String>,

        /// Module names (comma-separated lists allowed)
        #[arg(required = true)]
        modules: Vec<String>,
    },
}
