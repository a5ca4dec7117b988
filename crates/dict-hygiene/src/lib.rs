//! Library interface for the `dict-hygiene` CLI.
//!
//! This crate exposes the CLI's argument parser and command structure as a library,
//! primarily for testing. The actual entry point is in `main.rs`.
//!
//! # Structure
//!
//! - [`Cli`] - The root argument parser (clap derive)
//! - [`Commands`] - Available subcommands
//! - [`commands`] - Command implementations
//! - `server` - MCP server (feature `mcp`)

pub mod commands;

#[cfg(feature = "mcp")]
pub mod server;

use camino::Utf8PathBuf;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal capabilities automatically.
    #[default]
    Auto,
    /// Always emit colors.
    Always,
    /// Never emit colors.
    Never,
}

impl ColorChoice {
    /// Configure global color output based on this choice.
    ///
    /// Call this once at startup to set the color mode.
    pub fn apply(self) {
        match self {
            Self::Auto => {} // owo-colors auto-detects by default
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG                   Log filter (e.g., debug, dict_hygiene_core=trace)
    DICT_HYGIENE_LOG_PATH      Explicit log file path
    DICT_HYGIENE_LOG_DIR       Log directory
    DICT_HYGIENE_DICT_DIR      Dictionary directory
    DICT_HYGIENE_<KEY>         Any other config key (e.g. DICT_HYGIENE_SHORT_MAX_LEN=3)
";
/// Command-line interface definition for dict-hygiene.
#[derive(Parser)]
#[command(name = "dict-hygiene")]
#[command(about = "Find and bulk-remove junk entries in word-frequency dictionaries", long_about = None)]
#[command(version, arg_required_else_help = true)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print only the version number (for scripting)
    #[arg(long)]
    pub version_only: bool,

    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true)]
    pub chdir: Option<PathBuf>,

    /// Directory holding `<lang>_words.json` files (overrides config)
    #[arg(long, global = true, value_name = "DIR")]
    pub dict_dir: Option<Utf8PathBuf>,

    /// Only print errors (suppresses warnings/info and progress bars)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Colorize output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available subcommands for the CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Run one analyzer over a dictionary and list what it flags
    Scan(commands::scan::ScanArgs),

    /// Find entries containing a term
    Search(commands::search::SearchArgs),

    /// Remove what an analyzer flags (preview unless --yes)
    Delete(commands::delete::DeleteArgs),

    /// Replace a dictionary from a JSON file, keeping a backup
    Save(commands::save::SaveArgs),

    /// List dictionary backups
    Backups(commands::backups::BackupsArgs),

    /// Show package information
    Info(commands::info::InfoArgs),

    /// Start MCP (Model Context Protocol) server on stdio
    #[cfg(feature = "mcp")]
    Serve(commands::serve::ServeArgs),
}

/// Returns the clap command, for help rendering and tests.
pub fn command() -> clap::Command {
    Cli::command()
}
