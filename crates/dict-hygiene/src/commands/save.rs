//! Save command: replace a dictionary from a JSON file.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use dict_hygiene_core::Config;

/// Arguments for the `save` subcommand.
#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Language of the dictionary to replace.
    pub language: String,

    /// JSON file holding the new `[{"word": ..., "freq": ...}]` array.
    pub file: Utf8PathBuf,
}

#[derive(Serialize)]
struct SaveOutput<'a> {
    success: bool,
    language: &'a str,
    backup: String,
}

/// Back up the current dictionary and replace it with the file's contents.
#[instrument(name = "cmd_save", skip_all, fields(language = %args.language, file = %args.file))]
pub fn cmd_save(args: SaveArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(language = %args.language, file = %args.file, "executing save command");

    let payload = std::fs::read_to_string(args.file.as_std_path())
        .with_context(|| format!("failed to read {}", args.file))?;
    let backup = config
        .store()
        .save_serialized(&args.language, &payload)
        .with_context(|| format!("failed to save {} dictionary", args.language))?;

    if global_json {
        let output = SaveOutput {
            success: true,
            language: &args.language,
            backup: backup.to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{} saved {} dictionary from {}",
            "DONE:".green(),
            args.language.cyan(),
            args.file
        );
        println!("{}: {}", "Backup".dimmed(), backup);
    }
    Ok(())
}
