//! Backups command: list backup files per language.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use dict_hygiene_core::Config;
use dict_hygiene_core::store::BackupFile;

/// Arguments for the `backups` subcommand.
#[derive(Args, Debug, Default)]
pub struct BackupsArgs {
    /// Only this language (default: every configured language)
    #[arg(short, long)]
    pub lang: Option<String>,
}

#[derive(Serialize)]
struct LanguageBackups {
    language: String,
    backups: Vec<BackupFile>,
}

/// List backups, oldest first.
#[instrument(name = "cmd_backups", skip_all)]
pub fn cmd_backups(args: BackupsArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(lang = ?args.lang, "executing backups command");

    let store = config.store();
    let codes: Vec<&str> = match args.lang.as_deref() {
        Some(code) => vec![code],
        None => config.languages.iter().map(String::as_str).collect(),
    };

    let mut listing = Vec::with_capacity(codes.len());
    for code in codes {
        let lang = store.language(code)?;
        listing.push(LanguageBackups {
            language: lang.to_string(),
            backups: store.backups(&lang)?,
        });
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for entry in &listing {
        println!(
            "{} {}",
            entry.language.bold(),
            format!("({} backups)", entry.backups.len()).dimmed()
        );
        for backup in &entry.backups {
            println!("  {} {}", backup.created_millis.to_string().dimmed(), backup.path);
        }
    }
    Ok(())
}
