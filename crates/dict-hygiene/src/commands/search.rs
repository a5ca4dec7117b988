//! Search command: substring lookup in a dictionary.

use anyhow::Context;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use dict_hygiene_core::Config;
use dict_hygiene_core::analysis::search::search;

use super::{BarProgress, LangArgs};

/// Arguments for the `search` subcommand.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to look for (case-insensitive).
    pub term: String,

    #[command(flatten)]
    pub lang: LangArgs,

    /// Maximum matches to show.
    #[arg(long, default_value_t = super::scan::DEFAULT_LIMIT)]
    pub limit: usize,
}

/// Search a dictionary and print the matches, highest frequency first.
#[instrument(name = "cmd_search", skip_all)]
pub fn cmd_search(
    args: SearchArgs,
    global_json: bool,
    show_progress: bool,
    config: &Config,
) -> anyhow::Result<()> {
    debug!(term = %args.term, lang = ?args.lang.lang, "executing search command");

    let store = config.store();
    let lang = args.lang.resolve(&store, config)?;
    let entries = store
        .load(&lang)
        .with_context(|| format!("failed to load {lang} dictionary"))?;

    let scanner = config.analysis_options(lang.as_str()).scanner();
    let mut progress = BarProgress::new(show_progress && !global_json, "searching");
    let result = search(&entries, &args.term, &scanner, &mut progress);
    progress.finish();
    let mut report = result?;

    let total_matches = report.matches.len();
    report.matches.truncate(args.limit);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {:?} in {} ({} entries): {} matches",
        "search".bold(),
        report.term,
        lang.as_str().cyan(),
        report.dictionary_size,
        total_matches,
    );
    match &report.exact {
        Some(entry) => println!("  {} {} ({})", "exact:".green(), entry.word, entry.freq),
        None => println!("  {}", "no exact match".dimmed()),
    }
    for entry in &report.matches {
        match &entry.part {
            Some(part) => println!("  {} {} {}", entry.word, entry.freq, part.dimmed()),
            None => println!("  {} {}", entry.word, entry.freq),
        }
    }
    if report.matches.len() < total_matches {
        println!(
            "  {}",
            format!("... {} more (raise --limit)", total_matches - report.matches.len()).dimmed()
        );
    }
    Ok(())
}
