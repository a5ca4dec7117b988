//! Delete command: remove what an analyzer flags, with a backup.

use anyhow::Context;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, info, instrument};

use dict_hygiene_core::{
    AnalyzerKind, AnalyzerSession, Config, DeleteOutcome, DeletionTarget, DictionaryCache,
    HygieneError, LanguageCode,
};

use super::{BarProgress, FilterArgs, LangArgs};

/// Keys listed in the text preview.
const PREVIEW_ROWS: usize = 20;

/// Arguments for the `delete` subcommand.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Analyzer whose filtered results are deleted.
    #[arg(value_enum)]
    pub analyzer: AnalyzerKind,

    #[command(flatten)]
    pub lang: LangArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Write the change. Without this only a preview is printed.
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Serialize)]
struct DeleteOutput<'a> {
    analyzer: AnalyzerKind,
    language: &'a LanguageCode,
    target: &'a DeletionTarget,
    committed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<DeleteOutcome>,
}

/// Scan, preview the deletion, and commit it when `--yes` is given.
#[instrument(name = "cmd_delete", skip_all, fields(analyzer = %args.analyzer, yes = args.yes))]
pub fn cmd_delete(
    args: DeleteArgs,
    global_json: bool,
    show_progress: bool,
    config: &Config,
) -> anyhow::Result<()> {
    debug!(analyzer = %args.analyzer, lang = ?args.lang.lang, hide = ?args.filter.hide, "executing delete command");

    let filters = args.filter.filters_for(args.analyzer)?;
    let cache = DictionaryCache::new(config.store());
    let lang = args.lang.resolve(cache.store(), config)?;
    let options = config.analysis_options(lang.as_str());

    let mut session = AnalyzerSession::new(args.analyzer);
    let mut progress = BarProgress::new(show_progress && !global_json, "scanning");
    let scanned = session.scan(&cache, &lang, &options, &mut progress).map(|_| ());
    progress.finish();
    scanned.with_context(|| format!("failed to scan {lang} dictionary"))?;

    let target = match session.request_delete(&filters) {
        Ok(target) => target.clone(),
        Err(HygieneError::NothingToDelete) => {
            let empty = DeletionTarget::Words(Default::default());
            return print_outcome(&args, &lang, &empty, None, global_json);
        }
        Err(e) => return Err(e.into()),
    };

    if !args.yes {
        session.cancel_delete()?;
        print_outcome(&args, &lang, &target, None, global_json)?;
        return Ok(());
    }

    let outcome = session
        .confirm_delete(&cache)
        .with_context(|| format!("failed to delete from {lang} dictionary"))?;
    info!(removed = outcome.removed, backup = %outcome.backup, "delete committed");
    print_outcome(&args, &lang, &target, Some(outcome), global_json)
}

fn print_outcome(
    args: &DeleteArgs,
    lang: &LanguageCode,
    target: &DeletionTarget,
    outcome: Option<DeleteOutcome>,
    global_json: bool,
) -> anyhow::Result<()> {
    if global_json {
        let output = DeleteOutput {
            analyzer: args.analyzer,
            language: lang,
            target,
            committed: outcome.is_some(),
            outcome,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let keys = target.keys();
    if keys.is_empty() {
        println!(
            "{} the current filters select nothing in {}",
            "nothing to delete:".green(),
            lang.as_str().cyan()
        );
        return Ok(());
    }

    let noun = match target {
        DeletionTarget::Words(_) => "words",
        DeletionTarget::DuplicateSurplus(_) => "duplicate groups",
    };
    println!(
        "{} {} {} from {} ({} analyzer)",
        "delete".bold(),
        keys.len(),
        noun,
        lang.as_str().cyan(),
        args.analyzer
    );
    for key in keys.iter().take(PREVIEW_ROWS) {
        println!("  {key:?}");
    }
    if keys.len() > PREVIEW_ROWS {
        println!("  {}", format!("... {} more", keys.len() - PREVIEW_ROWS).dimmed());
    }

    match outcome {
        Some(outcome) => {
            println!(
                "{} removed {} entries ({} -> {})",
                "DONE:".green(),
                outcome.removed,
                outcome.before,
                outcome.after
            );
            println!("{}: {}", "Backup".dimmed(), outcome.backup.cyan());
        }
        None => println!("{}", "preview only; re-run with --yes to delete".yellow()),
    }
    Ok(())
}
