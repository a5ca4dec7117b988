//! Scan command: run one analyzer and list what it flags.

use anyhow::Context;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use dict_hygiene_core::analysis::reports::{
    CaseWord, DuplicateGroup, NonLinguisticWord, PassReport, ShortWord,
};
use dict_hygiene_core::{
    AnalysisReport, AnalyzerKind, AnalyzerSession, Config, DictionaryCache, FilterSet,
    LanguageCode,
};

use super::{BarProgress, FilterArgs, LangArgs};

/// Rows printed when `--limit` is not given.
pub const DEFAULT_LIMIT: usize = 50;

/// Arguments for the `scan` subcommand.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Analyzer to run.
    #[arg(value_enum)]
    pub analyzer: AnalyzerKind,

    #[command(flatten)]
    pub lang: LangArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Maximum rows to show.
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,
}

/// JSON shape of a scan result.
#[derive(Debug, Serialize)]
pub struct ScanOutput<'a> {
    /// Dictionary that was scanned.
    pub language: &'a LanguageCode,
    /// Enabled filter categories.
    pub filters: &'a FilterSet,
    /// Items passing the filters, before the limit.
    pub matched: usize,
    /// Filtered, limited report; counts cover every match.
    #[serde(flatten)]
    pub report: AnalysisReport,
}

impl<'a> ScanOutput<'a> {
    /// Filter `report` and cap it at `limit` rows.
    pub fn new(
        language: &'a LanguageCode,
        report: &AnalysisReport,
        filters: &'a FilterSet,
        limit: usize,
    ) -> Self {
        let mut view = report.filtered(filters);
        let matched = view.len();
        view.truncate(limit);
        Self {
            language,
            filters,
            matched,
            report: view,
        }
    }
}

/// Run an analyzer over a dictionary and print the filtered results.
#[instrument(name = "cmd_scan", skip_all, fields(analyzer = %args.analyzer))]
pub fn cmd_scan(
    args: ScanArgs,
    global_json: bool,
    show_progress: bool,
    config: &Config,
) -> anyhow::Result<()> {
    debug!(analyzer = %args.analyzer, lang = ?args.lang.lang, hide = ?args.filter.hide, "executing scan command");

    let filters = args.filter.filters_for(args.analyzer)?;
    let cache = DictionaryCache::new(config.store());
    let lang = args.lang.resolve(cache.store(), config)?;
    let options = config.analysis_options(lang.as_str());

    let mut session = AnalyzerSession::new(args.analyzer);
    let mut progress = BarProgress::new(show_progress && !global_json, "scanning");
    let result = session.scan(&cache, &lang, &options, &mut progress);
    progress.finish();
    let report = result.with_context(|| format!("failed to scan {lang} dictionary"))?;

    let output = ScanOutput::new(&lang, report, &filters, args.limit);
    if global_json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_scan(&output, report.total_scanned());
    }
    Ok(())
}

/// Print a scan result as text.
pub fn print_scan(output: &ScanOutput<'_>, total_scanned: usize) {
    let report = &output.report;
    println!(
        "{} {} of {}: {} entries scanned, {} flagged",
        report.kind().as_str().bold(),
        "analysis".bold(),
        output.language.as_str().cyan(),
        total_scanned,
        output.matched,
    );

    let counts: Vec<String> = report
        .counts()
        .iter()
        .map(|(category, n)| {
            let label = if output.filters.is_enabled(*category) {
                category.as_str().to_string()
            } else {
                format!("{} (hidden)", category.as_str())
            };
            format!("{}: {n}", label.dimmed())
        })
        .collect();
    println!("  {}", counts.join("   "));

    if report.is_empty() {
        println!("  {}", "nothing to show".green());
        return;
    }

    match report {
        AnalysisReport::NonLinguistic(r) => print_non_linguistic(r),
        AnalysisReport::Case(r) => print_case(r),
        AnalysisReport::Short(r) => print_short(r),
        AnalysisReport::Duplicates(r) => print_duplicates(r),
    }

    if report.len() < output.matched {
        println!(
            "  {}",
            format!("... {} more (raise --limit)", output.matched - report.len()).dimmed()
        );
    }
}

fn print_non_linguistic(report: &PassReport<NonLinguisticWord>) {
    for item in &report.items {
        let mut tags = Vec::new();
        if !item.non_linguistic_chars.is_empty() {
            tags.push(format!("chars {:?}", item.non_linguistic_chars));
        }
        if item.has_spaces {
            tags.push("spaces".to_string());
        }
        if item.has_digits {
            tags.push("digits".to_string());
        }
        if item.has_invisible_chars {
            tags.push("invisible".to_string());
        }
        println!(
            "  {:?} {} {}",
            item.word,
            format!("({})", item.freq).dimmed(),
            tags.join(", ").yellow()
        );
    }
}

fn print_case(report: &PassReport<CaseWord>) {
    for item in &report.items {
        let tag = if item.is_all_caps {
            "all-caps"
        } else {
            "capital-first"
        };
        println!(
            "  {} {} {}",
            item.word,
            format!("({})", item.freq).dimmed(),
            tag.yellow()
        );
    }
}

fn print_short(report: &PassReport<ShortWord>) {
    for item in &report.items {
        println!(
            "  {:?} {} {}",
            item.word,
            format!("({})", item.freq).dimmed(),
            format!("length {}", item.length).yellow()
        );
    }
}

fn print_duplicates(report: &PassReport<DuplicateGroup>) {
    for group in &report.items {
        println!(
            "  {} {} {}",
            group.word.bold(),
            format!("x{}", group.entries.len()).yellow(),
            format!("(total {})", group.total_freq).dimmed()
        );
        for entry in &group.entries {
            println!("      {:?} {}", entry.word, entry.freq);
        }
    }
}
