//! Dictionary analysis passes.
//!
//! Each pass is a pure function over a slice of entries, in its own module.
//! [`run_analysis`] dispatches on [`AnalyzerKind`] so callers holding only a
//! kind (the CLI, the MCP server, an [`AnalyzerSession`]) get a tagged
//! [`AnalysisReport`] back.
//!
//! [`AnalyzerSession`]: crate::session::AnalyzerSession

pub mod case;
pub mod duplicates;
pub mod non_linguistic;
pub mod reports;
pub mod search;
pub mod short;

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use reports::{AnalysisReport, PassReport, SearchReport};

use crate::classify::Alphabet;
use crate::delete::DeletionTarget;
use crate::entry::DictionaryEntry;
use crate::filter::{Category, FilterSet};
use crate::scan::{DEFAULT_PROGRESS_INTERVAL, ScanProgress, Scanner};

/// The analyzers a session can run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum AnalyzerKind {
    /// Chars outside the alphabet, spaces, digits, invisible chars.
    NonLinguistic,
    /// Capitalized and all-caps words.
    Case,
    /// Words at or under the short-word limit.
    Short,
    /// Entries sharing a trimmed word.
    Duplicates,
}

/// Every analyzer, in display order.
pub const ALL_ANALYZERS: [AnalyzerKind; 4] = [
    AnalyzerKind::NonLinguistic,
    AnalyzerKind::Case,
    AnalyzerKind::Short,
    AnalyzerKind::Duplicates,
];

impl AnalyzerKind {
    /// Kebab-case name used on the command line and in JSON.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NonLinguistic => "non-linguistic",
            Self::Case => "case",
            Self::Short => "short",
            Self::Duplicates => "duplicates",
        }
    }

    /// Filter categories this analyzer reports.
    pub const fn categories(self) -> &'static [Category] {
        match self {
            Self::NonLinguistic => &[
                Category::Digits,
                Category::Spaces,
                Category::NonLinguistic,
                Category::Invisible,
            ],
            Self::Case => &[Category::CapitalFirst, Category::AllCaps],
            Self::Short => &[Category::Short],
            Self::Duplicates => &[Category::Duplicate],
        }
    }

    /// Filter set with every category of this analyzer enabled.
    pub fn default_filters(self) -> FilterSet {
        FilterSet::all(self.categories())
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters shared by every pass.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Letters of the dictionary's language.
    pub alphabet: Alphabet,
    /// Longest trimmed length the short-word pass flags.
    pub short_max_len: usize,
    /// Entries between progress reports.
    pub progress_interval: usize,
}

impl AnalysisOptions {
    /// Defaults with the given alphabet.
    pub const fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            short_max_len: short::DEFAULT_SHORT_MAX_LEN,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Scanner configured with this progress interval.
    pub const fn scanner(&self) -> Scanner {
        Scanner::new().with_progress_interval(self.progress_interval)
    }
}

/// Run the pass named by `kind`.
#[tracing::instrument(skip(entries, options, progress), fields(entries = entries.len()))]
pub fn run_analysis(
    kind: AnalyzerKind,
    entries: &[DictionaryEntry],
    options: &AnalysisOptions,
    progress: &mut dyn ScanProgress,
) -> AnalysisReport {
    let scanner = options.scanner();
    let report = match kind {
        AnalyzerKind::NonLinguistic => AnalysisReport::NonLinguistic(
            non_linguistic::analyze_non_linguistic(entries, &options.alphabet, &scanner, progress),
        ),
        AnalyzerKind::Case => AnalysisReport::Case(case::analyze_case(entries, &scanner, progress)),
        AnalyzerKind::Short => AnalysisReport::Short(short::analyze_short(
            entries,
            options.short_max_len,
            &scanner,
            progress,
        )),
        AnalyzerKind::Duplicates => AnalysisReport::Duplicates(duplicates::analyze_duplicates(
            entries, &scanner, progress,
        )),
    };
    tracing::info!(analyzer = %kind, matched = report.len(), "analysis complete");
    report
}

/// What deleting the filtered view of `report` would remove.
///
/// Word passes delete the listed words outright. The duplicate pass keeps
/// one entry of every listed group.
pub fn deletion_target(report: &AnalysisReport, filters: &FilterSet) -> DeletionTarget {
    let keys = report.filtered_keys(filters);
    match report {
        AnalysisReport::Duplicates(_) => DeletionTarget::DuplicateSurplus(keys),
        _ => DeletionTarget::Words(keys),
    }
}
