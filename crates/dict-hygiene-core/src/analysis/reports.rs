//! Report structs for dictionary analysis passes.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for
//! use in both CLI JSON output and MCP tool responses.

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entry::{DictionaryEntry, Ranked};
use crate::filter::{self, Categorized, Category, FilterSet};

use super::AnalyzerKind;

/// A classified item that is identified by a word string.
pub trait Keyed {
    /// The word (or, for duplicate groups, the trimmed key).
    fn key(&self) -> &str;
}

/// A word with non-linguistic content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NonLinguisticWord {
    /// Surface form.
    pub word: String,
    /// Corpus frequency.
    pub freq: u64,
    /// Offending chars in order, repeats kept.
    pub non_linguistic_chars: String,
    /// Contains a space.
    pub has_spaces: bool,
    /// Contains an ASCII digit.
    pub has_digits: bool,
    /// Contains control or zero-width chars.
    pub has_invisible_chars: bool,
}

/// A word with a capital first letter or written in all caps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CaseWord {
    /// Surface form.
    pub word: String,
    /// Corpus frequency.
    pub freq: u64,
    /// Title case (capital first letter, rest not all caps).
    pub is_capital_first: bool,
    /// Entirely uppercase.
    pub is_all_caps: bool,
}

/// A word at or under the short-word length limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ShortWord {
    /// Surface form.
    pub word: String,
    /// Corpus frequency.
    pub freq: u64,
    /// Char count after trimming.
    pub length: usize,
}

/// Two or more entries sharing the same trimmed word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DuplicateGroup {
    /// Trimmed key shared by every entry.
    pub word: String,
    /// Entries in first-seen order.
    pub entries: Vec<DictionaryEntry>,
    /// Sum of the entries' frequencies, saturating at `u64::MAX`.
    pub total_freq: u64,
}

/// Result of one classification pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PassReport<T> {
    /// Entries in the dictionary when the scan ran.
    pub total_scanned: usize,
    /// Per-category counts over every match, regardless of filters.
    pub counts: BTreeMap<Category, usize>,
    /// Matches, highest frequency first.
    pub items: Vec<T>,
}

impl<T: Categorized + Clone + Keyed> PassReport<T> {
    pub(crate) fn new(total_scanned: usize, items: Vec<T>, categories: &[Category]) -> Self {
        Self {
            total_scanned,
            counts: filter::counts(&items, categories),
            items,
        }
    }

    /// Copy of this report holding only the items the filters admit.
    ///
    /// Counts stay those of the full result set.
    pub fn filtered(&self, filters: &FilterSet) -> Self {
        Self {
            total_scanned: self.total_scanned,
            counts: self.counts.clone(),
            items: filter::apply(&self.items, filters)
                .into_iter()
                .cloned()
                .collect(),
        }
    }

    /// Keys of the items the filters admit.
    pub fn filtered_keys(&self, filters: &FilterSet) -> BTreeSet<String> {
        filter::apply(&self.items, filters)
            .into_iter()
            .map(|item| item.key().to_string())
            .collect()
    }

    /// Keep only the first `limit` items. Counts are left as they are.
    pub fn truncate(&mut self, limit: usize) {
        self.items.truncate(limit);
    }

    /// Drop every item whose key is in `keys` and recount.
    pub fn prune(&mut self, keys: &BTreeSet<String>, categories: &[Category]) {
        self.items.retain(|item| !keys.contains(item.key()));
        self.counts = filter::counts(&self.items, categories);
    }
}

/// Report of any analyzer, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "analyzer", rename_all = "kebab-case")]
pub enum AnalysisReport {
    /// Non-linguistic character pass.
    NonLinguistic(PassReport<NonLinguisticWord>),
    /// Letter-case pass.
    Case(PassReport<CaseWord>),
    /// Short-word pass.
    Short(PassReport<ShortWord>),
    /// Duplicate grouping pass.
    Duplicates(PassReport<DuplicateGroup>),
}

impl AnalysisReport {
    /// Which analyzer produced this report.
    pub const fn kind(&self) -> AnalyzerKind {
        match self {
            Self::NonLinguistic(_) => AnalyzerKind::NonLinguistic,
            Self::Case(_) => AnalyzerKind::Case,
            Self::Short(_) => AnalyzerKind::Short,
            Self::Duplicates(_) => AnalyzerKind::Duplicates,
        }
    }

    /// Entries scanned.
    pub const fn total_scanned(&self) -> usize {
        match self {
            Self::NonLinguistic(r) => r.total_scanned,
            Self::Case(r) => r.total_scanned,
            Self::Short(r) => r.total_scanned,
            Self::Duplicates(r) => r.total_scanned,
        }
    }

    /// Per-category counts over the unfiltered results.
    pub const fn counts(&self) -> &BTreeMap<Category, usize> {
        match self {
            Self::NonLinguistic(r) => &r.counts,
            Self::Case(r) => &r.counts,
            Self::Short(r) => &r.counts,
            Self::Duplicates(r) => &r.counts,
        }
    }

    /// Number of matched items.
    pub fn len(&self) -> usize {
        match self {
            Self::NonLinguistic(r) => r.items.len(),
            Self::Case(r) => r.items.len(),
            Self::Short(r) => r.items.len(),
            Self::Duplicates(r) => r.items.len(),
        }
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy restricted to what the filters admit.
    pub fn filtered(&self, filters: &FilterSet) -> Self {
        match self {
            Self::NonLinguistic(r) => Self::NonLinguistic(r.filtered(filters)),
            Self::Case(r) => Self::Case(r.filtered(filters)),
            Self::Short(r) => Self::Short(r.filtered(filters)),
            Self::Duplicates(r) => Self::Duplicates(r.filtered(filters)),
        }
    }

    /// Keys of the items in the filtered view.
    pub fn filtered_keys(&self, filters: &FilterSet) -> BTreeSet<String> {
        match self {
            Self::NonLinguistic(r) => r.filtered_keys(filters),
            Self::Case(r) => r.filtered_keys(filters),
            Self::Short(r) => r.filtered_keys(filters),
            Self::Duplicates(r) => r.filtered_keys(filters),
        }
    }

    /// Keep only the first `limit` items.
    pub fn truncate(&mut self, limit: usize) {
        match self {
            Self::NonLinguistic(r) => r.truncate(limit),
            Self::Case(r) => r.truncate(limit),
            Self::Short(r) => r.truncate(limit),
            Self::Duplicates(r) => r.truncate(limit),
        }
    }

    /// Remove items whose key is in `keys` and recompute the counts.
    pub fn prune(&mut self, keys: &BTreeSet<String>) {
        let categories = self.kind().categories();
        match self {
            Self::NonLinguistic(r) => r.prune(keys, categories),
            Self::Case(r) => r.prune(keys, categories),
            Self::Short(r) => r.prune(keys, categories),
            Self::Duplicates(r) => r.prune(keys, categories),
        }
    }
}

/// Result of a dictionary search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchReport {
    /// Normalized (trimmed, lowercased) search term.
    pub term: String,
    /// Entries in the dictionary.
    pub dictionary_size: usize,
    /// Entry equal to the term, ignoring case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact: Option<DictionaryEntry>,
    /// Entries containing the term, highest frequency first.
    pub matches: Vec<DictionaryEntry>,
}

impl Ranked for NonLinguisticWord {
    fn rank(&self) -> u64 {
        self.freq
    }
}

impl Ranked for CaseWord {
    fn rank(&self) -> u64 {
        self.freq
    }
}

impl Ranked for ShortWord {
    fn rank(&self) -> u64 {
        self.freq
    }
}

impl Ranked for DuplicateGroup {
    fn rank(&self) -> u64 {
        self.total_freq
    }
}

impl Keyed for NonLinguisticWord {
    fn key(&self) -> &str {
        &self.word
    }
}

impl Keyed for CaseWord {
    fn key(&self) -> &str {
        &self.word
    }
}

impl Keyed for ShortWord {
    fn key(&self) -> &str {
        &self.word
    }
}

impl Keyed for DuplicateGroup {
    fn key(&self) -> &str {
        &self.word
    }
}

impl Categorized for NonLinguisticWord {
    fn has(&self, category: Category) -> bool {
        match category {
            Category::Digits => self.has_digits,
            Category::Spaces => self.has_spaces,
            Category::NonLinguistic => !self.non_linguistic_chars.is_empty(),
            Category::Invisible => self.has_invisible_chars,
            _ => false,
        }
    }
}

impl Categorized for CaseWord {
    fn has(&self, category: Category) -> bool {
        match category {
            Category::CapitalFirst => self.is_capital_first && !self.is_all_caps,
            Category::AllCaps => self.is_all_caps,
            _ => false,
        }
    }
}

impl Categorized for ShortWord {
    fn has(&self, category: Category) -> bool {
        category == Category::Short
    }
}

impl Categorized for DuplicateGroup {
    fn has(&self, category: Category) -> bool {
        category == Category::Duplicate
    }
}
