//! Dictionary entries.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One `{word, freq}` record of a word-frequency dictionary.
///
/// Entries are not unique by `word`: the same surface form may appear more
/// than once, possibly with different case or surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DictionaryEntry {
    /// Surface form.
    pub word: String,
    /// Observed corpus frequency.
    pub freq: u64,
    /// Optional part-of-speech tag carried by some dictionaries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<String>,
}

impl DictionaryEntry {
    /// Create an entry without a part-of-speech tag.
    pub fn new(word: impl Into<String>, freq: u64) -> Self {
        Self {
            word: word.into(),
            freq,
            part: None,
        }
    }
}

/// Anything that ranks by corpus frequency.
///
/// Scan results and duplicate groups are ordered by this value, highest first.
pub trait Ranked {
    /// Frequency used for ordering.
    fn rank(&self) -> u64;
}

impl Ranked for DictionaryEntry {
    fn rank(&self) -> u64 {
        self.freq
    }
}

/// Stable sort by [`Ranked::rank`], descending.
pub(crate) fn sort_by_rank_desc<T: Ranked>(items: &mut [T]) {
    items.sort_by_key(|item| std::cmp::Reverse(item.rank()));
}
