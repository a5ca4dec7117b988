//! Bulk deletion with backup.

use std::collections::BTreeSet;

use camino::Utf8PathBuf;
use schemars::JsonSchema;
use serde::Serialize;

use crate::analysis::duplicates;
use crate::cache::DictionaryCache;
use crate::entry::DictionaryEntry;
use crate::error::HygieneResult;
use crate::store::LanguageCode;

/// What a bulk delete removes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "kind", content = "keys", rename_all = "kebab-case")]
pub enum DeletionTarget {
    /// Every entry whose word exactly equals one of these.
    Words(BTreeSet<String>),
    /// All but the highest-frequency entry of each named duplicate group.
    DuplicateSurplus(BTreeSet<String>),
}

impl DeletionTarget {
    /// Words or group keys this target names.
    pub const fn keys(&self) -> &BTreeSet<String> {
        match self {
            Self::Words(keys) | Self::DuplicateSurplus(keys) => keys,
        }
    }

    /// Whether the target names nothing.
    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }
}

/// Result of a committed delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct DeleteOutcome {
    /// Dictionary that was rewritten.
    pub language: LanguageCode,
    /// Entry count before the delete.
    pub before: usize,
    /// Entry count after the delete.
    pub after: usize,
    /// Entries removed.
    pub removed: usize,
    /// Backup taken before the overwrite.
    #[schemars(with = "String")]
    pub backup: Utf8PathBuf,
}

/// Entries left after removing `target` from `entries`, order preserved.
pub fn apply_target(entries: &[DictionaryEntry], target: &DeletionTarget) -> Vec<DictionaryEntry> {
    match target {
        DeletionTarget::Words(words) => entries
            .iter()
            .filter(|entry| !words.contains(&entry.word))
            .cloned()
            .collect(),
        DeletionTarget::DuplicateSurplus(keys) => {
            let surplus = duplicates::surplus_indices(entries, keys);
            entries
                .iter()
                .enumerate()
                .filter(|(index, _)| !surplus.contains(index))
                .map(|(_, entry)| entry.clone())
                .collect()
        }
    }
}

/// Remove `target` from the on-disk dictionary for `lang`.
///
/// Works from a fresh read of the file rather than the cached copy, writes a
/// backup, replaces the file, and then drops the cached copy.
#[tracing::instrument(skip(cache, target), fields(lang = %lang, keys = target.keys().len()))]
pub fn commit(
    cache: &DictionaryCache,
    lang: &LanguageCode,
    target: &DeletionTarget,
) -> HygieneResult<DeleteOutcome> {
    let store = cache.store();
    let entries = store.load(lang)?;
    let kept = apply_target(&entries, target);
    let backup = store.replace(lang, &kept)?;
    cache.invalidate(lang);

    let outcome = DeleteOutcome {
        language: lang.clone(),
        before: entries.len(),
        after: kept.len(),
        removed: entries.len() - kept.len(),
        backup,
    };
    tracing::info!(
        before = outcome.before,
        after = outcome.after,
        backup = %outcome.backup,
        "bulk delete committed"
    );
    Ok(outcome)
}
