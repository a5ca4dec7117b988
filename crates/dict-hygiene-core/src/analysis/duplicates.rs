//! Duplicate grouping.
//!
//! Entries are grouped by their trimmed word. The key is compared as-is, so
//! `"Apple"` and `"apple"` land in different groups.

use std::collections::{BTreeSet, HashMap};

use crate::entry::DictionaryEntry;
use crate::scan::{ScanProgress, Scanner};

use super::AnalyzerKind;
use super::reports::{DuplicateGroup, PassReport};

/// Group entries sharing a trimmed word, keeping only groups of two or more.
///
/// Entries in a group keep their dictionary order. Groups come out sorted by
/// total frequency, highest first; ties keep first-seen order.
#[tracing::instrument(skip_all, fields(entries = entries.len()))]
pub fn analyze_duplicates(
    entries: &[DictionaryEntry],
    scanner: &Scanner,
    progress: &mut dyn ScanProgress,
) -> PassReport<DuplicateGroup> {
    // Each group is emitted when the scan reaches its first member.
    let first_seen: HashMap<usize, Vec<usize>> = group_indices(entries)
        .into_iter()
        .filter(|indices| indices.len() > 1)
        .map(|indices| (indices[0], indices))
        .collect();

    let items = scanner.scan_indexed(
        entries,
        |index, _| {
            let members: Vec<DictionaryEntry> = first_seen
                .get(&index)?
                .iter()
                .map(|&i| entries[i].clone())
                .collect();
            Some(DuplicateGroup {
                word: entries[index].word.trim().to_string(),
                total_freq: members
                    .iter()
                    .fold(0u64, |acc, e| acc.saturating_add(e.freq)),
                entries: members,
            })
        },
        progress,
    );
    PassReport::new(entries.len(), items, AnalyzerKind::Duplicates.categories())
}

/// Indices of the entries that deduplicating the groups named by `keys`
/// would remove.
///
/// Each named group keeps its highest-frequency entry (the earliest on ties).
/// Works by position, so literal-identical entries leave exactly one behind.
pub fn surplus_indices(entries: &[DictionaryEntry], keys: &BTreeSet<String>) -> BTreeSet<usize> {
    group_indices(entries)
        .into_iter()
        .filter(|indices| indices.len() > 1)
        .filter(|indices| keys.contains(entries[indices[0]].word.trim()))
        .flat_map(|indices| {
            let keep = indices
                .iter()
                .copied()
                .reduce(|best, i| {
                    if entries[i].freq > entries[best].freq {
                        i
                    } else {
                        best
                    }
                })
                .unwrap_or(indices[0]);
            indices.into_iter().filter(move |&i| i != keep)
        })
        .collect()
}

/// Entry indices per trimmed key, groups in first-seen order.
fn group_indices(entries: &[DictionaryEntry]) -> Vec<Vec<usize>> {
    let mut slot: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let key = entry.word.trim();
        match slot.get(key) {
            Some(&g) => groups[g].push(index),
            None => {
                slot.insert(key, groups.len());
                groups.push(vec![index]);
            }
        }
    }
    groups
}
