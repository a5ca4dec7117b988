//! Case-insensitive substring search over a dictionary.

use crate::entry::DictionaryEntry;
use crate::error::{HygieneError, HygieneResult};
use crate::scan::{ScanProgress, Scanner};

use super::reports::SearchReport;

/// Find every entry whose lowercased word contains the trimmed, lowercased
/// `term`.
///
/// When several entries equal the term ignoring case, the last one in
/// dictionary order is reported as the exact match.
#[tracing::instrument(skip_all, fields(entries = entries.len()))]
pub fn search(
    entries: &[DictionaryEntry],
    term: &str,
    scanner: &Scanner,
    progress: &mut dyn ScanProgress,
) -> HygieneResult<SearchReport> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Err(HygieneError::EmptySearchTerm);
    }

    let mut exact = None;
    let matches = scanner.scan(
        entries,
        |entry| {
            let folded = entry.word.to_lowercase();
            if folded == needle {
                exact = Some(entry.clone());
            }
            folded.contains(&needle).then(|| entry.clone())
        },
        progress,
    );

    tracing::debug!(term = %needle, matches = matches.len(), "search complete");
    Ok(SearchReport {
        term: needle,
        dictionary_size: entries.len(),
        exact,
        matches,
    })
}
