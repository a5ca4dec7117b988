//! Short-word analysis.

use crate::entry::DictionaryEntry;
use crate::scan::{ScanProgress, Scanner};

use super::AnalyzerKind;
use super::reports::{PassReport, ShortWord};

/// Default upper bound (inclusive) on trimmed word length.
pub const DEFAULT_SHORT_MAX_LEN: usize = 2;

/// Find words whose trimmed length, in chars, is at most `max_len`.
#[tracing::instrument(skip_all, fields(entries = entries.len(), max_len))]
pub fn analyze_short(
    entries: &[DictionaryEntry],
    max_len: usize,
    scanner: &Scanner,
    progress: &mut dyn ScanProgress,
) -> PassReport<ShortWord> {
    let items = scanner.scan(
        entries,
        |entry| {
            let length = entry.word.trim().chars().count();
            (length <= max_len).then(|| ShortWord {
                word: entry.word.clone(),
                freq: entry.freq,
                length,
            })
        },
        progress,
    );
    PassReport::new(entries.len(), items, AnalyzerKind::Short.categories())
}
