//! Non-linguistic character detection.

use crate::classify::{self, Alphabet};
use crate::entry::DictionaryEntry;
use crate::scan::{ScanProgress, Scanner};

use super::AnalyzerKind;
use super::reports::{NonLinguisticWord, PassReport};

/// Find words with chars outside `alphabet`, spaces, digits, or invisible chars.
#[tracing::instrument(skip_all, fields(entries = entries.len()))]
pub fn analyze_non_linguistic(
    entries: &[DictionaryEntry],
    alphabet: &Alphabet,
    scanner: &Scanner,
    progress: &mut dyn ScanProgress,
) -> PassReport<NonLinguisticWord> {
    let items = scanner.scan(entries, |entry| classify_word(entry, alphabet), progress);
    PassReport::new(
        entries.len(),
        items,
        AnalyzerKind::NonLinguistic.categories(),
    )
}

fn classify_word(entry: &DictionaryEntry, alphabet: &Alphabet) -> Option<NonLinguisticWord> {
    let word = entry.word.as_str();
    let non_linguistic_chars = classify::non_linguistic_chars(word, alphabet);
    let has_spaces = classify::has_spaces(word);
    let has_digits = classify::has_digits(word);
    let has_invisible_chars = classify::has_invisible_chars(word);

    let flagged =
        !non_linguistic_chars.is_empty() || has_spaces || has_digits || has_invisible_chars;
    flagged.then(|| NonLinguisticWord {
        word: entry.word.clone(),
        freq: entry.freq,
        non_linguistic_chars,
        has_spaces,
        has_digits,
        has_invisible_chars,
    })
}
