//! Letter-case analysis.

use crate::classify;
use crate::entry::DictionaryEntry;
use crate::scan::{ScanProgress, Scanner};

use super::AnalyzerKind;
use super::reports::{CaseWord, PassReport};

/// Find title-case and all-caps words.
///
/// Empty words and words containing a space are skipped.
#[tracing::instrument(skip_all, fields(entries = entries.len()))]
pub fn analyze_case(
    entries: &[DictionaryEntry],
    scanner: &Scanner,
    progress: &mut dyn ScanProgress,
) -> PassReport<CaseWord> {
    let items = scanner.scan(entries, classify_word, progress);
    PassReport::new(entries.len(), items, AnalyzerKind::Case.categories())
}

fn classify_word(entry: &DictionaryEntry) -> Option<CaseWord> {
    let word = entry.word.as_str();
    if word.is_empty() || classify::has_spaces(word) {
        return None;
    }
    let is_capital_first = classify::is_starts_with_capital(word);
    let is_all_caps = classify::is_all_caps(word);
    (is_capital_first || is_all_caps).then(|| CaseWord {
        word: entry.word.clone(),
        freq: entry.freq,
        is_capital_first,
        is_all_caps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Category, FilterSet};
    use crate::scan::NoProgress;

    fn run(words: &[(&str, u64)]) -> PassReport<CaseWord> {
        let entries: Vec<_> = words
            .iter()
            .map(|(w, f)| DictionaryEntry::new(*w, *f))
            .collect();
        analyze_case(&entries, &Scanner::new(), &mut NoProgress)
    }

    #[test]
    fn apple_banana_scenario() {
        let report = run(&[("Apple", 10), ("apple", 50), ("BANANA", 5)]);
        let words: Vec<_> = report.items.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, ["Apple", "BANANA"]);
        assert!(report.items[0].is_capital_first);
        assert!(!report.items[0].is_all_caps);
        assert!(report.items[1].is_all_caps);
        assert!(!report.items[1].is_capital_first);
    }

    #[test]
    fn skips_empty_and_spaced_words() {
        let report = run(&[("", 1), ("Нова Пошта", 7), ("NATO", 2)]);
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].word, "NATO");
    }

    #[test]
    fn counts_split_capital_first_and_all_caps() {
        let report = run(&[("Київ", 3), ("ЗСУ", 2), ("Львів", 1), ("мова", 9)]);
        assert_eq!(report.counts[&Category::CapitalFirst], 2);
        assert_eq!(report.counts[&Category::AllCaps], 1);
    }

    #[test]
    fn filter_or_semantics() {
        let report = run(&[("Київ", 3), ("ЗСУ", 2)]);
        let mut filters = FilterSet::all(AnalyzerKind::Case.categories());
        filters.disable(Category::CapitalFirst);
        let view = report.filtered(&filters);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].word, "ЗСУ");

        assert!(report.filtered(&FilterSet::none()).items.is_empty());
    }
}
