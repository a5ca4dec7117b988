//! Single-pass dictionary scanning with throttled progress.

use crate::entry::{DictionaryEntry, Ranked, sort_by_rank_desc};

/// Default number of entries between progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

/// Receives `(scanned, total)` updates while a scan runs.
pub trait ScanProgress {
    /// Called every interval and once more when the pass is complete.
    fn on_progress(&mut self, scanned: usize, total: usize);
}

impl<F: FnMut(usize, usize)> ScanProgress for F {
    fn on_progress(&mut self, scanned: usize, total: usize) {
        self(scanned, total);
    }
}

/// Progress sink that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ScanProgress for NoProgress {
    fn on_progress(&mut self, _scanned: usize, _total: usize) {}
}

/// Drives one classification pass over an entry list.
#[derive(Debug, Clone, Copy)]
pub struct Scanner {
    progress_interval: usize,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    /// Scanner reporting every [`DEFAULT_PROGRESS_INTERVAL`] entries.
    pub const fn new() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Report progress every `interval` entries (zero is treated as one).
    pub const fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = if interval == 0 { 1 } else { interval };
        self
    }

    /// Entries between progress reports.
    pub const fn progress_interval(&self) -> usize {
        self.progress_interval
    }

    /// Apply `classify` to every entry in order, keep the matches, and sort
    /// them by frequency, highest first (stable).
    pub fn scan<T, F>(
        &self,
        entries: &[DictionaryEntry],
        mut classify: F,
        progress: &mut dyn ScanProgress,
    ) -> Vec<T>
    where
        T: Ranked,
        F: FnMut(&DictionaryEntry) -> Option<T>,
    {
        self.scan_indexed(entries, |_, entry| classify(entry), progress)
    }

    /// Like [`scan`](Self::scan), but `classify` also gets the entry's index.
    #[tracing::instrument(skip_all, fields(total = entries.len(), interval = self.progress_interval))]
    pub fn scan_indexed<T, F>(
        &self,
        entries: &[DictionaryEntry],
        mut classify: F,
        progress: &mut dyn ScanProgress,
    ) -> Vec<T>
    where
        T: Ranked,
        F: FnMut(usize, &DictionaryEntry) -> Option<T>,
    {
        let total = entries.len();
        let mut found = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            if let Some(item) = classify(index, entry) {
                found.push(item);
            }
            if index % self.progress_interval == 0 {
                progress.on_progress(index, total);
            }
        }

        sort_by_rank_desc(&mut found);
        progress.on_progress(total, total);
        tracing::debug!(matched = found.len(), "scan complete");
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<DictionaryEntry> {
        (0..n)
            .map(|i| DictionaryEntry::new(format!("w{i}"), i as u64))
            .collect()
    }

    #[test]
    fn keeps_matches_sorted_by_freq() {
        let list = vec![
            DictionaryEntry::new("a", 1),
            DictionaryEntry::new("bb", 9),
            DictionaryEntry::new("c", 5),
        ];
        let found = Scanner::new().scan(
            &list,
            |e| (e.word.len() == 1).then(|| e.clone()),
            &mut NoProgress,
        );
        let words: Vec<_> = found.iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, ["c", "a"]);
    }

    #[test]
    fn progress_is_throttled_and_finishes_at_total() {
        let list = entries(25);
        let mut updates = Vec::new();
        let mut sink = |scanned: usize, total: usize| updates.push((scanned, total));
        Scanner::new()
            .with_progress_interval(10)
            .scan(&list, |_| None::<DictionaryEntry>, &mut sink);
        assert_eq!(updates, [(0, 25), (10, 25), (20, 25), (25, 25)]);
    }

    #[test]
    fn empty_input_reports_completion() {
        let mut updates = Vec::new();
        let mut sink = |scanned: usize, total: usize| updates.push((scanned, total));
        let found = Scanner::new().scan(&[], |e| Some(e.clone()), &mut sink);
        assert!(found.is_empty());
        assert_eq!(updates, [(0, 0)]);
    }

    #[test]
    fn zero_interval_reports_every_entry() {
        let list = entries(3);
        let mut count = 0;
        let mut sink = |_: usize, _: usize| count += 1;
        Scanner::new()
            .with_progress_interval(0)
            .scan(&list, |_| None::<DictionaryEntry>, &mut sink);
        assert_eq!(count, 4);
    }
}
