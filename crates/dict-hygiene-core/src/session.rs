//! Analyzer session state machine.
//!
//! A session owns one analyzer's latest results and walks through
//!
//! ```text
//! Idle -> Scanning -> Scanned -> ConfirmingDelete -> Deleting -> Idle
//!                        ^              |
//!                        +-- cancel ----+
//! ```
//!
//! Results are only published when a scan completes, so a failed scan never
//! leaves a partial list behind. A failed delete keeps the results and the
//! session returns to `Scanned`.

use schemars::JsonSchema;
use serde::Serialize;

use crate::analysis::{self, AnalysisOptions, AnalysisReport, AnalyzerKind};
use crate::cache::DictionaryCache;
use crate::delete::{self, DeleteOutcome, DeletionTarget};
use crate::error::{HygieneError, HygieneResult};
use crate::filter::FilterSet;
use crate::scan::ScanProgress;
use crate::store::LanguageCode;

/// Where a session is in its scan/delete cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    /// No results, or results kept from a finished delete.
    Idle,
    /// A scan is running.
    Scanning,
    /// Results are available.
    Scanned,
    /// A deletion target is awaiting confirmation.
    ConfirmingDelete,
    /// A delete is being written.
    Deleting,
}

impl SessionState {
    /// Lowercase name for messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Scanning => "scanning",
            Self::Scanned => "scanned",
            Self::ConfirmingDelete => "confirming delete",
            Self::Deleting => "deleting",
        }
    }
}

/// One analyzer's results and pending delete.
#[derive(Debug, Clone)]
pub struct AnalyzerSession {
    kind: AnalyzerKind,
    state: SessionState,
    language: Option<LanguageCode>,
    report: Option<AnalysisReport>,
    pending: Option<DeletionTarget>,
    last_error: Option<String>,
}

impl AnalyzerSession {
    /// Idle session for `kind`.
    pub const fn new(kind: AnalyzerKind) -> Self {
        Self {
            kind,
            state: SessionState::Idle,
            language: None,
            report: None,
            pending: None,
            last_error: None,
        }
    }

    /// Analyzer this session runs.
    pub const fn kind(&self) -> AnalyzerKind {
        self.kind
    }

    /// Current state.
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Language of the current results.
    pub const fn language(&self) -> Option<&LanguageCode> {
        self.language.as_ref()
    }

    /// Latest results, unfiltered.
    pub const fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    /// Target awaiting confirmation.
    pub const fn pending(&self) -> Option<&DeletionTarget> {
        self.pending.as_ref()
    }

    /// Message of the last failed delete, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Load `lang` through the cache and run this session's analyzer.
    ///
    /// Allowed from `Idle` or `Scanned`. On failure the session is `Idle`
    /// with no results.
    #[tracing::instrument(skip(self, cache, options, progress), fields(analyzer = %self.kind, lang = %lang))]
    pub fn scan(
        &mut self,
        cache: &DictionaryCache,
        lang: &LanguageCode,
        options: &AnalysisOptions,
        progress: &mut dyn ScanProgress,
    ) -> HygieneResult<&AnalysisReport> {
        self.require(&[SessionState::Idle, SessionState::Scanned], "scan")?;
        self.state = SessionState::Scanning;
        self.report = None;
        self.language = None;

        let entries = match cache.get_or_load(lang) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "scan aborted");
                self.state = SessionState::Idle;
                return Err(e);
            }
        };

        let report = analysis::run_analysis(self.kind, &entries, options, progress);
        self.language = Some(lang.clone());
        self.state = SessionState::Scanned;
        Ok(self.report.insert(report))
    }

    /// Compute what deleting the filtered view would remove and wait for
    /// confirmation.
    pub fn request_delete(&mut self, filters: &FilterSet) -> HygieneResult<&DeletionTarget> {
        self.require(&[SessionState::Scanned], "request a delete")?;
        let Some(report) = self.report.as_ref() else {
            return Err(self.invalid("request a delete"));
        };
        let target = analysis::deletion_target(report, filters);
        if target.is_empty() {
            return Err(HygieneError::NothingToDelete);
        }
        tracing::debug!(analyzer = %self.kind, keys = target.keys().len(), "delete requested");
        self.state = SessionState::ConfirmingDelete;
        Ok(self.pending.insert(target))
    }

    /// Drop the pending target and go back to `Scanned`.
    pub fn cancel_delete(&mut self) -> HygieneResult<()> {
        self.require(&[SessionState::ConfirmingDelete], "cancel a delete")?;
        self.pending = None;
        self.state = SessionState::Scanned;
        Ok(())
    }

    /// Write the pending delete.
    ///
    /// On success the deleted words (or deduplicated groups) are pruned from
    /// the results and the session is `Idle`. On failure it is `Scanned`
    /// with results untouched and [`last_error`](Self::last_error) set.
    #[tracing::instrument(skip(self, cache), fields(analyzer = %self.kind))]
    pub fn confirm_delete(&mut self, cache: &DictionaryCache) -> HygieneResult<DeleteOutcome> {
        self.require(&[SessionState::ConfirmingDelete], "confirm a delete")?;
        let (Some(target), Some(lang)) = (self.pending.take(), self.language.clone()) else {
            return Err(self.invalid("confirm a delete"));
        };
        self.state = SessionState::Deleting;

        match delete::commit(cache, &lang, &target) {
            Ok(outcome) => {
                if let Some(report) = self.report.as_mut() {
                    report.prune(target.keys());
                }
                self.last_error = None;
                self.state = SessionState::Idle;
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!(error = %e, "delete failed");
                self.last_error = Some(e.to_string());
                self.state = SessionState::Scanned;
                Err(e)
            }
        }
    }

    /// Settle a session left mid-flight by a panicked call.
    ///
    /// `Scanning` drops to `Idle` with no results. `Deleting` drops back to
    /// `Scanned` with results kept and [`last_error`](Self::last_error) set,
    /// since the write may or may not have landed. Other states are
    /// already consistent and are left alone.
    pub fn recover_interrupted(&mut self) {
        match self.state {
            SessionState::Scanning => {
                self.report = None;
                self.language = None;
                self.pending = None;
                self.state = SessionState::Idle;
            }
            SessionState::Deleting => {
                self.pending = None;
                self.last_error = Some("delete interrupted".to_string());
                self.state = SessionState::Scanned;
            }
            SessionState::Idle | SessionState::Scanned | SessionState::ConfirmingDelete => return,
        }
        tracing::warn!(
            analyzer = %self.kind,
            state = self.state.as_str(),
            "recovered interrupted session"
        );
    }

    fn require(&self, allowed: &[SessionState], action: &'static str) -> HygieneResult<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    const fn invalid(&self, action: &'static str) -> HygieneError {
        HygieneError::InvalidTransition {
            action,
            state: self.state.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Alphabet;
    use crate::entry::DictionaryEntry;
    use crate::error::ErrorKind;
    use crate::filter::Category;
    use crate::scan::NoProgress;
    use crate::store::DictionaryStore;
    use camino::Utf8PathBuf;
    use std::fs;
    use tempfile::TempDir;

    fn setup(entries: &[DictionaryEntry]) -> (TempDir, DictionaryCache, LanguageCode) {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        fs::write(
            dir.join("en_words.json"),
            serde_json::to_string(entries).unwrap(),
        )
        .unwrap();
        let store = DictionaryStore::with_default_languages(dir);
        let en = store.language("en").unwrap();
        (tmp, DictionaryCache::new(store), en)
    }

    fn options() -> AnalysisOptions {
        AnalysisOptions::new(Alphabet::builtin("en").unwrap())
    }

    fn apple_banana() -> Vec<DictionaryEntry> {
        vec![
            DictionaryEntry::new("Apple", 10),
            DictionaryEntry::new("apple", 50),
            DictionaryEntry::new("BANANA", 5),
        ]
    }

    #[test]
    fn full_cycle_prunes_results() {
        let (_tmp, cache, en) = setup(&apple_banana());
        let mut session = AnalyzerSession::new(AnalyzerKind::Case);
        session.scan(&cache, &en, &options(), &mut NoProgress).unwrap();
        assert_eq!(session.state(), SessionState::Scanned);

        let mut filters = AnalyzerKind::Case.default_filters();
        filters.disable(Category::CapitalFirst);
        session.request_delete(&filters).unwrap();
        assert_eq!(session.state(), SessionState::ConfirmingDelete);

        let outcome = session.confirm_delete(&cache).unwrap();
        assert_eq!(outcome.removed, 1);
        assert_eq!(session.state(), SessionState::Idle);

        let report = session.report().unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.counts()[&Category::AllCaps], 0);
        assert_eq!(report.counts()[&Category::CapitalFirst], 1);
    }

    #[test]
    fn cancel_returns_to_scanned_without_writing() {
        let (_tmp, cache, en) = setup(&apple_banana());
        let mut session = AnalyzerSession::new(AnalyzerKind::Case);
        session.scan(&cache, &en, &options(), &mut NoProgress).unwrap();
        session
            .request_delete(&AnalyzerKind::Case.default_filters())
            .unwrap();
        session.cancel_delete().unwrap();
        assert_eq!(session.state(), SessionState::Scanned);
        assert!(session.pending().is_none());
        assert!(cache.store().backups(&en).unwrap().is_empty());
    }

    #[test]
    fn confirm_requires_a_pending_request() {
        let (_tmp, cache, en) = setup(&apple_banana());
        let mut session = AnalyzerSession::new(AnalyzerKind::Case);
        let err = session.confirm_delete(&cache).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);

        session.scan(&cache, &en, &options(), &mut NoProgress).unwrap();
        assert!(session.confirm_delete(&cache).is_err());
        assert!(session.cancel_delete().is_err());
    }

    #[test]
    fn empty_filtered_view_is_nothing_to_delete() {
        let (_tmp, cache, en) = setup(&apple_banana());
        let mut session = AnalyzerSession::new(AnalyzerKind::Case);
        session.scan(&cache, &en, &options(), &mut NoProgress).unwrap();
        let err = session.request_delete(&FilterSet::none()).unwrap_err();
        assert!(matches!(err, HygieneError::NothingToDelete));
        assert_eq!(session.state(), SessionState::Scanned);
    }

    #[test]
    fn failed_scan_leaves_no_results() {
        let (_tmp, cache, en) = setup(&apple_banana());
        let mut session = AnalyzerSession::new(AnalyzerKind::Case);
        session.scan(&cache, &en, &options(), &mut NoProgress).unwrap();

        let es = cache.store().language("es").unwrap();
        let err = session
            .scan(&cache, &es, &options(), &mut NoProgress)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.report().is_none());
    }

    #[test]
    fn failed_delete_keeps_results() {
        let (_tmp, cache, en) = setup(&apple_banana());
        let mut session = AnalyzerSession::new(AnalyzerKind::Case);
        session.scan(&cache, &en, &options(), &mut NoProgress).unwrap();
        session
            .request_delete(&AnalyzerKind::Case.default_filters())
            .unwrap();

        fs::write(cache.store().path(&en), "not json").unwrap();
        let err = session.confirm_delete(&cache).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
        assert_eq!(session.state(), SessionState::Scanned);
        assert_eq!(session.report().unwrap().len(), 2);
        assert!(session.last_error().is_some());
    }

    #[test]
    fn duplicate_session_dedupes_groups() {
        let (_tmp, cache, en) = setup(&[
            DictionaryEntry::new("cat", 1),
            DictionaryEntry::new("cat ", 8),
            DictionaryEntry::new("dog", 2),
        ]);
        let mut session = AnalyzerSession::new(AnalyzerKind::Duplicates);
        session.scan(&cache, &en, &options(), &mut NoProgress).unwrap();
        session
            .request_delete(&AnalyzerKind::Duplicates.default_filters())
            .unwrap();
        session.confirm_delete(&cache).unwrap();

        let on_disk = cache.store().load(&en).unwrap();
        assert_eq!(
            on_disk,
            vec![DictionaryEntry::new("cat ", 8), DictionaryEntry::new("dog", 2)]
        );
        assert!(session.report().unwrap().is_empty());

        session.scan(&cache, &en, &options(), &mut NoProgress).unwrap();
        assert!(session.report().unwrap().is_empty());
    }

    #[test]
    fn panicked_scan_recovers_to_idle() {
        let (_tmp, cache, en) = setup(&apple_banana());
        let mut session = AnalyzerSession::new(AnalyzerKind::Case);
        session.scan(&cache, &en, &options(), &mut NoProgress).unwrap();

        let mut explode =
            |done: usize, _total: usize| assert_eq!(done, usize::MAX, "scan interrupted");
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = session.scan(&cache, &en, &options(), &mut explode);
        }));
        assert!(outcome.is_err());
        assert_eq!(session.state(), SessionState::Scanning);

        session.recover_interrupted();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.report().is_none());
        assert!(session.language().is_none());

        session.scan(&cache, &en, &options(), &mut NoProgress).unwrap();
        assert_eq!(session.state(), SessionState::Scanned);
    }

    #[test]
    fn interrupted_delete_recovers_to_scanned() {
        let (_tmp, cache, en) = setup(&apple_banana());
        let mut session = AnalyzerSession::new(AnalyzerKind::Case);
        session.scan(&cache, &en, &options(), &mut NoProgress).unwrap();
        session
            .request_delete(&AnalyzerKind::Case.default_filters())
            .unwrap();
        session.pending = None;
        session.state = SessionState::Deleting;

        session.recover_interrupted();
        assert_eq!(session.state(), SessionState::Scanned);
        assert_eq!(session.last_error(), Some("delete interrupted"));
        assert_eq!(session.report().unwrap().len(), 2);
        assert!(session.pending().is_none());

        session
            .request_delete(&AnalyzerKind::Case.default_filters())
            .unwrap();
        assert_eq!(session.state(), SessionState::ConfirmingDelete);
    }

    #[test]
    fn recovery_leaves_settled_states_alone() {
        let (_tmp, cache, en) = setup(&apple_banana());
        let mut session = AnalyzerSession::new(AnalyzerKind::Case);
        session.recover_interrupted();
        assert_eq!(session.state(), SessionState::Idle);

        session.scan(&cache, &en, &options(), &mut NoProgress).unwrap();
        session
            .request_delete(&AnalyzerKind::Case.default_filters())
            .unwrap();
        session.recover_interrupted();
        assert_eq!(session.state(), SessionState::ConfirmingDelete);
        assert!(session.pending().is_some());
        assert!(session.last_error().is_none());
    }
}
