//! Process-lifetime cache of loaded dictionaries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::entry::DictionaryEntry;
use crate::error::HygieneResult;
use crate::store::{DictionaryStore, LanguageCode};

/// Shared, immutable snapshot of one dictionary.
pub type Entries = Arc<[DictionaryEntry]>;

/// Loads each dictionary once and hands out shared snapshots until an
/// explicit [`reload`](Self::reload) or [`invalidate`](Self::invalidate).
#[derive(Debug)]
pub struct DictionaryCache {
    store: DictionaryStore,
    loaded: Mutex<HashMap<LanguageCode, Entries>>,
}

impl DictionaryCache {
    /// Empty cache backed by `store`.
    pub fn new(store: DictionaryStore) -> Self {
        Self {
            store,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// The backing store.
    pub const fn store(&self) -> &DictionaryStore {
        &self.store
    }

    /// Cached entries for `lang`, loading them on first use.
    ///
    /// A failed load caches nothing.
    pub fn get_or_load(&self, lang: &LanguageCode) -> HygieneResult<Entries> {
        if let Some(hit) = self.lock().get(lang) {
            tracing::trace!(lang = %lang, "dictionary cache hit");
            return Ok(Arc::clone(hit));
        }
        self.reload(lang)
    }

    /// Load `lang` from disk and replace any cached copy.
    pub fn reload(&self, lang: &LanguageCode) -> HygieneResult<Entries> {
        let entries: Entries = self.store.load(lang)?.into();
        self.lock().insert(lang.clone(), Arc::clone(&entries));
        Ok(entries)
    }

    /// Drop the cached copy of `lang`; the next access reloads it.
    pub fn invalidate(&self, lang: &LanguageCode) {
        if self.lock().remove(lang).is_some() {
            tracing::debug!(lang = %lang, "dictionary cache invalidated");
        }
    }

    /// Whether `lang` is currently cached.
    pub fn is_cached(&self, lang: &LanguageCode) -> bool {
        self.lock().contains_key(lang)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<LanguageCode, Entries>> {
        // The map holds only complete snapshots, so a poisoned lock is still usable.
        self.loaded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
