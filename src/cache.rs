//! The three views the manager keeps per key.
//!
//! - `committed`: what the remote store last confirmed.
//! - `draft`: the operator's working copy while editing.
//! - `last_known_active`: the latest value each key had while it was switched on. Only
//!   grows; deactivating an entry or removing it remotely never clears its recall.

use crate::model::{CanonicalStore, Entry};
use crate::session::SessionError;

mod toggle;
pub use self::toggle::ToggleOutcome;

#[derive(Clone, Debug, Default)]
pub struct EntryCache {
    committed: CanonicalStore,
    draft: CanonicalStore,
    last_known_active: CanonicalStore,
}

impl EntryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously persisted recall. Inactive values are ignored.
    pub fn with_recall(recall: CanonicalStore) -> Self {
        let mut cache = Self::default();
        for (key, entry) in recall {
            cache.remember(&key, &entry);
        }
        cache
    }

    pub fn committed(&self) -> &CanonicalStore {
        &self.committed
    }

    pub fn draft(&self) -> &CanonicalStore {
        &self.draft
    }

    pub fn last_known_active(&self) -> &CanonicalStore {
        &self.last_known_active
    }

    pub fn recall(&self, key: &str) -> Option<&Entry> {
        self.last_known_active.get(key)
    }

    /// True when the draft has diverged from the committed view.
    pub fn is_dirty(&self) -> bool {
        self.draft != self.committed
    }

    /// Replace the committed view with a freshly pushed tree.
    ///
    /// Keys seen active for the first time seed their recall. The draft follows only when
    /// `mirror_draft` is set, i.e. when nobody is editing it.
    pub fn apply_remote(&mut self, incoming: CanonicalStore, mirror_draft: bool) {
        for (key, entry) in &incoming {
            if !self.last_known_active.contains_key(key) {
                self.remember(key, entry);
            }
        }
        self.committed = incoming;
        if mirror_draft {
            self.draft = self.committed.clone();
        }
    }

    /// Throw the draft away and start over from the committed view.
    pub fn reset_draft(&mut self) {
        self.draft = self.committed.clone();
    }

    /// Promote the draft after the remote accepted it.
    pub fn commit_draft(&mut self) {
        self.committed = self.draft.clone();
        let active: Vec<(String, Entry)> = self
            .draft
            .iter()
            .filter(|(_, e)| e.is_active())
            .map(|(k, e)| (k.clone(), e.clone()))
            .collect();
        for (key, entry) in active {
            self.remember(&key, &entry);
        }
    }

    pub fn set_url(&mut self, key: &str, url: &str) -> Result<(), SessionError> {
        self.draft_entry_mut(key)?.url = url.to_string();
        Ok(())
    }

    pub fn set_path(&mut self, key: &str, path: &str) -> Result<(), SessionError> {
        self.draft_entry_mut(key)?.path = path.to_string();
        Ok(())
    }

    /// Stage a key that the draft does not have yet.
    pub fn insert_draft(&mut self, key: &str, entry: Entry) -> Result<(), SessionError> {
        if self.draft.contains_key(key) {
            return Err(SessionError::DuplicateKey(key.to_string()));
        }
        self.draft.insert(key.to_string(), entry);
        Ok(())
    }

    /// Overwrite every key of `entries` in the draft, leaving other keys alone.
    pub fn stage_all(&mut self, entries: &CanonicalStore) {
        for (key, entry) in entries {
            self.draft.insert(key.clone(), entry.clone());
        }
    }

    fn draft_entry_mut(&mut self, key: &str) -> Result<&mut Entry, SessionError> {
        self.draft
            .get_mut(key)
            .ok_or_else(|| SessionError::UnknownKey(key.to_string()))
    }

    fn remember(&mut self, key: &str, entry: &Entry) {
        if entry.is_active() {
            self.last_known_active.insert(key.to_string(), entry.clone());
        }
    }
}

#[cfg(test)]
#[path = "tests/cache_tests.rs"]
mod tests;
