//! Edit-session state machine over the entry cache.
//!
//! ```text
//! Viewing --start_edit--> Editing --cancel--> Viewing
//!                         Editing --save ok--> Viewing
//!                         Editing --save err--> Editing (draft kept)
//! ```
//!
//! Remote snapshots are accepted in either state. They always replace the committed
//! view but only reach the draft while viewing.

use std::sync::mpsc::Sender;

use crate::cache::{EntryCache, ToggleOutcome};
use crate::model::{CanonicalStore, Entry, SavePolicy, default_entries};
use crate::normalize::{denormalize, normalize};
use crate::remote::{Snapshot, TreeStore};
use crate::validate::{ValidationWarning, validate_store};

mod types;
pub use self::types::{EditState, Notice, RemoteEvent, SaveTicket, SessionError};

#[derive(Debug)]
struct PendingSave {
    id: u64,
    warnings: Vec<String>,
}

pub struct SyncController {
    state: EditState,
    cache: EntryCache,
    policy: SavePolicy,
    pending: Option<PendingSave>,
    next_ticket: u64,
    last_revision: Option<u64>,
    notices: Sender<Notice>,
}

impl SyncController {
    pub fn new(policy: SavePolicy, notices: Sender<Notice>) -> Self {
        Self {
            state: EditState::Viewing,
            cache: EntryCache::new(),
            policy,
            pending: None,
            next_ticket: 1,
            last_revision: None,
            notices,
        }
    }

    /// Seed the last-known-active recall, e.g. from persisted client state.
    pub fn with_recall(mut self, recall: CanonicalStore) -> Self {
        self.cache = EntryCache::with_recall(recall);
        self
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        self.state == EditState::Editing
    }

    pub fn save_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn policy(&self) -> SavePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: SavePolicy) {
        self.policy = policy;
    }

    pub fn cache(&self) -> &EntryCache {
        &self.cache
    }

    pub fn last_revision(&self) -> Option<u64> {
        self.last_revision
    }

    /// What the operator should see: the draft while editing, the committed view otherwise.
    pub fn view(&self) -> &CanonicalStore {
        match self.state {
            EditState::Editing => self.cache.draft(),
            EditState::Viewing => self.cache.committed(),
        }
    }

    pub fn warnings(&self) -> Vec<ValidationWarning> {
        validate_store(self.view())
    }

    pub fn start_edit(&mut self) -> Result<(), SessionError> {
        if self.state == EditState::Editing {
            return Err(SessionError::AlreadyEditing);
        }
        self.cache.reset_draft();
        self.state = EditState::Editing;
        tracing::debug!("edit session started");
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.require_mutable()?;
        self.cache.reset_draft();
        self.state = EditState::Viewing;
        tracing::debug!("edit session cancelled");
        Ok(())
    }

    pub fn set_url(&mut self, key: &str, url: &str) -> Result<(), SessionError> {
        self.require_mutable()?;
        self.cache.set_url(key, url)
    }

    pub fn set_path(&mut self, key: &str, path: &str) -> Result<(), SessionError> {
        self.require_mutable()?;
        self.cache.set_path(key, path)
    }

    pub fn toggle(&mut self, key: &str) -> Result<ToggleOutcome, SessionError> {
        self.require_mutable()?;
        let outcome = self.cache.toggle(key)?;
        tracing::debug!(key, ?outcome, "toggled entry");
        Ok(outcome)
    }

    /// Stage a brand new key. It reaches the remote with the next save.
    pub fn add_entry(&mut self, key: &str, entry: Entry) -> Result<(), SessionError> {
        self.require_mutable()?;
        let key = key.trim();
        if key.is_empty() {
            return Err(SessionError::EmptyKey);
        }
        self.cache.insert_draft(key, entry)
    }

    /// Stage the factory entries into the draft, entering an edit if needed.
    pub fn reset_to_defaults(&mut self) -> Result<(), SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::SavePending);
        }
        if self.state == EditState::Viewing {
            self.start_edit()?;
        }
        self.cache.stage_all(&default_entries());
        Ok(())
    }

    /// Gate and reserve a save. The caller writes `ticket.tree` and reports back.
    pub fn begin_save(&mut self) -> Result<SaveTicket, SessionError> {
        self.require_mutable()?;

        let warnings = validate_store(self.cache.draft());
        let blocking: Vec<String> = warnings
            .iter()
            .filter(|w| w.blocks_strict_save())
            .map(|w| w.key.clone())
            .collect();
        if self.policy == SavePolicy::Strict && !blocking.is_empty() {
            return Err(SessionError::InvalidEntries(blocking));
        }

        let id = self.next_ticket;
        self.next_ticket += 1;
        self.pending = Some(PendingSave {
            id,
            warnings: blocking,
        });
        tracing::debug!(ticket = id, entries = self.cache.draft().len(), "save started");
        Ok(SaveTicket {
            id,
            tree: denormalize(self.cache.draft()),
        })
    }

    /// Resolve the save reserved by `begin_save`.
    pub fn finish_save(
        &mut self,
        ticket: u64,
        result: Result<u64, String>,
    ) -> Result<(), SessionError> {
        let pending = match self.pending.take() {
            Some(p) if p.id == ticket => p,
            other => {
                self.pending = other;
                return Err(SessionError::UnknownTicket(ticket));
            }
        };

        match result {
            Ok(revision) => {
                self.cache.commit_draft();
                self.state = EditState::Viewing;
                tracing::debug!(ticket, revision, "save confirmed");
                if pending.warnings.is_empty() {
                    self.notify(Notice::Saved { revision });
                } else {
                    self.notify(Notice::SavedWithWarnings {
                        revision,
                        keys: pending.warnings,
                    });
                }
            }
            Err(err) => {
                tracing::warn!(ticket, error = %err, "save rejected");
                self.notify(Notice::WriteFailed(err));
            }
        }
        Ok(())
    }

    /// Run a whole save round trip against `store` on the calling thread.
    pub fn save_with(&mut self, store: &dyn TreeStore) -> Result<(), SessionError> {
        let ticket = self.begin_save()?;
        let result = store.write(&ticket.tree).map_err(|err| format!("{:#}", err));
        self.finish_save(ticket.id, result)
    }

    pub fn handle_event(&mut self, event: RemoteEvent) {
        match event {
            RemoteEvent::Snapshot(snapshot) => self.apply_snapshot(snapshot),
            RemoteEvent::ReadFailed(err) => {
                tracing::warn!(error = %err, "remote read failed; keeping last good entries");
                self.notify(Notice::ReadFailed(err));
            }
            RemoteEvent::SaveFinished { ticket, result } => {
                if let Err(err) = self.finish_save(ticket, result) {
                    tracing::warn!(error = %err, "ignoring save completion");
                }
            }
        }
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        if let Some(last) = self.last_revision
            && snapshot.revision < last
        {
            tracing::debug!(
                revision = snapshot.revision,
                last,
                "snapshot older than last seen; applying as latest"
            );
        }

        let incoming = normalize(&snapshot.value);
        let editing = self.state == EditState::Editing;
        // The echo of our own pending write is not someone else's change.
        let own_echo = self.pending.is_some() && &incoming == self.cache.draft();
        if editing && !own_echo && &incoming != self.cache.committed() {
            self.notify(Notice::RemoteChanged);
        }
        if snapshot.value.is_null() {
            self.notify(Notice::RemoteEmpty);
        }

        tracing::debug!(
            revision = snapshot.revision,
            entries = incoming.len(),
            mirror = !editing,
            "applying remote snapshot"
        );
        self.cache.apply_remote(incoming, !editing);
        self.last_revision = Some(snapshot.revision);
    }

    fn require_mutable(&self) -> Result<(), SessionError> {
        if self.state != EditState::Editing {
            return Err(SessionError::NotEditing);
        }
        if self.pending.is_some() {
            return Err(SessionError::SavePending);
        }
        Ok(())
    }

    fn notify(&self, notice: Notice) {
        // The receiver going away just means nobody is listening anymore.
        let _ = self.notices.send(notice);
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
