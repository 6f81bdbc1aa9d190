use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The url was cleared; its value is kept in the recall.
    Deactivated,
    /// The recalled url was put back.
    Restored,
    /// Switched on, but the key was never active so the url is still empty.
    NothingToRestore,
}

impl EntryCache {
    /// Flip whether the draft entry for `key` is active without losing its url.
    pub fn toggle(&mut self, key: &str) -> Result<ToggleOutcome, SessionError> {
        let current = self
            .draft
            .get(key)
            .cloned()
            .ok_or_else(|| SessionError::UnknownKey(key.to_string()))?;

        if current.is_active() {
            self.remember(key, &current);
            self.draft_entry_mut(key)?.url.clear();
            return Ok(ToggleOutcome::Deactivated);
        }

        let recalled = self.last_known_active.get(key).cloned();
        let entry = self.draft_entry_mut(key)?;
        match recalled {
            Some(prev) => {
                entry.url = prev.url;
                if entry.path.is_empty() {
                    entry.path = prev.path;
                }
                Ok(ToggleOutcome::Restored)
            }
            None => {
                entry.url.clear();
                Ok(ToggleOutcome::NothingToRestore)
            }
        }
    }
}
