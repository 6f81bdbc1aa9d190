//! In-process tree store. Used by tests and as a stand-in for other writers.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use super::*;

#[derive(Debug, Default)]
struct MemoryTree {
    revision: u64,
    value: serde_json::Value,
    fail_reads: Option<String>,
    fail_writes: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryTree>,
    changed: Condvar,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `value` at revision 1.
    pub fn with_value(value: serde_json::Value) -> Self {
        let store = Self::new();
        store.push(value);
        store
    }

    /// Replace the tree as another writer would. Bypasses injected write failures.
    pub fn push(&self, value: serde_json::Value) -> u64 {
        let mut tree = self.lock();
        tree.revision += 1;
        tree.value = value;
        self.changed.notify_all();
        tree.revision
    }

    pub fn value(&self) -> serde_json::Value {
        self.lock().value.clone()
    }

    pub fn revision(&self) -> u64 {
        self.lock().revision
    }

    /// Make every following `write` fail with `reason` until cleared with `None`.
    pub fn fail_writes(&self, reason: Option<&str>) {
        self.lock().fail_writes = reason.map(str::to_string);
    }

    /// Make every following `read` and `wait_for_change` fail until cleared.
    pub fn fail_reads(&self, reason: Option<&str>) {
        self.lock().fail_reads = reason.map(str::to_string);
    }

    fn lock(&self) -> MutexGuard<'_, MemoryTree> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn snapshot_of(tree: &MemoryTree) -> Snapshot {
    Snapshot {
        revision: tree.revision,
        value: tree.value.clone(),
        updated_at: None,
    }
}

impl TreeStore for MemoryStore {
    fn read(&self) -> Result<Snapshot> {
        let tree = self.lock();
        if let Some(reason) = &tree.fail_reads {
            anyhow::bail!("read tree: {}", reason);
        }
        Ok(snapshot_of(&tree))
    }

    fn write(&self, value: &serde_json::Value) -> Result<u64> {
        let failure = self.lock().fail_writes.clone();
        if let Some(reason) = failure {
            anyhow::bail!("write tree: {}", reason);
        }
        Ok(self.push(value.clone()))
    }

    fn wait_for_change(&self, after: u64, timeout: Duration) -> Result<Option<Snapshot>> {
        let deadline = Instant::now() + timeout;
        let mut tree = self.lock();
        loop {
            if let Some(reason) = &tree.fail_reads {
                anyhow::bail!("watch tree: {}", reason);
            }
            if tree.revision > after {
                return Ok(Some(snapshot_of(&tree)));
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            tree = self
                .changed
                .wait_timeout(tree, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}
