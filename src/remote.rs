use std::time::Duration;

use anyhow::{Context, Result};

use crate::model::RemoteConfig;

mod http_client;
use self::http_client::with_retries;

mod memory;
mod subscription;
mod tree;
mod types;

pub use self::memory::MemoryStore;
pub use self::subscription::Subscription;
pub use self::types::*;

/// Handle on one tree path in the remote store.
///
/// Implementations replace the whole tree on `write`; there is no partial update.
pub trait TreeStore {
    /// Current tree. A path that was never written reads as `null` at revision 0.
    fn read(&self) -> Result<Snapshot>;

    /// Replace the tree and return the revision it was stored under.
    fn write(&self, tree: &serde_json::Value) -> Result<u64>;

    /// Block until the tree has a revision newer than `after`, or `timeout` passes.
    fn wait_for_change(&self, after: u64, timeout: Duration) -> Result<Option<Snapshot>>;
}

pub struct RemoteClient {
    remote: RemoteConfig,
    client: reqwest::blocking::Client,
}

impl RemoteClient {
    pub fn new(remote: RemoteConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("linkdeck")
            .build()
            .context("build reqwest client")?;
        Ok(Self { remote, client })
    }

    pub fn remote(&self) -> &RemoteConfig {
        &self.remote
    }
}
