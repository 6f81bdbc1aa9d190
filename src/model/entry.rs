use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Normalized mapping of entry key to entry. Ordering is by key and carries no meaning.
pub type CanonicalStore = BTreeMap<String, Entry>;

/// A named downloadable resource: where to fetch it and where the client stores it.
///
/// An empty (after trimming) `url` means the entry is disabled.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub url: String,
    pub path: String,
}

impl Entry {
    pub fn new(url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// The two shapes an entry has had on the wire.
///
/// Older writers stored a bare url string; current writers store `{url, path}`. Either
/// field of the structured form may be missing or null in hand-edited trees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteEntry {
    Legacy(String),
    Structured {
        url: Option<String>,
        path: Option<String>,
    },
}
