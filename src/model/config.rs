use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::entry::CanonicalStore;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    pub version: u32,

    #[serde(default)]
    pub remote: Option<RemoteConfig>,

    #[serde(default)]
    pub save_policy: SavePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: 1,
            remote: None,
            save_policy: SavePolicy::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,

    /// Tree path holding the entries (a single path segment).
    #[serde(default = "default_tree_path")]
    pub tree_path: String,
}

impl RemoteConfig {
    /// Key used to scope persisted client state to one remote tree.
    pub fn state_key(&self) -> String {
        format!("{}#{}", self.base_url.trim_end_matches('/'), self.tree_path)
    }
}

pub(crate) fn default_tree_path() -> String {
    "urls".to_string()
}

/// What a save does when some entry has a non-empty url that does not parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavePolicy {
    /// Save anyway and report the offending keys.
    #[default]
    Permissive,
    /// Refuse to write until every non-empty url parses.
    Strict,
}

impl std::str::FromStr for SavePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "permissive" => Ok(SavePolicy::Permissive),
            "strict" => Ok(SavePolicy::Strict),
            other => anyhow::bail!("unknown save policy {:?} (use permissive|strict)", other),
        }
    }
}

impl std::fmt::Display for SavePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SavePolicy::Permissive => f.write_str("permissive"),
            SavePolicy::Strict => f.write_str("strict"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientState {
    pub version: u32,

    /// Last-known-active recall, keyed by `RemoteConfig::state_key`.
    #[serde(default)]
    pub last_known_active: HashMap<String, CanonicalStore>,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            version: 1,
            last_known_active: HashMap::new(),
        }
    }
}
