use super::*;

/// One stored subtree. `revision` is the global revision of its last write.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub(super) struct Node {
    pub(super) revision: u64,
    pub(super) value: serde_json::Value,
    pub(super) updated_at: String,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub(super) struct Tree {
    /// Bumped on every write, whatever the path.
    pub(super) revision: u64,
    pub(super) nodes: BTreeMap<String, Node>,
}

impl Tree {
    pub(super) fn snapshot(&self, path: &str) -> NodeResponse {
        match self.nodes.get(path) {
            Some(node) => NodeResponse {
                revision: node.revision,
                value: node.value.clone(),
                updated_at: Some(node.updated_at.clone()),
            },
            None => NodeResponse {
                revision: 0,
                value: serde_json::Value::Null,
                updated_at: None,
            },
        }
    }

    pub(super) fn put(&mut self, path: &str, value: serde_json::Value, now: String) -> u64 {
        self.revision += 1;
        self.nodes.insert(
            path.to_string(),
            Node {
                revision: self.revision,
                value,
                updated_at: now,
            },
        );
        self.revision
    }
}

pub(super) struct AppState {
    pub(super) data_dir: PathBuf,
    pub(super) tree: RwLock<Tree>,
    /// Carries the latest global revision; watchers wake on every write.
    pub(super) changes: watch::Sender<u64>,
}

#[derive(Debug, serde::Serialize)]
pub(super) struct NodeResponse {
    pub(super) revision: u64,
    pub(super) value: serde_json::Value,
    pub(super) updated_at: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub(super) struct WriteResponse {
    pub(super) revision: u64,
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct WatchQuery {
    #[serde(default)]
    pub(super) after: u64,
    #[serde(default = "default_watch_timeout_ms")]
    pub(super) timeout_ms: u64,
}

fn default_watch_timeout_ms() -> u64 {
    20_000
}

pub(super) fn now_ts() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "<time>".to_string())
}
