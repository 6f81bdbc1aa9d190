//! Payloads exchanged with the tree store.

/// The tree under one path at one revision.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub revision: u64,

    #[serde(default)]
    pub value: serde_json::Value,

    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct WriteResponse {
    pub revision: u64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
