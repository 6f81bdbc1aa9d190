use crate::remote::Snapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditState {
    Viewing,
    Editing,
}

/// Misuse of the edit-session state machine. Nothing here is fatal; the session is left
/// exactly as it was before the rejected call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("not editing (start an edit first)")]
    NotEditing,

    #[error("already editing")]
    AlreadyEditing,

    #[error("a save is still in flight")]
    SavePending,

    #[error("no save in flight for ticket {0}")]
    UnknownTicket(u64),

    #[error("unknown entry {0:?}")]
    UnknownKey(String),

    #[error("entry {0:?} already exists")]
    DuplicateKey(String),

    #[error("entry key must not be empty")]
    EmptyKey,

    #[error("strict save policy: invalid url for {}", .0.join(", "))]
    InvalidEntries(Vec<String>),
}

/// Everything that reaches the controller from outside the operator's own keystrokes.
#[derive(Clone, Debug)]
pub enum RemoteEvent {
    /// Latest tree under the watched path.
    Snapshot(Snapshot),
    /// The subscription could not read the tree.
    ReadFailed(String),
    /// A write started by `begin_save` resolved. `Ok` carries the new remote revision.
    SaveFinished {
        ticket: u64,
        result: Result<u64, String>,
    },
}

/// Operator-facing messages. Delivery is fire-and-forget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    ReadFailed(String),
    /// The remote has no tree at the watched path yet.
    RemoteEmpty,
    /// Someone else changed the tree while the draft was being edited.
    RemoteChanged,
    Saved { revision: u64 },
    SavedWithWarnings { revision: u64, keys: Vec<String> },
    WriteFailed(String),
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::ReadFailed(err) => write!(f, "could not load entries: {}", err),
            Notice::RemoteEmpty => f.write_str("remote has no entries (reset to load defaults)"),
            Notice::RemoteChanged => {
                f.write_str("remote entries changed while editing; saving will overwrite them")
            }
            Notice::Saved { revision } => write!(f, "saved (revision {})", revision),
            Notice::SavedWithWarnings { revision, keys } => write!(
                f,
                "saved (revision {}) with invalid urls: {}",
                revision,
                keys.join(", ")
            ),
            Notice::WriteFailed(err) => write!(f, "save failed: {}", err),
        }
    }
}

/// A write the caller must perform and then report back through `finish_save`.
#[derive(Clone, Debug)]
pub struct SaveTicket {
    pub id: u64,
    pub tree: serde_json::Value,
}
