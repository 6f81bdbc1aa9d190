mod config;
mod defaults;
mod entry;

pub use self::config::{ClientConfig, ClientState, RemoteConfig, SavePolicy};
pub use self::defaults::{DEFAULT_PATH, default_entries, fallback_path_for};
pub use self::entry::{CanonicalStore, Entry, RemoteEntry};
