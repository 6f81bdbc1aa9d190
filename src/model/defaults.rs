use super::entry::{CanonicalStore, Entry};

/// Device path used for keys that have no entry in the default table.
pub const DEFAULT_PATH: &str = "/sdcard/Download";

const RELEASE_BASE: &str = "https://github.com/iFor-Lux/luxury-files/releases/download/v2.0";

// (key, file name) pairs shipped with the client application.
const FACTORY: &[(&str, &str)] = &[
    ("Aimbot", "Aimbot.txt"),
    ("Aimfov", "Aimfov.txt"),
    ("Holograma", "Holograma.txt"),
    ("WallHack", "WallHack.txt"),
];

/// Device path for `key` when the remote tree does not carry one.
pub fn fallback_path_for(key: &str) -> String {
    match FACTORY.iter().find(|(k, _)| *k == key) {
        Some((_, file)) => format!("{}/{}", DEFAULT_PATH, file),
        None => DEFAULT_PATH.to_string(),
    }
}

/// The entry set a fresh deployment starts from, restored by `reset`.
pub fn default_entries() -> CanonicalStore {
    FACTORY
        .iter()
        .map(|(key, file)| {
            (
                key.to_string(),
                Entry::new(
                    format!("{}/{}", RELEASE_BASE, file),
                    fallback_path_for(key),
                ),
            )
        })
        .collect()
}
