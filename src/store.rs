use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::model::{CanonicalStore, ClientConfig, ClientState, RemoteConfig};

pub const STORE_DIR: &str = ".linkdeck";

/// Client-side files: `config.json` (remote + policy) and `state.json` (recall).
#[derive(Clone, Debug)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Default store location relative to `dir`.
    pub fn default_root(dir: &Path) -> PathBuf {
        dir.join(STORE_DIR)
    }

    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(anyhow!(
                "No linkdeck store found at {} (run `linkdeck init`)",
                root.display()
            ));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn init(root: &Path, force: bool) -> Result<Self> {
        if root.exists() && !force {
            return Err(anyhow!(
                "{} already exists (use --force to re-init)",
                root.display()
            ));
        }
        fs::create_dir_all(root).with_context(|| format!("create {}", root.display()))?;

        let store = Self {
            root: root.to_path_buf(),
        };
        store.write_config(&ClientConfig::default())?;
        store.write_state(&ClientState::default())?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join("linkdeck.log")
    }

    pub fn read_config(&self) -> Result<ClientConfig> {
        let bytes = fs::read(self.root.join("config.json")).context("read config.json")?;
        let cfg: ClientConfig = serde_json::from_slice(&bytes).context("parse config.json")?;
        if cfg.version != 1 {
            anyhow::bail!("unsupported config version {}", cfg.version);
        }
        Ok(cfg)
    }

    pub fn write_config(&self, cfg: &ClientConfig) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(cfg).context("serialize config")?;
        write_atomic(&self.root.join("config.json"), &bytes).context("write config.json")?;
        Ok(())
    }

    pub fn read_state(&self) -> Result<ClientState> {
        let path = self.root.join("state.json");
        if !path.exists() {
            return Ok(ClientState::default());
        }
        let bytes = fs::read(&path).context("read state.json")?;
        let st: ClientState = serde_json::from_slice(&bytes).context("parse state.json")?;
        if st.version != 1 {
            anyhow::bail!("unsupported state version {}", st.version);
        }
        Ok(st)
    }

    pub fn write_state(&self, st: &ClientState) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(st).context("serialize state")?;
        write_atomic(&self.root.join("state.json"), &bytes).context("write state.json")?;
        Ok(())
    }

    /// Last-known-active values saved for `remote`, empty when none were recorded.
    pub fn recall_for(&self, remote: &RemoteConfig) -> Result<CanonicalStore> {
        let st = self.read_state()?;
        Ok(st
            .last_known_active
            .get(&remote.state_key())
            .cloned()
            .unwrap_or_default())
    }

    pub fn save_recall(&self, remote: &RemoteConfig, recall: &CanonicalStore) -> Result<()> {
        let mut st = self.read_state()?;
        st.last_known_active.insert(remote.state_key(), recall.clone());
        self.write_state(&st)
    }

    pub fn require_remote(&self) -> Result<RemoteConfig> {
        let cfg = self.read_config()?;
        cfg.remote
            .context("no remote configured (run `linkdeck remote set --url ...`)")
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
