use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

pub enum LogTarget {
    Stderr,
    /// Append to a file. Used by the TUI, which owns the terminal.
    File(PathBuf),
}

/// Install the global subscriber. `RUST_LOG` wins over `verbose` when set.
pub fn init(verbose: bool, target: LogTarget) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("linkdeck=debug,linkdeck_server=debug,info")
        } else {
            EnvFilter::new("warn")
        }
    });

    let res = match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create log dir {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
    };
    res.map_err(|err| anyhow::anyhow!("install tracing subscriber: {}", err))
}
