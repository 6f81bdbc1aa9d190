use clap::Subcommand;

use crate::{PolicyCommands, RemoteCommands};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Initialize a local store (.linkdeck)
    Init {
        /// Re-initialize if the store already exists
        #[arg(long)]
        force: bool,
    },

    /// Configure or show the remote
    Remote {
        #[command(subcommand)]
        command: RemoteCommands,
    },

    /// Show or change what happens when saving invalid urls
    Policy {
        #[command(subcommand)]
        command: PolicyCommands,
    },

    /// List entries
    List {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Change one entry (creating it if new) and save
    Set {
        key: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        path: Option<String>,
    },

    /// Enable or disable an entry and save; disabling keeps the url for later
    Toggle { key: String },

    /// Restore the factory entries and save
    Reset,

    /// Report entries whose url is missing or invalid
    Check {
        /// Fail when any non-empty url is invalid
        #[arg(long)]
        strict: bool,
    },

    /// Print entries every time the remote changes
    Watch {
        /// Stop after this many snapshots
        #[arg(long)]
        count: Option<usize>,
        /// Emit one JSON object per snapshot
        #[arg(long)]
        json: bool,
    },
}
