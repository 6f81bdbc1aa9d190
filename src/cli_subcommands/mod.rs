use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum RemoteCommands {
    /// Show the configured remote
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Set the configured remote
    Set {
        /// Base url of the tree server
        #[arg(long)]
        url: String,
        /// Tree path holding the entries
        #[arg(long, default_value = "urls")]
        path: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum PolicyCommands {
    /// Show the save policy
    Show,
    /// Set the save policy (permissive|strict)
    Set { policy: String },
}
