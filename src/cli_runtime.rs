use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use linkdeck::logging::{self, LogTarget};
use linkdeck::store::LocalStore;

use crate::Commands;

#[derive(Parser)]
#[command(name = "linkdeck")]
#[command(about = "Manage the download links served to the client app", long_about = None)]
pub(crate) struct Cli {
    /// Local store directory (defaults to $LINKDECK_HOME, then ./.linkdeck)
    #[arg(long, global = true, value_name = "DIR")]
    home: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    let home = resolve_home(cli.home)?;

    match cli.command {
        None => {
            // The TUI owns the terminal, so logs go next to the store when there is one.
            if let Ok(store) = LocalStore::open(&home) {
                logging::init(cli.verbose, LogTarget::File(store.log_path()))?;
            }
            linkdeck::tui::run_with_options(linkdeck::tui::TuiRunOptions { home })?;
        }
        Some(command) => {
            logging::init(cli.verbose, LogTarget::Stderr)?;
            crate::cli_exec::handle_command(&home, command)?
        }
    }

    Ok(())
}

fn resolve_home(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(home) = flag {
        return Ok(home);
    }
    if let Some(home) = std::env::var_os("LINKDECK_HOME") {
        return Ok(PathBuf::from(home));
    }
    let cwd = std::env::current_dir().context("get current dir")?;
    Ok(LocalStore::default_root(&cwd))
}
