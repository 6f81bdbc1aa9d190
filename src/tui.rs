use std::path::PathBuf;

use anyhow::Result;

#[derive(Clone, Debug)]
pub struct TuiRunOptions {
    /// Local store holding the remote config and the remembered urls.
    pub home: PathBuf,
}

pub fn run_with_options(opts: TuiRunOptions) -> Result<()> {
    crate::tui_shell::run_with_options(opts)
}
