use anyhow::Result;

mod app;
mod input;

pub fn run_with_options(opts: crate::tui::TuiRunOptions) -> Result<()> {
    app::run(opts)
}
