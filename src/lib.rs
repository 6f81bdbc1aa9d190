pub mod cache;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod remote;
pub mod session;
pub mod store;
pub mod tui;
pub mod validate;

mod tui_shell;
