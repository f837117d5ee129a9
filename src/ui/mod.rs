//! Terminal presentation of the dashboard.
//!
//! - `loop_runner` - event loop and terminal setup/teardown
//! - `input` - key handling
//! - `render` - layout and the size guard
//! - `sidebar`, `articles`, `status` - the three panes

mod articles;
mod input;
mod loop_runner;
mod render;
mod sidebar;
mod status;

pub use loop_runner::{run, Action};
