//! CLI module
//!
//! Command-line interface over the Workspace list calls.
//!
//! # Commands
//!
//! - `list` - Retrieve every item of a resource, page by page
//! - `resources` - Show the listable resources and their parameters

mod commands;
mod progress;
mod runner;

pub use commands::{Cli, Commands, ListArgs};
pub use progress::ConsoleProgress;
pub use runner::Runner;
