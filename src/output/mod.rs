//! Output module
//!
//! Renders retrieved items for the terminal or for other tools.
//!
//! # Overview
//!
//! - `json`: one pretty-printed JSON array
//! - `jsonl`: one JSON object per line, for streaming into `jq` and friends
//! - `pretty`: an aligned table of selected fields, addressed by dot paths

mod writer;

pub use writer::{select, write_items, OutputFormat};

#[cfg(test)]
mod tests;
