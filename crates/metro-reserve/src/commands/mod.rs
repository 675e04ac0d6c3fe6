//! CLI command implementations

pub mod book;
pub mod completions;
pub mod config;
pub mod version;
