//! CLI layer for ragchat.
//!
//! Provides the command-line interface using clap, with commands for
//! inspecting the reference document, composing prompts and managing
//! persisted sessions.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
