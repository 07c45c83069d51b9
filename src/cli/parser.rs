//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::config::{DEFAULT_SESSION_ID, RagConfig};
use crate::core::Speaker;
use crate::error::Result;
use crate::prompt::Mode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ragchat: grounded question answering over a reference document.
///
/// Chunks a document, ranks excerpts against questions, composes model
/// prompts and keeps per-session conversation history.
#[derive(Parser, Debug)]
#[command(name = "ragchat")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the session database file.
    ///
    /// Defaults to `.ragchat/sessions.db` in the current directory.
    #[arg(short, long, env = "RAGCHAT_DB_PATH", global = true)]
    pub db_path: Option<PathBuf>,

    /// Reference document (plain text or markdown).
    #[arg(long, env = "RAGCHAT_DOCUMENT", global = true)]
    pub document: Option<PathBuf>,

    /// Maximum chunk length in characters.
    #[arg(long, env = "RAGCHAT_CHUNK_SIZE", default_value = "800", global = true)]
    pub chunk_size: usize,

    /// Number of excerpts retrieved per question.
    #[arg(long, env = "RAGCHAT_TOP_K", default_value = "3", global = true)]
    pub top_k: usize,

    /// Session used by commands that name none.
    #[arg(long, env = "RAGCHAT_SESSION", default_value = DEFAULT_SESSION_ID, global = true)]
    pub default_session: String,

    /// Enable verbose (debug) logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the session database.
    ///
    /// Creates the database file and schema if they don't exist.
    Init {
        /// Force re-initialization (destroys existing sessions).
        #[arg(short, long)]
        force: bool,
    },

    /// Show session store status.
    Status,

    /// Delete all stored sessions.
    Reset {
        /// Skip confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List the chunks of the reference document.
    Chunks {
        /// Show a preview of each chunk.
        #[arg(short, long)]
        preview: bool,

        /// Preview length in characters.
        #[arg(long, default_value = "80")]
        preview_len: usize,
    },

    /// Rank document chunks against a query.
    Search {
        /// Search query.
        query: String,
    },

    /// Build the model prompt for a message.
    Compose {
        /// The user's message.
        message: String,

        /// Session id (defaults to `--default-session`).
        #[arg(short, long)]
        session: Option<String>,

        /// Answering mode (grounded, open).
        #[arg(short, long, default_value = "grounded")]
        mode: Mode,
    },

    /// Append a turn to a session.
    Record {
        /// Speaker (user, assistant).
        role: Speaker,

        /// Turn text.
        content: String,

        /// Session id (defaults to `--default-session`).
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Show a session's transcript.
    History {
        /// Session id (defaults to `--default-session`).
        session: Option<String>,
    },

    /// Remove every turn from a session.
    Clear {
        /// Session id (defaults to `--default-session`).
        session: Option<String>,
    },

    /// List stored sessions.
    #[command(alias = "ls")]
    Sessions,
}

impl Cli {
    /// Returns the database path, using default if not specified.
    #[must_use]
    pub fn get_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::storage::DEFAULT_DB_PATH))
    }

    /// Builds and validates the pipeline configuration from flags.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for out-of-range values.
    pub fn rag_config(&self) -> Result<RagConfig> {
        let config = RagConfig::default()
            .with_chunk_size(self.chunk_size)
            .with_top_k(self.top_k)
            .with_default_session(self.default_session.as_str());
        config.validate()?;
        Ok(config)
    }
}
