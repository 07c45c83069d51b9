//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::cli::output::{
    OutputFormat, format_chunks, format_history, format_json, format_prompt,
    format_search_results, format_session_list, format_status,
};
use crate::cli::parser::{Cli, Commands};
use crate::config::RagConfig;
use crate::core::{Speaker, Turn};
use crate::document::DocumentStore;
use crate::error::{CommandError, Result, StorageError};
use crate::memory::SessionMemory;
use crate::prompt::{Mode, PromptComposer};
use crate::search::rank;
use crate::storage::{SqliteStorage, Storage, hydrate, persist_turn};
use serde::Serialize;
use std::path::Path;

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);
    let db_path = cli.get_db_path();
    let session_or_default = |session: &Option<String>| {
        session
            .clone()
            .unwrap_or_else(|| cli.default_session.clone())
    };

    match &cli.command {
        Commands::Init { force } => cmd_init(&db_path, *force, format),
        Commands::Status => cmd_status(&db_path, format),
        Commands::Reset { yes } => cmd_reset(&db_path, *yes, format),
        Commands::Chunks {
            preview,
            preview_len,
        } => {
            let documents = open_document(cli)?;
            cmd_chunks(&documents, preview.then_some(*preview_len), format)
        }
        Commands::Search { query } => {
            let config = cli.rag_config()?;
            let documents = open_document(cli)?;
            cmd_search(&documents, query, config.top_k, format)
        }
        Commands::Compose {
            message,
            session,
            mode,
        } => {
            let config = cli.rag_config()?;
            // Open mode never loads the document.
            let documents = match (&cli.document, mode.uses_retrieval()) {
                (None, false) => DocumentStore::from_text("none", "", config.chunk_size)?,
                _ => open_document(cli)?,
            };
            let session = session_or_default(session);
            cmd_compose(&db_path, &documents, &config, *mode, &session, message, format)
        }
        Commands::Record {
            role,
            content,
            session,
        } => cmd_record(&db_path, &session_or_default(session), *role, content, format),
        Commands::History { session } => {
            cmd_history(&db_path, &session_or_default(session), format)
        }
        Commands::Clear { session } => cmd_clear(&db_path, &session_or_default(session), format),
        Commands::Sessions => cmd_sessions(&db_path, format),
    }
}

/// Opens storage and ensures it's initialized.
fn open_storage(db_path: &Path) -> Result<SqliteStorage> {
    let storage = SqliteStorage::open(db_path)?;

    if !storage.is_initialized()? {
        return Err(StorageError::NotInitialized.into());
    }

    Ok(storage)
}

/// Builds the document store named by `--document`.
fn open_document(cli: &Cli) -> Result<DocumentStore> {
    let path = cli.document.clone().ok_or_else(|| {
        CommandError::MissingArgument("--document (or RAGCHAT_DOCUMENT)".to_string())
    })?;
    let config = cli.rag_config()?;
    DocumentStore::from_file(path, config.chunk_size)
}

// ==================== Command Implementations ====================

fn cmd_init(db_path: &Path, force: bool, _format: OutputFormat) -> Result<String> {
    if db_path.exists() && !force {
        return Err(CommandError::ExecutionFailed(
            "Database already exists. Use --force to reinitialize.".to_string(),
        )
        .into());
    }

    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            CommandError::ExecutionFailed(format!("Failed to create directory: {e}"))
        })?;
    }

    if force && db_path.exists() {
        std::fs::remove_file(db_path).map_err(|e| {
            CommandError::ExecutionFailed(format!("Failed to remove existing database: {e}"))
        })?;
    }

    let mut storage = SqliteStorage::open(db_path)?;
    storage.init()?;

    Ok(format!(
        "Initialized session database at: {}\n",
        db_path.display()
    ))
}

fn cmd_status(db_path: &Path, format: OutputFormat) -> Result<String> {
    let storage = open_storage(db_path)?;
    let stats = storage.stats()?;
    Ok(format_status(&stats, format))
}

fn cmd_reset(db_path: &Path, yes: bool, _format: OutputFormat) -> Result<String> {
    if !yes {
        return Err(CommandError::ExecutionFailed(
            "Use --yes to confirm reset. This will delete all sessions.".to_string(),
        )
        .into());
    }

    let mut storage = open_storage(db_path)?;
    storage.reset()?;

    Ok("All sessions deleted.\n".to_string())
}

fn cmd_chunks(
    documents: &DocumentStore,
    preview_len: Option<usize>,
    format: OutputFormat,
) -> Result<String> {
    documents.try_load()?;
    Ok(format_chunks(
        &documents.source_name(),
        documents.chunks(),
        preview_len,
        format,
    ))
}

fn cmd_search(
    documents: &DocumentStore,
    query: &str,
    top_k: usize,
    format: OutputFormat,
) -> Result<String> {
    if query.trim().is_empty() {
        return Err(CommandError::InvalidArgument("query must not be empty".to_string()).into());
    }
    documents.try_load()?;
    let results = rank(documents.chunks(), query, top_k);
    Ok(format_search_results(query, &results, format))
}

/// Composes against the persisted history of `session_id`.
///
/// A missing database means an empty history; an unreadable document means
/// the refusal instruction.
fn cmd_compose(
    db_path: &Path,
    documents: &DocumentStore,
    config: &RagConfig,
    mode: Mode,
    session_id: &str,
    message: &str,
    format: OutputFormat,
) -> Result<String> {
    let memory = SessionMemory::new();
    if db_path.exists() {
        let storage = open_storage(db_path)?;
        hydrate(&memory, &storage, session_id)?;
    }

    let prompt =
        PromptComposer::new(documents, &memory, config).compose(mode, session_id, message);
    Ok(format_prompt(&prompt, format))
}

fn cmd_record(
    db_path: &Path,
    session_id: &str,
    speaker: Speaker,
    content: &str,
    format: OutputFormat,
) -> Result<String> {
    let mut storage = open_storage(db_path)?;
    let memory = SessionMemory::new();
    let seq = persist_turn(&memory, &mut storage, session_id, Turn::new(speaker, content))?;

    match format {
        OutputFormat::Text => Ok(format!(
            "Recorded {speaker} turn #{seq} in session '{session_id}'\n"
        )),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Recorded<'a> {
                session_id: &'a str,
                seq: usize,
                role: Speaker,
            }
            Ok(format_json(&Recorded {
                session_id,
                seq,
                role: speaker,
            }))
        }
    }
}

fn cmd_history(db_path: &Path, session_id: &str, format: OutputFormat) -> Result<String> {
    let storage = open_storage(db_path)?;
    let memory = SessionMemory::new();
    hydrate(&memory, &storage, session_id)?;
    Ok(format_history(session_id, &memory.history(session_id), format))
}

fn cmd_clear(db_path: &Path, session_id: &str, format: OutputFormat) -> Result<String> {
    let mut storage = open_storage(db_path)?;
    let removed = storage.clear_session(session_id)?;

    match format {
        OutputFormat::Text => Ok(format!(
            "Cleared {removed} turns from session '{session_id}'\n"
        )),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Cleared<'a> {
                session_id: &'a str,
                removed: usize,
            }
            Ok(format_json(&Cleared {
                session_id,
                removed,
            }))
        }
    }
}

fn cmd_sessions(db_path: &Path, format: OutputFormat) -> Result<String> {
    let storage = open_storage(db_path)?;
    Ok(format_session_list(&storage.list_sessions()?, format))
}
