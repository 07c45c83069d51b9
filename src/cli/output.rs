//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::core::{Chunk, Turn};
use crate::error::Error;
use crate::io::truncate_graphemes;
use crate::prompt::ComposedPrompt;
use crate::search::ScoredChunk;
use crate::storage::{SessionSummary, StorageStats};
use serde::Serialize;
use std::fmt::Write;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats a status response.
#[must_use]
pub fn format_status(stats: &StorageStats, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_status_text(stats),
        OutputFormat::Json => format_json(stats),
    }
}

fn format_status_text(stats: &StorageStats) -> String {
    let mut output = String::new();
    output.push_str("ragchat Status\n");
    output.push_str("==============\n\n");
    let _ = writeln!(output, "  Sessions:      {}", stats.session_count);
    let _ = writeln!(output, "  Turns:         {}", stats.turn_count);
    let _ = writeln!(
        output,
        "  Content size:  {}",
        format_size(stats.total_content_size)
    );
    let _ = writeln!(output, "  Schema:        v{}", stats.schema_version);
    if let Some(size) = stats.db_size {
        let _ = writeln!(output, "  DB size:       {size} bytes");
    }
    output
}

/// Formats the chunk listing of a document.
#[must_use]
pub fn format_chunks(
    source: &str,
    chunks: &[Chunk],
    preview_len: Option<usize>,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => format_chunks_text(source, chunks, preview_len),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ChunkListing<'a> {
                source: &'a str,
                chunk_count: usize,
                chunks: &'a [Chunk],
            }
            format_json(&ChunkListing {
                source,
                chunk_count: chunks.len(),
                chunks,
            })
        }
    }
}

fn format_chunks_text(source: &str, chunks: &[Chunk], preview_len: Option<usize>) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Document: {source}");
    let _ = writeln!(output, "Chunks:   {}\n", chunks.len());
    if chunks.is_empty() {
        return output;
    }

    let _ = writeln!(output, "{:<6} {:<8} {:<8}", "#", "Chars", "~Tokens");
    output.push_str(&"-".repeat(24));
    output.push('\n');
    for chunk in chunks {
        let _ = write!(
            output,
            "{:<6} {:<8} {:<8}",
            chunk.ordinal,
            chunk.char_len(),
            chunk.estimate_tokens()
        );
        if let Some(len) = preview_len {
            let _ = write!(output, " {}", truncate(&chunk.text, len));
        }
        output.push('\n');
    }
    output
}

/// Formats ranked search results.
#[must_use]
pub fn format_search_results(
    query: &str,
    results: &[ScoredChunk<'_>],
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => format_search_text(query, results),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Hit<'a> {
                ordinal: usize,
                score: usize,
                text: &'a str,
            }
            #[derive(Serialize)]
            struct SearchOutput<'a> {
                query: &'a str,
                count: usize,
                results: Vec<Hit<'a>>,
            }
            format_json(&SearchOutput {
                query,
                count: results.len(),
                results: results
                    .iter()
                    .map(|r| Hit {
                        ordinal: r.chunk.ordinal,
                        score: r.score,
                        text: &r.chunk.text,
                    })
                    .collect(),
            })
        }
    }
}

fn format_search_text(query: &str, results: &[ScoredChunk<'_>]) -> String {
    if results.is_empty() {
        return format!("No chunks match '{query}'.\n");
    }

    let mut output = String::new();
    let _ = writeln!(output, "Results for '{query}':\n");
    for result in results {
        let _ = writeln!(
            output,
            "[chunk {}] score {}\n  {}\n",
            result.chunk.ordinal,
            result.score,
            truncate(&result.chunk.text, 160)
        );
    }
    output
}

/// Formats a composed prompt.
#[must_use]
pub fn format_prompt(prompt: &ComposedPrompt, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            for message in &prompt.messages {
                let _ = writeln!(output, "[{:?}]", message.role);
                let _ = writeln!(output, "{}\n", message.content);
            }
            let _ = writeln!(output, "Sources: {}", prompt.sources.len());
            output
        }
        OutputFormat::Json => format_json(prompt),
    }
}

/// Formats a session transcript.
#[must_use]
pub fn format_history(session_id: &str, turns: &[Turn], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            if turns.is_empty() {
                return format!("Session '{session_id}' has no turns.\n");
            }
            let mut output = String::new();
            let _ = writeln!(output, "Session '{session_id}' ({} turns):\n", turns.len());
            for turn in turns {
                let _ = writeln!(output, "{:>9}: {}", turn.role, turn.content);
            }
            output
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct History<'a> {
                session_id: &'a str,
                turns: &'a [Turn],
            }
            format_json(&History { session_id, turns })
        }
    }
}

/// Formats the session list.
#[must_use]
pub fn format_session_list(sessions: &[SessionSummary], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            if sessions.is_empty() {
                return "No sessions found.\n".to_string();
            }
            let mut output = String::new();
            output.push_str("Sessions:\n");
            let _ = writeln!(output, "{:<32} {:<8}", "ID", "Turns");
            output.push_str(&"-".repeat(41));
            output.push('\n');
            for session in sessions {
                let _ = writeln!(
                    output,
                    "{:<32} {:<8}",
                    truncate(&session.id, 32),
                    session.turn_count
                );
            }
            output
        }
        OutputFormat::Json => format_json(&sessions),
    }
}

/// Formats an error for the chosen output format.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ErrorOutput {
                success: bool,
                error: String,
            }
            format_json(&ErrorOutput {
                success: false,
                error: error.to_string(),
            })
        }
    }
}

/// Formats a value as JSON.
pub(crate) fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a byte size as human-readable.
#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Truncates to `max_len` user-perceived characters with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    truncate_graphemes(s, max_len)
}
