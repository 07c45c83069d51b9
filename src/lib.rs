//! # ragchat
//!
//! Retrieval-augmented chat core for answering questions from a single
//! reference document.
//!
//! The pipeline loads a document once, splits it into word-aligned chunks,
//! ranks chunks against each question by term frequency, and composes the
//! message sequence for an external chat model. Per-session conversation
//! history is kept in memory and can be persisted to `SQLite`.
//!
//! ## Features
//!
//! - **Lazy document store**: the source is read and chunked exactly once
//! - **Lexical ranking**: literal, case-insensitive term counting
//! - **Session memory**: isolated, append-only transcripts per session id
//! - **Prompt composition**: grounded and open answering modes
//! - **`SQLite` sessions**: transcripts that outlive the process

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
// Note: unsafe is needed for memory-mapped I/O (memmap2)
#![warn(unsafe_code)]

pub mod chat;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod core;
pub mod document;
pub mod error;
pub mod io;
pub mod memory;
pub mod prompt;
pub mod search;
pub mod storage;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use core::{ChatMessage, Chunk, Role, Session, Speaker, Turn};

// Re-export pipeline components
pub use chat::{ChatModel, ChatRequest, ChatResponse, ChatService, FALLBACK_REPLY};
pub use chunking::{Chunker, DEFAULT_CHUNK_SIZE, WordChunker};
pub use config::{DEFAULT_SESSION_ID, Persona, RagConfig};
pub use document::{Document, DocumentSource, DocumentStore, FileSource, LoadState, TextSource};
pub use memory::{SessionHandle, SessionMemory};
pub use prompt::{ComposedPrompt, Mode, PromptComposer};
pub use search::{DEFAULT_TOP_K, QueryTerms, ScoredChunk, rank, retrieve};

// Re-export storage types
pub use storage::{DEFAULT_DB_PATH, SqliteStorage, Storage};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
