//! Prompt composition.
//!
//! Turns a user message into the exact message sequence handed to the
//! model: one system instruction, the session's prior turns, then the new
//! user message. Composition only reads memory; recording the exchange is
//! the caller's job once a reply exists.

pub mod templates;

pub use templates::{
    EXCERPTS_END, OPEN_SYSTEM_PROMPT, REFUSAL_PHRASE, excerpts_start, grounded_instruction,
    refusal_instruction,
};

use crate::config::RagConfig;
use crate::core::ChatMessage;
use crate::document::DocumentStore;
use crate::memory::SessionMemory;
use crate::search::retrieve;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// How a request is answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Answer only from retrieved excerpts of the reference document.
    #[default]
    Grounded,
    /// Open-ended dialogue without retrieval.
    Open,
}

impl Mode {
    /// Maps a "use retrieval" flag to a mode.
    #[must_use]
    pub const fn from_use_rag(use_rag: bool) -> Self {
        if use_rag { Self::Grounded } else { Self::Open }
    }

    /// Whether this mode retrieves excerpts.
    #[must_use]
    pub const fn uses_retrieval(self) -> bool {
        matches!(self, Self::Grounded)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grounded => f.write_str("grounded"),
            Self::Open => f.write_str("open"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grounded" | "rag" => Ok(Self::Grounded),
            "open" => Ok(Self::Open),
            other => Err(format!("unknown mode: {other} (expected grounded or open)")),
        }
    }
}

/// Result of composing one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedPrompt {
    /// Messages to send to the model, in order.
    pub messages: Vec<ChatMessage>,
    /// Excerpts embedded in the instruction (empty in open mode).
    pub sources: Vec<String>,
}

/// Assembles prompts from the document store and session memory.
///
/// # Examples
///
/// ```
/// use ragchat::config::RagConfig;
/// use ragchat::document::DocumentStore;
/// use ragchat::memory::SessionMemory;
/// use ragchat::prompt::{Mode, PromptComposer};
///
/// let config = RagConfig::default();
/// let documents = DocumentStore::from_text("handbook", "Remote work requires approval.", 800).unwrap();
/// let memory = SessionMemory::new();
/// let composer = PromptComposer::new(&documents, &memory, &config);
///
/// let prompt = composer.compose(Mode::Grounded, "s1", "Is remote work allowed?");
/// assert_eq!(prompt.sources, ["Remote work requires approval."]);
/// assert_eq!(prompt.messages.len(), 2);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PromptComposer<'a> {
    documents: &'a DocumentStore,
    memory: &'a SessionMemory,
    config: &'a RagConfig,
}

impl<'a> PromptComposer<'a> {
    /// Creates a composer over the given store, memory and configuration.
    #[must_use]
    pub const fn new(
        documents: &'a DocumentStore,
        memory: &'a SessionMemory,
        config: &'a RagConfig,
    ) -> Self {
        Self {
            documents,
            memory,
            config,
        }
    }

    /// Composes the message sequence for `user_message` in `session_id`.
    ///
    /// Grounded mode loads the document (once per store) and retrieves the
    /// top excerpts; an unavailable document behaves like a query with no
    /// matches. Session history is included in full.
    #[must_use]
    pub fn compose(&self, mode: Mode, session_id: &str, user_message: &str) -> ComposedPrompt {
        let (instruction, sources) = match mode {
            Mode::Grounded => {
                let sources = retrieve(self.documents.chunks(), user_message, self.config.top_k);
                let instruction = if sources.is_empty() {
                    refusal_instruction(&self.config.persona)
                } else {
                    grounded_instruction(&self.config.persona, &sources)
                };
                (instruction, sources)
            }
            Mode::Open => (OPEN_SYSTEM_PROMPT.to_string(), Vec::new()),
        };

        let history = self.memory.history(session_id);
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(instruction));
        messages.extend(history.iter().map(ChatMessage::from));
        messages.push(ChatMessage::user(user_message));

        debug!(
            session_id,
            %mode,
            sources = sources.len(),
            history = history.len(),
            "composed prompt"
        );

        ComposedPrompt { messages, sources }
    }
}
