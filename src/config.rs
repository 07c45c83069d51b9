//! Runtime configuration.
//!
//! [`RagConfig`] gathers the knobs of the retrieval pipeline. The CLI fills
//! it from flags and `RAGCHAT_*` environment variables; library users build
//! it directly or deserialize it.

use crate::chunking::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
use crate::error::{Error, Result};
use crate::search::DEFAULT_TOP_K;
use serde::{Deserialize, Serialize};

/// Session id used when a request does not name one.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Wording the prompt composer uses to describe the assistant and its
/// reference document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    /// Organization the assistant works for.
    pub organization: String,
    /// Upper-case label used in the excerpt delimiters.
    pub excerpt_label: String,
    /// Lower-case noun for the document in the refusal phrase.
    pub document_name: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            organization: "Contoso Electronics".to_string(),
            excerpt_label: "EMPLOYEE HANDBOOK".to_string(),
            document_name: "employee handbook".to_string(),
        }
    }
}

impl Persona {
    /// Creates a persona for `organization` and a document called `document_name`.
    ///
    /// The excerpt label is the upper-cased document name.
    #[must_use]
    pub fn new(organization: impl Into<String>, document_name: impl Into<String>) -> Self {
        let document_name = document_name.into();
        Self {
            organization: organization.into(),
            excerpt_label: document_name.to_uppercase(),
            document_name,
        }
    }
}

/// Retrieval pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Number of excerpts retrieved per query.
    pub top_k: usize,
    /// Session id used when none is supplied.
    pub default_session: String,
    /// Assistant persona.
    pub persona: Persona,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            top_k: DEFAULT_TOP_K,
            default_session: DEFAULT_SESSION_ID.to_string(),
            persona: Persona::default(),
        }
    }
}

impl RagConfig {
    /// Creates a config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the chunk size.
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the number of retrieved excerpts.
    #[must_use]
    pub const fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Sets the default session id.
    #[must_use]
    pub fn with_default_session(mut self, id: impl Into<String>) -> Self {
        self.default_session = id.into();
        self
    }

    /// Sets the persona.
    #[must_use]
    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.persona = persona;
        self
    }

    /// Parses a JSON config; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the result is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| Error::Config {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(Error::Config {
                message: format!("chunk_size must be in 1..={MAX_CHUNK_SIZE}"),
            });
        }
        if self.top_k == 0 {
            return Err(Error::Config {
                message: "top_k must be > 0".to_string(),
            });
        }
        if self.default_session.trim().is_empty() {
            return Err(Error::Config {
                message: "default_session must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
