//! Chunk representation.
//!
//! Chunks are the retrieval units cut from the reference document. They are
//! produced once per document load and never modified afterwards.

use serde::{Deserialize, Serialize};

/// A bounded-length slice of the normalized source document.
///
/// # Examples
///
/// ```
/// use ragchat::core::Chunk;
///
/// let chunk = Chunk::new("Employees accrue vacation monthly.", 0);
/// assert_eq!(chunk.ordinal, 0);
/// assert_eq!(chunk.char_len(), 34);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text (whitespace-normalized, single spaces between tokens).
    pub text: String,

    /// Sequential position within the document (0-based).
    pub ordinal: usize,
}

impl Chunk {
    /// Creates a new chunk.
    #[must_use]
    pub fn new(text: impl Into<String>, ordinal: usize) -> Self {
        Self {
            text: text.into(),
            ordinal,
        }
    }

    /// Returns the length of the chunk in characters.
    ///
    /// This is the unit the chunk size limit is expressed in.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Checks if the chunk is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Estimates token count using the ~4 characters per token heuristic.
    #[must_use]
    pub fn estimate_tokens(&self) -> usize {
        self.char_len().div_ceil(4)
    }

    /// Returns a preview of the chunk text, at most `max_chars` characters.
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> &str {
        self.text
            .char_indices()
            .nth(max_chars)
            .map_or(self.text.as_str(), |(end, _)| &self.text[..end])
    }
}
