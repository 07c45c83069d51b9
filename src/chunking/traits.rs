//! Chunker trait definition.
//!
//! Defines the interface for chunking strategies so the document store can
//! be driven by any deterministic partitioner.

use crate::core::Chunk;
use crate::error::Result;

/// Trait for partitioning normalized text into retrieval chunks.
///
/// Implementations must be `Send + Sync` so a document store can be shared
/// across request handlers, and must be deterministic: the same input and
/// configuration always produce the same chunk boundaries.
///
/// # Examples
///
/// ```
/// use ragchat::chunking::{Chunker, WordChunker};
///
/// let chunker = WordChunker::with_size(20);
/// let chunks = chunker.chunk("one two three four five six seven").unwrap();
/// assert!(chunks.iter().all(|c| c.char_len() <= 20));
/// ```
pub trait Chunker: Send + Sync {
    /// Chunks the input text.
    ///
    /// Ordinals of the returned chunks are `0..n` in document order.
    ///
    /// # Errors
    ///
    /// Returns an error if the chunker is misconfigured.
    fn chunk(&self, text: &str) -> Result<Vec<Chunk>>;

    /// Returns the name of the chunking strategy.
    fn name(&self) -> &'static str;

    /// Returns a description of the chunking strategy.
    fn description(&self) -> &'static str {
        "No description available"
    }

    /// Validates configuration before chunking.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot produce chunks.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}
