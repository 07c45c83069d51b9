//! Chunking strategies.
//!
//! The document store partitions its normalized text through the
//! [`Chunker`] trait. The shipped strategy is [`WordChunker`], which packs
//! whole whitespace-delimited tokens into non-overlapping chunks.

pub mod traits;
pub mod word;

pub use traits::Chunker;
pub use word::WordChunker;

/// Default chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 800;

/// Maximum allowed chunk size in characters.
pub const MAX_CHUNK_SIZE: usize = 100_000;

/// Creates the default chunker.
#[must_use]
pub const fn default_chunker() -> WordChunker {
    WordChunker::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chunker() {
        let chunker = default_chunker();
        assert_eq!(chunker.name(), "word");
        assert_eq!(chunker.chunk_size(), DEFAULT_CHUNK_SIZE);
    }
}
