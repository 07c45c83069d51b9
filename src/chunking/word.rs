//! Greedy word-packing chunker.
//!
//! Splits text on whitespace and packs whole tokens into chunks of at most
//! `chunk_size` characters. Tokens are never split and chunks never overlap.

use crate::chunking::traits::Chunker;
use crate::chunking::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
use crate::core::Chunk;
use crate::error::{ChunkingError, Result};

/// Word-boundary chunker with a character budget per chunk.
///
/// Re-joining the produced chunks with single spaces yields the
/// whitespace-normalized input.
///
/// # Examples
///
/// ```
/// use ragchat::chunking::{Chunker, WordChunker};
///
/// let chunker = WordChunker::with_size(11);
/// let chunks = chunker.chunk("alpha bravo charlie").unwrap();
/// let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
/// assert_eq!(texts, ["alpha bravo", "charlie"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordChunker {
    /// Maximum chunk length in characters.
    chunk_size: usize,
}

impl Default for WordChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl WordChunker {
    /// Creates a chunker with the default size (800 characters).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Creates a chunker with a custom maximum chunk size.
    #[must_use]
    pub const fn with_size(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    /// Returns the configured maximum chunk size.
    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl Chunker for WordChunker {
    fn chunk(&self, text: &str) -> Result<Vec<Chunk>> {
        self.validate()?;

        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;

        for token in text.split_whitespace() {
            let token_len = token.chars().count();
            let separator = usize::from(!current.is_empty());

            if current.is_empty() || current_len + separator + token_len <= self.chunk_size {
                if separator == 1 {
                    current.push(' ');
                }
                current.push_str(token);
                current_len += separator + token_len;
            } else {
                let ordinal = chunks.len();
                chunks.push(Chunk::new(std::mem::take(&mut current), ordinal));
                current.push_str(token);
                current_len = token_len;
            }
        }

        if !current.is_empty() {
            let ordinal = chunks.len();
            chunks.push(Chunk::new(current, ordinal));
        }

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "word"
    }

    fn description(&self) -> &'static str {
        "Greedy whitespace-token packing up to a character budget"
    }

    fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ChunkingError::InvalidConfig {
                reason: "chunk_size must be > 0".to_string(),
            }
            .into());
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(ChunkingError::ChunkTooLarge {
                size: self.chunk_size,
                max: MAX_CHUNK_SIZE,
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_word_chunker_default() {
        assert_eq!(WordChunker::new().chunk_size(), DEFAULT_CHUNK_SIZE);
        assert_eq!(WordChunker::default(), WordChunker::new());
    }

    #[test]
    fn test_word_chunker_empty_text() {
        let chunker = WordChunker::with_size(10);
        assert!(chunker.chunk("").unwrap().is_empty());
        assert!(chunker.chunk("  \n\t ").unwrap().is_empty());
    }

    #[test]
    fn test_word_chunker_small_text() {
        let chunker = WordChunker::with_size(100);
        let chunks = chunker.chunk("Hello,   world!\n").unwrap();
        assert_eq!(texts(&chunks), ["Hello, world!"]);
        assert_eq!(chunks[0].ordinal, 0);
    }

    #[test]
    fn test_word_chunker_exact_fit() {
        // "aaaa bbbb" is exactly 9 characters
        let chunker = WordChunker::with_size(9);
        let chunks = chunker.chunk("aaaa bbbb cccc").unwrap();
        assert_eq!(texts(&chunks), ["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn test_word_chunker_one_over_starts_new_chunk() {
        let chunker = WordChunker::with_size(8);
        let chunks = chunker.chunk("aaaa bbbb").unwrap();
        assert_eq!(texts(&chunks), ["aaaa", "bbbb"]);
    }

    #[test]
    fn test_word_chunker_first_token_may_fill_budget() {
        let chunker = WordChunker::with_size(5);
        let chunks = chunker.chunk("abcde fg").unwrap();
        assert_eq!(texts(&chunks), ["abcde", "fg"]);
    }

    #[test]
    fn test_word_chunker_oversized_token_stands_alone() {
        let chunker = WordChunker::with_size(4);
        let chunks = chunker.chunk("abcdefgh ij kl").unwrap();
        assert_eq!(texts(&chunks), ["abcdefgh", "ij kl"]);
        assert!(chunks.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn test_word_chunker_ordinals_sequential() {
        let chunker = WordChunker::with_size(3);
        let chunks = chunker.chunk("a b c d e f g").unwrap();
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.ordinal, i);
        }
    }

    #[test]
    fn test_word_chunker_counts_characters() {
        // Each token is 3 chars but 9 bytes.
        let chunker = WordChunker::with_size(7);
        let chunks = chunker.chunk("日本語 日本語 日本語").unwrap();
        assert_eq!(texts(&chunks), ["日本語 日本語", "日本語"]);
    }

    #[test]
    fn test_word_chunker_rejoin_reconstructs_normalized_text() {
        let text = "  The quick\tbrown fox\n\njumps over   the lazy dog.  ";
        let chunker = WordChunker::with_size(12);
        let chunks = chunker.chunk(text).unwrap();
        let rejoined = texts(&chunks).join(" ");
        assert_eq!(rejoined, "The quick brown fox jumps over the lazy dog.");
    }

    #[test]
    fn test_word_chunker_deterministic() {
        let text = "lorem ipsum dolor sit amet ".repeat(50);
        let chunker = WordChunker::with_size(40);
        assert_eq!(chunker.chunk(&text).unwrap(), chunker.chunk(&text).unwrap());
    }

    #[test]
    fn test_word_chunker_invalid_config() {
        assert!(WordChunker::with_size(0).chunk("test").is_err());
        assert!(WordChunker::with_size(MAX_CHUNK_SIZE + 1).chunk("test").is_err());
    }

    #[test]
    fn test_word_chunker_name() {
        let chunker = WordChunker::new();
        assert_eq!(chunker.name(), "word");
        assert!(!chunker.description().is_empty());
    }
}
