//! Lazily loaded, chunked reference document.

use crate::chunking::{Chunker, WordChunker};
use crate::core::Chunk;
use crate::document::source::{DocumentSource, FileSource, TextSource};
use crate::error::{Result, SourceError};
use crate::io::normalize_whitespace;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Outcome of the one-time document load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    /// The source was read and partitioned.
    Loaded {
        /// Whitespace-normalized document text.
        text: String,
        /// Chunk partition of `text`, in ordinal order.
        chunks: Vec<Chunk>,
    },
    /// The source could not be read. Retrieval treats this as "no chunks".
    Unavailable(SourceError),
}

impl Document {
    /// Returns the normalized text, or `None` when unavailable.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Loaded { text, .. } => Some(text),
            Self::Unavailable(_) => None,
        }
    }

    /// Returns the chunks (empty when unavailable).
    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        match self {
            Self::Loaded { chunks, .. } => chunks,
            Self::Unavailable(_) => &[],
        }
    }

    /// Whether the source was read successfully.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Observable load state of a [`DocumentStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// `load` has not completed yet.
    NotLoaded,
    /// The document is cached.
    Loaded,
    /// The source was unavailable; that outcome is cached.
    Unavailable,
}

/// Owns the reference document and its chunk partition.
///
/// The first call to [`load`](Self::load) reads the source, normalizes the
/// text and chunks it. Every later call returns the cached result. Concurrent
/// first callers block until the single initializer finishes, so the source
/// is read exactly once.
///
/// # Examples
///
/// ```
/// use ragchat::document::{DocumentStore, LoadState};
///
/// let store = DocumentStore::from_text("handbook", "Vacation is accrued monthly.", 800).unwrap();
/// assert_eq!(store.state(), LoadState::NotLoaded);
/// assert_eq!(store.chunks().len(), 1);
/// assert_eq!(store.state(), LoadState::Loaded);
/// ```
pub struct DocumentStore {
    source: Box<dyn DocumentSource>,
    chunker: Box<dyn Chunker>,
    document: OnceLock<Document>,
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("source", &self.source.name())
            .field("chunker", &self.chunker.name())
            .field("state", &self.state())
            .finish()
    }
}

impl DocumentStore {
    /// Creates a store over `source`, partitioned by `chunker`.
    ///
    /// # Errors
    ///
    /// Returns an error if the chunker configuration is invalid.
    pub fn new(source: Box<dyn DocumentSource>, chunker: Box<dyn Chunker>) -> Result<Self> {
        chunker.validate()?;
        Ok(Self {
            source,
            chunker,
            document: OnceLock::new(),
        })
    }

    /// Creates a store reading a text file with word chunks of `chunk_size`.
    ///
    /// # Errors
    ///
    /// Returns an error if `chunk_size` is invalid. A missing file is not an
    /// error here; it surfaces as [`Document::Unavailable`] on load.
    pub fn from_file(path: impl Into<PathBuf>, chunk_size: usize) -> Result<Self> {
        Self::new(
            Box::new(FileSource::new(path)),
            Box::new(WordChunker::with_size(chunk_size)),
        )
    }

    /// Creates a store over in-memory text.
    ///
    /// # Errors
    ///
    /// Returns an error if `chunk_size` is invalid.
    pub fn from_text(
        name: impl Into<String>,
        text: impl Into<String>,
        chunk_size: usize,
    ) -> Result<Self> {
        Self::new(
            Box::new(TextSource::new(name, text)),
            Box::new(WordChunker::with_size(chunk_size)),
        )
    }

    /// Loads the document on first call and returns the cached outcome.
    pub fn load(&self) -> &Document {
        self.document.get_or_init(|| self.read_and_chunk())
    }

    /// Like [`load`](Self::load), but reports an unavailable source as an error.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Unavailable`] if the document could not be read.
    pub fn try_load(&self) -> Result<&str> {
        match self.load() {
            Document::Loaded { text, .. } => Ok(text),
            Document::Unavailable(err) => Err(err.clone().into()),
        }
    }

    /// Returns the chunk partition, loading if necessary.
    pub fn chunks(&self) -> &[Chunk] {
        self.load().chunks()
    }

    /// Returns the normalized text, loading if necessary.
    pub fn text(&self) -> Option<&str> {
        self.load().text()
    }

    /// Returns the current load state without triggering a load.
    pub fn state(&self) -> LoadState {
        match self.document.get() {
            None => LoadState::NotLoaded,
            Some(Document::Loaded { .. }) => LoadState::Loaded,
            Some(Document::Unavailable(_)) => LoadState::Unavailable,
        }
    }

    /// Returns the source name.
    pub fn source_name(&self) -> String {
        self.source.name()
    }

    fn read_and_chunk(&self) -> Document {
        let source_name = self.source.name();
        debug!(source = %source_name, "loading reference document");

        let raw = match self.source.fetch() {
            Ok(raw) => raw,
            Err(e) => {
                warn!(source = %source_name, error = %e, "reference document unavailable");
                return Document::Unavailable(SourceError::Unavailable {
                    source_name,
                    reason: e.to_string(),
                });
            }
        };

        let text = normalize_whitespace(&raw);
        match self.chunker.chunk(&text) {
            Ok(chunks) => {
                info!(
                    source = %source_name,
                    chars = text.chars().count(),
                    chunks = chunks.len(),
                    strategy = self.chunker.name(),
                    "reference document loaded"
                );
                Document::Loaded { text, chunks }
            }
            Err(e) => {
                warn!(source = %source_name, error = %e, "failed to chunk reference document");
                Document::Unavailable(SourceError::Unavailable {
                    source_name,
                    reason: e.to_string(),
                })
            }
        }
    }
}
