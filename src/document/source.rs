//! Document sources.
//!
//! A source is the outbound primitive the store uses to obtain raw text.
//! It is called at most once per store.

use crate::error::Result;
use crate::io::read_file;
use std::path::{Path, PathBuf};

/// Provides the raw text of the reference document.
pub trait DocumentSource: Send + Sync {
    /// Human-readable name used in logs and errors.
    fn name(&self) -> String;

    /// Reads the raw document text.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be located or read.
    fn fetch(&self) -> Result<String>;
}

/// A UTF-8 text or markdown file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Creates a source reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<String> {
        read_file(&self.path)
    }
}

/// In-memory text, mainly for tests and embedding a document in a binary.
#[derive(Debug, Clone)]
pub struct TextSource {
    name: String,
    text: String,
}

impl TextSource {
    /// Creates a named in-memory source.
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl DocumentSource for TextSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn fetch(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_source_reads_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("handbook.txt");
        std::fs::write(&path, "Benefits overview").unwrap();

        let source = FileSource::new(&path);
        assert_eq!(source.fetch().unwrap(), "Benefits overview");
        assert!(source.name().ends_with("handbook.txt"));
        assert_eq!(source.path(), path.as_path());
    }

    #[test]
    fn test_file_source_missing_file() {
        let source = FileSource::new("/nonexistent/handbook.txt");
        assert!(source.fetch().is_err());
    }

    #[test]
    fn test_text_source() {
        let source = TextSource::new("inline", "some text");
        assert_eq!(source.name(), "inline");
        assert_eq!(source.fetch().unwrap(), "some text");
    }
}
