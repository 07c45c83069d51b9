//! I/O utilities.
//!
//! Provides file reading with memory mapping support for large reference
//! documents, along with the whitespace normalization used before chunking.

pub mod reader;
pub mod unicode;

pub use reader::{FileReader, read_file};
pub use unicode::{normalize_whitespace, truncate_graphemes};
