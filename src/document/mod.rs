//! Reference document ingestion.
//!
//! A [`DocumentStore`] reads its [`DocumentSource`] once, normalizes the
//! text and keeps the resulting chunk partition for the life of the store.

pub mod source;
pub mod store;

pub use source::{DocumentSource, FileSource, TextSource};
pub use store::{Document, DocumentStore, LoadState};
