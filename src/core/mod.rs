//! Core domain models.
//!
//! This module contains the fundamental data structures used throughout the
//! crate: chunks, conversation turns and sessions, and the composed chat
//! messages. These are pure domain models with no I/O dependencies.

pub mod chunk;
pub mod message;
pub mod session;

pub use chunk::Chunk;
pub use message::{ChatMessage, Role};
pub use session::{Session, Speaker, Turn};
