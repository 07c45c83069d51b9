//! System instructions and template builders.
//!
//! Each builder returns the full text of the leading system message for one
//! composition outcome.

use crate::config::Persona;
use std::fmt::Write;

/// Instruction used when grounding is disabled.
pub const OPEN_SYSTEM_PROMPT: &str = "You are a helpful and knowledgeable assistant. Answer the user's questions concisely and informatively.";

/// Closing delimiter of the excerpt block.
pub const EXCERPTS_END: &str = "--- END OF EXCERPTS ---";

/// Opening words of the refusal the model must give when nothing matched.
pub const REFUSAL_PHRASE: &str = "I'm sorry, I don't know.";

/// Opening delimiter of the excerpt block, e.g. `--- EMPLOYEE HANDBOOK EXCERPTS ---`.
#[must_use]
pub fn excerpts_start(persona: &Persona) -> String {
    format!("--- {} EXCERPTS ---", persona.excerpt_label)
}

/// Builds the grounded instruction embedding `excerpts` verbatim.
///
/// Excerpts are separated by a blank line and wrapped in the excerpt
/// delimiters.
#[must_use]
pub fn grounded_instruction(persona: &Persona, excerpts: &[String]) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "You are a helpful assistant for {}. You must ONLY use the information provided below to answer.",
        persona.organization
    );
    out.push_str("\n\n");
    out.push_str(&excerpts_start(persona));
    out.push('\n');
    out.push_str(&excerpts.join("\n\n"));
    out.push('\n');
    out.push_str(EXCERPTS_END);
    out
}

/// Builds the instruction used when retrieval found nothing.
///
/// The model is told to give a fixed refusal instead of improvising.
#[must_use]
pub fn refusal_instruction(persona: &Persona) -> String {
    format!(
        "You are a helpful assistant for {}. The excerpts do not contain relevant information for this question. Reply politely: \"{REFUSAL_PHRASE} The {} does not contain information about that.\"",
        persona.organization, persona.document_name
    )
}
