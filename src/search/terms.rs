//! Query term extraction.

/// Characters stripped from every query token.
pub const STRIPPED_PUNCTUATION: &[char] = &['.', ',', '?', '!', ';', ':', '(', ')', '"', '\''];

/// Tokens with this many characters or fewer are discarded.
pub const MAX_IGNORED_TERM_CHARS: usize = 3;

/// The searchable terms of a query.
///
/// Tokens are split on whitespace, lower-cased and stripped of
/// [`STRIPPED_PUNCTUATION`]; anything left with
/// [`MAX_IGNORED_TERM_CHARS`] characters or fewer is dropped. Length works
/// as a stop-word filter, so "the", "and" and "but" never match.
/// Duplicates are kept: a repeated word weighs twice.
///
/// # Examples
///
/// ```
/// use ragchat::search::QueryTerms;
///
/// let terms = QueryTerms::parse("How many vacation days (PTO) do I get?");
/// assert_eq!(terms.as_slice(), ["many", "vacation", "days"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTerms {
    terms: Vec<String>,
}

impl QueryTerms {
    /// Extracts terms from a raw query.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let terms = query
            .split_whitespace()
            .map(|token| token.to_lowercase().replace(STRIPPED_PUNCTUATION, ""))
            .filter(|term| term.chars().count() > MAX_IGNORED_TERM_CHARS)
            .collect();
        Self { terms }
    }

    /// Whether no searchable term survived filtering.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of terms (duplicates included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns the terms in query order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.terms
    }

    /// Iterates over the terms.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }
}
