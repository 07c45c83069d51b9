//! Lexical relevance ranking.
//!
//! Scores chunks by counting literal occurrences of the query terms and
//! returns the best `k`. There is no semantic component: relevance is pure
//! term frequency.

mod terms;

pub use terms::{MAX_IGNORED_TERM_CHARS, QueryTerms, STRIPPED_PUNCTUATION};

use crate::core::Chunk;
use rayon::prelude::*;
use tracing::debug;

/// Default number of chunks returned by [`rank`].
pub const DEFAULT_TOP_K: usize = 3;

/// A chunk paired with its score for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredChunk<'a> {
    /// The scored chunk, borrowed from its store.
    pub chunk: &'a Chunk,
    /// Total term occurrences.
    pub score: usize,
}

/// Counts non-overlapping occurrences of `needle` in `haystack`.
///
/// The needle is matched literally; characters such as `+`, `*` or `(` have
/// no special meaning. An empty needle never matches.
///
/// # Examples
///
/// ```
/// use ragchat::search::count_occurrences;
///
/// assert_eq!(count_occurrences("aaaa", "aa"), 2);
/// assert_eq!(count_occurrences("c++ and c++", "c++"), 2);
/// ```
#[must_use]
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// Scores a single text against already-extracted terms.
///
/// Matching is case-insensitive: the text is lower-cased and terms are
/// lower-case by construction.
#[must_use]
pub fn score_text(text: &str, terms: &QueryTerms) -> usize {
    let lowered = text.to_lowercase();
    terms.iter().map(|term| count_occurrences(&lowered, term)).sum()
}

/// Ranks `chunks` against `query` and returns at most `top_k` matches.
///
/// Chunks scoring zero are dropped. Results are ordered by score descending;
/// equal scores keep ascending ordinal order. A query with no searchable
/// terms returns nothing.
///
/// # Examples
///
/// ```
/// use ragchat::core::Chunk;
/// use ragchat::search::rank;
///
/// let chunks = vec![Chunk::new("alpha bravo", 0), Chunk::new("bravo charlie bravo", 1)];
/// let ranked = rank(&chunks, "bravo", 3);
/// assert_eq!(ranked[0].chunk.ordinal, 1);
/// assert_eq!(ranked[0].score, 2);
/// assert_eq!(ranked[1].score, 1);
/// ```
#[must_use]
pub fn rank<'a>(chunks: &'a [Chunk], query: &str, top_k: usize) -> Vec<ScoredChunk<'a>> {
    let terms = QueryTerms::parse(query);
    if terms.is_empty() || top_k == 0 {
        debug!(query, "no searchable terms in query");
        return Vec::new();
    }

    let mut scored: Vec<ScoredChunk<'a>> = chunks
        .par_iter()
        .map(|chunk| ScoredChunk {
            chunk,
            score: score_text(&chunk.text, &terms),
        })
        .filter(|scored| scored.score > 0)
        .collect();

    // `sort_by` is stable, which gives the ordinal tie-break.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(top_k);

    debug!(
        terms = terms.len(),
        candidates = chunks.len(),
        returned = scored.len(),
        "ranked chunks"
    );
    scored
}

/// Ranks and returns only the chunk texts.
#[must_use]
pub fn retrieve(chunks: &[Chunk], query: &str, top_k: usize) -> Vec<String> {
    rank(chunks, query, top_k)
        .into_iter()
        .map(|scored| scored.chunk.text.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new(*t, i))
            .collect()
    }

    #[test]
    fn test_rank_orders_by_score() {
        let chunks = chunks(&["alpha bravo", "bravo charlie bravo"]);
        let ranked = retrieve(&chunks, "bravo", DEFAULT_TOP_K);
        assert_eq!(ranked, ["bravo charlie bravo", "alpha bravo"]);
    }

    #[test]
    fn test_rank_tie_keeps_ordinal_order() {
        let chunks = chunks(&["salary review", "unrelated", "salary bands", "salary"]);
        let ranked = rank(&chunks, "salary", 10);
        let ordinals: Vec<usize> = ranked.iter().map(|s| s.chunk.ordinal).collect();
        assert_eq!(ordinals, [0, 2, 3]);
    }

    #[test]
    fn test_rank_respects_top_k() {
        let chunks = chunks(&["leave", "leave", "leave", "leave", "leave"]);
        assert_eq!(rank(&chunks, "leave", 3).len(), 3);
        assert_eq!(rank(&chunks, "leave", 1).len(), 1);
        assert!(rank(&chunks, "leave", 0).is_empty());
    }

    #[test]
    fn test_rank_drops_zero_scores() {
        let chunks = chunks(&["nothing here", "dental plan"]);
        let ranked = rank(&chunks, "dental", 3);
        assert_eq!(ranked.len(), 1);
        assert!(ranked.iter().all(|s| s.score > 0));
    }

    #[test]
    fn test_rank_short_terms_only_returns_empty() {
        let chunks = chunks(&["the and but", "and the"]);
        assert!(rank(&chunks, "the and but", 3).is_empty());
    }

    #[test]
    fn test_rank_empty_collection() {
        assert!(rank(&[], "vacation", 3).is_empty());
    }

    #[test]
    fn test_rank_case_insensitive() {
        let chunks = chunks(&["VACATION Vacation vacation"]);
        let ranked = rank(&chunks, "Vacation", 3);
        assert_eq!(ranked[0].score, 3);
    }

    #[test]
    fn test_rank_counts_substrings() {
        // "plan" also matches inside "planning"
        let chunks = chunks(&["planning the plan"]);
        assert_eq!(rank(&chunks, "plan", 3)[0].score, 2);
    }

    #[test]
    fn test_rank_sums_terms_independently() {
        let chunks = chunks(&["health insurance and dental insurance", "health"]);
        let ranked = rank(&chunks, "health insurance", 3);
        assert_eq!(ranked[0].score, 3);
        assert_eq!(ranked[1].score, 1);
    }

    #[test]
    fn test_rank_metacharacters_are_literal() {
        let chunks = chunks(&["we use c++++ daily", "xxxx"]);
        // "c+++" would be a broken pattern; as a literal it matches once.
        let ranked = rank(&chunks, "c+++", 3);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].chunk.ordinal, 0);
        assert_eq!(ranked[0].score, 1);

        // "...." is stripped to nothing and must not match everywhere.
        assert!(rank(&chunks, "....", 3).is_empty());
    }

    #[test]
    fn test_count_occurrences_non_overlapping() {
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
        assert_eq!(count_occurrences("abc", ""), 0);
        assert_eq!(count_occurrences("", "abc"), 0);
    }

    #[test]
    fn test_score_text() {
        let terms = QueryTerms::parse("remote work");
        assert_eq!(score_text("Remote WORK and remote access", &terms), 3);
    }
}
