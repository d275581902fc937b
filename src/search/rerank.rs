//! Secondary re-ranking pass
//!
//! Refines an initial retrieval ordering by blending the base score with
//! lexical signals: query-term frequency in the chunk, exact-phrase
//! presence, and query-term overlap with the parent document title. All
//! boosts are additive and non-negative, so the re-rank score never drops
//! below the base score. The combined score may exceed 1.0; it is only
//! used for relative ordering.

use std::collections::HashSet;

use super::SearchResult;

/// Per-term content boost and its saturation cap
const KEYWORD_BOOST_PER_TERM: f32 = 0.05;
const KEYWORD_BOOST_CAP: f32 = 0.2;

/// Flat boost when the full query appears verbatim in the chunk
const PHRASE_BOOST: f32 = 0.1;

/// Per-term title boost and its saturation cap
const TITLE_BOOST_PER_TERM: f32 = 0.03;
const TITLE_BOOST_CAP: f32 = 0.1;

/// Rerank search results using lexical relevance signals
pub struct Reranker;

impl Reranker {
    /// Re-score and re-order results against the original query
    ///
    /// The sort is stable: results whose re-rank scores tie keep their
    /// original relative order. The list is truncated to `top_k` and
    /// ranks are reassigned.
    #[must_use]
    pub fn rerank(mut results: Vec<SearchResult>, query: &str, top_k: usize) -> Vec<SearchResult> {
        let query_lower = query.to_lowercase();
        let query_terms: HashSet<&str> = query_lower.split_whitespace().collect();

        for result in &mut results {
            let content_lower = result.content.to_lowercase();
            let title_lower = result.document_title.to_lowercase();

            let term_matches = query_terms
                .iter()
                .filter(|term| content_lower.contains(**term))
                .count();
            let keyword_boost = (term_matches as f32 * KEYWORD_BOOST_PER_TERM).min(KEYWORD_BOOST_CAP);

            let phrase_boost = if content_lower.contains(&query_lower) {
                PHRASE_BOOST
            } else {
                0.0
            };

            let title_matches = query_terms
                .iter()
                .filter(|term| title_lower.contains(**term))
                .count();
            let title_boost = (title_matches as f32 * TITLE_BOOST_PER_TERM).min(TITLE_BOOST_CAP);

            result.rerank_score = Some(result.score + keyword_boost + phrase_boost + title_boost);
        }

        // Stable sort keeps the incoming order for tied scores
        results.sort_by(|a, b| {
            b.effective_score()
                .partial_cmp(&a.effective_score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);
        for (idx, result) in results.iter_mut().enumerate() {
            result.rank = idx + 1;
        }

        results
    }
}
