//! Hybrid search with weighted-score fusion
//!
//! Runs the semantic and keyword channels and merges them into one ranked,
//! deduplicated list. Fusion is additive: a chunk surfaced by both channels
//! accumulates both weighted contributions, which deliberately rewards
//! cross-channel agreement and is not normalized back into [0, 1].

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::sort_and_rank;
use super::SearchResult;
use super::SearchType;
use crate::config::SearchConfig;
use crate::database::Database;
use crate::database::FulltextSearch;
use crate::embeddings::EmbeddingService;
use crate::errors::DocuMindError;
use crate::errors::Result;

/// Placeholder similarity for full-text keyword matches
pub const FULLTEXT_KEYWORD_SCORE: f32 = 0.8;

/// Placeholder similarity for substring fallback matches, reflecting the
/// lower confidence of the degraded path
pub const SUBSTRING_KEYWORD_SCORE: f32 = 0.6;

/// Searcher combining semantic and keyword retrieval channels
pub struct HybridSearcher {
    database: Arc<Database>,
    embedding_service: Arc<EmbeddingService>,
    semantic_weight: f32,
    similarity_floor: f32,
    hybrid_similarity_floor: f32,
}

impl HybridSearcher {
    /// Create a new hybrid searcher
    ///
    /// # Errors
    /// - `InvalidParameter` when the semantic weight or a similarity floor
    ///   is outside [0, 1]
    pub fn new(
        database: Arc<Database>,
        embedding_service: Arc<EmbeddingService>,
        config: &SearchConfig,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&config.semantic_weight) {
            return Err(DocuMindError::InvalidParameter(format!(
                "semantic_weight must be between 0 and 1, got {}",
                config.semantic_weight
            )));
        }
        for (name, floor) in [
            ("similarity_floor", config.similarity_floor),
            ("hybrid_similarity_floor", config.hybrid_similarity_floor),
        ] {
            if !(0.0..=1.0).contains(&floor) {
                return Err(DocuMindError::InvalidParameter(format!(
                    "{name} must be between 0 and 1, got {floor}"
                )));
            }
        }

        Ok(Self {
            database,
            embedding_service,
            semantic_weight: config.semantic_weight,
            similarity_floor: config.similarity_floor,
            hybrid_similarity_floor: config.hybrid_similarity_floor,
        })
    }

    /// Weight of the semantic channel in hybrid fusion
    #[must_use]
    pub const fn semantic_weight(&self) -> f32 {
        self.semantic_weight
    }

    /// Semantic search using vector embeddings
    ///
    /// Returns results scored by raw cosine similarity, best first.
    pub async fn search_semantic(
        &self,
        query: &str,
        top_k: usize,
        threshold: Option<f32>,
    ) -> Result<Vec<SearchResult>> {
        validate_query(query, top_k)?;
        let floor = threshold.unwrap_or(self.similarity_floor);
        if !(0.0..=1.0).contains(&floor) {
            return Err(DocuMindError::InvalidParameter(format!(
                "similarity threshold must be between 0 and 1, got {floor}"
            )));
        }

        debug!("Performing semantic search: {}", query);

        let query_embedding = self.embedding_service.generate(query).await?;
        let hits = self
            .database
            .vector_search_chunks(query_embedding, top_k as i64, floor)
            .await?;

        let mut results: Vec<SearchResult> = hits
            .into_iter()
            .map(|hit| {
                let similarity = hit.similarity.unwrap_or(0.0);
                SearchResult::from_hit(hit, similarity, SearchType::Semantic)
            })
            .collect();
        sort_and_rank(&mut results);

        Ok(results)
    }

    /// Keyword search using full-text matching
    ///
    /// Full-text failure is recovered locally: unsupported queries and
    /// backend errors degrade to substring matching with a lower
    /// placeholder score. This channel never fails the whole query.
    pub async fn search_keyword(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        validate_query(query, top_k)?;

        debug!("Performing keyword search: {}", query);

        let (hits, placeholder) = match self
            .database
            .fulltext_search_chunks(query, top_k as i64)
            .await
        {
            FulltextSearch::Matched(hits) => (hits, FULLTEXT_KEYWORD_SCORE),
            FulltextSearch::UnsupportedQuery | FulltextSearch::BackendError(_) => {
                debug!("Full-text search unavailable, falling back to substring match");
                let hits = self
                    .database
                    .substring_search_chunks(query, top_k as i64)
                    .await?;
                (hits, SUBSTRING_KEYWORD_SCORE)
            }
        };

        let mut results: Vec<SearchResult> = hits
            .into_iter()
            .map(|hit| SearchResult::from_hit(hit, placeholder, SearchType::Keyword))
            .collect();
        for (idx, result) in results.iter_mut().enumerate() {
            result.rank = idx + 1;
        }

        Ok(results)
    }

    /// Hybrid search combining semantic and keyword channels
    ///
    /// Both channels are retrieved in full before merging so the fusion
    /// order (semantic first) is deterministic.
    pub async fn search_hybrid(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        validate_query(query, top_k)?;

        debug!("Performing hybrid search: {}", query);

        let semantic = self
            .search_semantic(query, top_k, Some(self.hybrid_similarity_floor))
            .await?;
        let keyword = self.search_keyword(query, top_k).await?;

        Ok(fuse_channels(semantic, keyword, self.semantic_weight, top_k))
    }
}

/// Validate common search inputs
fn validate_query(query: &str, top_k: usize) -> Result<()> {
    if query.trim().is_empty() {
        return Err(DocuMindError::InvalidQuery(
            "Query cannot be empty".to_string(),
        ));
    }
    if top_k == 0 {
        return Err(DocuMindError::InvalidParameter(
            "top_k must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Merge the semantic and keyword channels into one deduplicated ranking
///
/// Semantic results are inserted first with `score × semantic_weight`.
/// Keyword results contribute `score × (1 − semantic_weight)`: a chunk
/// already present is retagged `both` and its keyword contribution is
/// added onto the existing weighted score; new chunks are appended as
/// keyword entries. The merged set is sorted by fused score descending,
/// truncated to `top_k`, and re-ranked.
#[must_use]
pub fn fuse_channels(
    semantic: Vec<SearchResult>,
    keyword: Vec<SearchResult>,
    semantic_weight: f32,
    top_k: usize,
) -> Vec<SearchResult> {
    let keyword_weight = 1.0 - semantic_weight;

    let mut merged: Vec<SearchResult> = Vec::with_capacity(semantic.len() + keyword.len());
    let mut positions: HashMap<Uuid, usize> = HashMap::new();

    // Semantic channel has priority on first insertion
    for mut result in semantic {
        if positions.contains_key(&result.chunk_id) {
            continue;
        }
        result.score *= semantic_weight;
        result.rerank_score = None;
        positions.insert(result.chunk_id, merged.len());
        merged.push(result);
    }

    for mut result in keyword {
        let weighted = result.score * keyword_weight;
        if let Some(&pos) = positions.get(&result.chunk_id) {
            let existing = &mut merged[pos];
            existing.search_type = SearchType::Both;
            existing.score += weighted;
        } else {
            result.score = weighted;
            result.rerank_score = None;
            positions.insert(result.chunk_id, merged.len());
            merged.push(result);
        }
    }

    sort_and_rank(&mut merged);
    merged.truncate(top_k);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(id: &str, doc: &str, score: f32, search_type: SearchType) -> SearchResult {
        SearchResult {
            chunk_id: Uuid::new_v5(&Uuid::NAMESPACE_OID, id.as_bytes()),
            document_id: Uuid::new_v5(&Uuid::NAMESPACE_OID, doc.as_bytes()),
            document_title: doc.to_string(),
            chunk_index: 0,
            content: format!("content of {id}"),
            metadata: json!({}),
            score,
            rerank_score: None,
            search_type,
            rank: 0,
        }
    }

    #[test]
    fn test_fused_score_is_sum_of_weighted_contributions() {
        // semantic 0.9 × 0.7 + keyword 0.8 × 0.3 = 0.63 + 0.24 = 0.87
        let semantic = vec![result("c1", "handbook", 0.9, SearchType::Semantic)];
        let keyword = vec![result("c1", "handbook", 0.8, SearchType::Keyword)];

        let fused = fuse_channels(semantic, keyword, 0.7, 5);

        assert_eq!(fused.len(), 1);
        assert!((fused[0].score - 0.87).abs() < 1e-6);
        assert_eq!(fused[0].search_type, SearchType::Both);
    }

    #[test]
    fn test_no_duplicate_chunk_ids_in_output() {
        let semantic = vec![
            result("c1", "doc1", 0.9, SearchType::Semantic),
            result("c2", "doc1", 0.8, SearchType::Semantic),
        ];
        let keyword = vec![
            result("c1", "doc1", 0.8, SearchType::Keyword),
            result("c3", "doc2", 0.8, SearchType::Keyword),
        ];

        let fused = fuse_channels(semantic, keyword, 0.7, 10);

        let mut ids: Vec<Uuid> = fused.iter().map(|r| r.chunk_id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), fused.len());
        assert_eq!(fused.len(), 3);
    }

    #[test]
    fn test_keyword_only_chunks_get_keyword_weight() {
        let semantic = Vec::new();
        let keyword = vec![result("c1", "doc1", 0.8, SearchType::Keyword)];

        let fused = fuse_channels(semantic, keyword, 0.7, 5);

        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].search_type, SearchType::Keyword);
        assert!((fused[0].score - 0.8 * 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_output_sorted_descending_with_dense_ranks() {
        let semantic = vec![
            result("c1", "doc1", 0.5, SearchType::Semantic),
            result("c2", "doc1", 0.9, SearchType::Semantic),
        ];
        let keyword = vec![result("c1", "doc1", 0.8, SearchType::Keyword)];

        let fused = fuse_channels(semantic, keyword, 0.5, 10);

        // c1: 0.25 + 0.40 = 0.65; c2: 0.45
        assert!((fused[0].score - 0.65).abs() < 1e-6);
        assert!((fused[1].score - 0.45).abs() < 1e-6);
        let ranks: Vec<usize> = fused.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2]);
    }

    #[test]
    fn test_truncation_to_top_k() {
        let semantic = (0..8)
            .map(|i| {
                result(
                    &format!("s{i}"),
                    "doc1",
                    0.9 - i as f32 * 0.05,
                    SearchType::Semantic,
                )
            })
            .collect();
        let keyword = (0..8)
            .map(|i| result(&format!("k{i}"), "doc2", 0.8, SearchType::Keyword))
            .collect();

        let fused = fuse_channels(semantic, keyword, 0.7, 5);
        assert_eq!(fused.len(), 5);
    }

    #[test]
    fn test_both_tagged_score_can_exceed_channel_maximum() {
        // Unnormalized additive fusion is intentional
        let semantic = vec![result("c1", "doc1", 1.0, SearchType::Semantic)];
        let keyword = vec![result("c1", "doc1", 0.8, SearchType::Keyword)];

        let fused = fuse_channels(semantic, keyword, 0.5, 5);
        assert!(fused[0].score > 0.8);
    }
}
