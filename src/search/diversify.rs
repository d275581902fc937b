//! Result diversification
//!
//! Caps how many chunks any single document contributes so one long
//! document cannot crowd out the rest of the knowledge base.

use std::collections::HashMap;

use uuid::Uuid;

use super::SearchResult;

/// Limit results to at most `max_per_document` chunks per source document
///
/// Admission walks the full result list in descending score order, so the
/// globally best chunks win the per-document slots regardless of where
/// they sit in the input ordering. The admitted subset is then re-sorted
/// by score and re-ranked.
#[must_use]
pub fn diversify_results(
    results: Vec<SearchResult>,
    max_per_document: usize,
) -> Vec<SearchResult> {
    if results.is_empty() || max_per_document == 0 {
        return Vec::new();
    }

    let mut sorted = results;
    sorted.sort_by(|a, b| {
        b.effective_score()
            .partial_cmp(&a.effective_score())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut doc_counts: HashMap<Uuid, usize> = HashMap::new();
    let mut diversified: Vec<SearchResult> = Vec::with_capacity(sorted.len());

    for result in sorted {
        let count = doc_counts.entry(result.document_id).or_insert(0);
        if *count < max_per_document {
            *count += 1;
            diversified.push(result);
        }
    }

    // Already score-ordered from the admission pass; reassign dense ranks
    for (idx, result) in diversified.iter_mut().enumerate() {
        result.rank = idx + 1;
    }

    diversified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchType;
    use serde_json::json;

    fn result(id: &str, doc: &str, score: f32) -> SearchResult {
        SearchResult {
            chunk_id: Uuid::new_v5(&Uuid::NAMESPACE_OID, id.as_bytes()),
            document_id: Uuid::new_v5(&Uuid::NAMESPACE_OID, doc.as_bytes()),
            document_title: doc.to_string(),
            chunk_index: 0,
            content: format!("content of {id}"),
            metadata: json!({}),
            score,
            rerank_score: None,
            search_type: SearchType::Semantic,
            rank: 0,
        }
    }

    #[test]
    fn test_caps_chunks_per_document() {
        let results = vec![
            result("c1", "doc1", 0.95),
            result("c2", "doc1", 0.90),
            result("c3", "doc1", 0.85),
            result("c4", "doc2", 0.80),
        ];

        let diversified = diversify_results(results, 2);

        // c3 dropped: doc1 already contributed its two best chunks
        let ids: Vec<String> = diversified
            .iter()
            .map(|r| r.content.trim_start_matches("content of ").to_string())
            .collect();
        assert_eq!(ids, vec!["c1", "c2", "c4"]);
    }

    #[test]
    fn test_cap_holds_for_every_document() {
        let results = vec![
            result("a1", "doc1", 0.9),
            result("a2", "doc1", 0.8),
            result("a3", "doc1", 0.7),
            result("b1", "doc2", 0.85),
            result("b2", "doc2", 0.75),
            result("b3", "doc2", 0.65),
            result("c1", "doc3", 0.6),
        ];

        let diversified = diversify_results(results, 2);

        let mut per_doc: HashMap<Uuid, usize> = HashMap::new();
        for r in &diversified {
            *per_doc.entry(r.document_id).or_default() += 1;
        }
        assert!(per_doc.values().all(|&count| count <= 2));
        assert_eq!(diversified.len(), 5);
    }

    #[test]
    fn test_admission_follows_global_score_order() {
        // doc1's second-best chunk outscores doc2's best, so it is
        // admitted ahead of doc2 even though doc2 has spare capacity
        let results = vec![
            result("b1", "doc2", 0.5),
            result("a1", "doc1", 0.9),
            result("a2", "doc1", 0.8),
        ];

        let diversified = diversify_results(results, 1);

        assert_eq!(diversified.len(), 2);
        assert!((diversified[0].score - 0.9).abs() < 1e-6);
        assert!((diversified[1].score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_output_re_sorted_with_dense_ranks() {
        let results = vec![
            result("c1", "doc1", 0.4),
            result("c2", "doc2", 0.9),
            result("c3", "doc3", 0.6),
        ];

        let diversified = diversify_results(results, 2);

        let scores: Vec<f32> = diversified.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![0.9, 0.6, 0.4]);
        let ranks: Vec<usize> = diversified.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_input() {
        assert!(diversify_results(Vec::new(), 2).is_empty());
    }
}
