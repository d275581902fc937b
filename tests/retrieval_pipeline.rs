//! Retrieval post-processing pipeline tests
//!
//! Exercises the chain fusion -> rerank -> diversify -> context assembly ->
//! citation extraction on constructed fixtures, without a database or any
//! network services.

use documind::rag::extract_citations;
use documind::rag::ContextAssembler;
use documind::search::diversify_results;
use documind::search::hybrid::fuse_channels;
use documind::search::Reranker;
use documind::search::SearchResult;
use documind::search::SearchType;
use serde_json::json;
use uuid::Uuid;

fn chunk(id: &str, doc: &str, index: i32, content: &str, score: f32, tag: SearchType) -> SearchResult {
    SearchResult {
        chunk_id: Uuid::new_v5(&Uuid::NAMESPACE_OID, id.as_bytes()),
        document_id: Uuid::new_v5(&Uuid::NAMESPACE_OID, doc.as_bytes()),
        document_title: doc.to_string(),
        chunk_index: index,
        content: content.to_string(),
        metadata: json!({}),
        score,
        rerank_score: None,
        search_type: tag,
        rank: 0,
    }
}

#[test]
fn fused_overlap_scores_add_across_channels() {
    // Semantic 0.9 and keyword 0.8 for the same chunk with weight 0.7:
    // 0.9 * 0.7 + 0.8 * 0.3 = 0.87
    let semantic = vec![chunk(
        "c1",
        "handbook",
        0,
        "vacation accrual details",
        0.9,
        SearchType::Semantic,
    )];
    let keyword = vec![chunk(
        "c1",
        "handbook",
        0,
        "vacation accrual details",
        0.8,
        SearchType::Keyword,
    )];

    let fused = fuse_channels(semantic, keyword, 0.7, 5);

    assert_eq!(fused.len(), 1);
    assert!((fused[0].score - 0.87).abs() < 1e-6);
    assert_eq!(fused[0].search_type, SearchType::Both);
}

#[test]
fn full_chain_preserves_invariants() {
    let semantic = vec![
        chunk("s1", "HR Policy", 0, "vacation days accrue monthly for staff", 0.92, SearchType::Semantic),
        chunk("s2", "HR Policy", 1, "carryover rules for unused vacation", 0.88, SearchType::Semantic),
        chunk("s3", "HR Policy", 4, "jury duty and bereavement leave", 0.80, SearchType::Semantic),
        chunk("s4", "Handbook", 2, "request vacation through the portal", 0.75, SearchType::Semantic),
        chunk("s5", "Security Guide", 0, "password rotation schedule", 0.55, SearchType::Semantic),
    ];
    let keyword = vec![
        chunk("s1", "HR Policy", 0, "vacation days accrue monthly for staff", 0.8, SearchType::Keyword),
        chunk("k1", "Benefits FAQ", 3, "vacation payout on departure", 0.8, SearchType::Keyword),
    ];

    let fused = fuse_channels(semantic, keyword, 0.7, 10);

    // Dedup: s1 appears once, tagged both
    let s1_id = Uuid::new_v5(&Uuid::NAMESPACE_OID, b"s1".as_slice());
    let s1_entries: Vec<_> = fused.iter().filter(|r| r.chunk_id == s1_id).collect();
    assert_eq!(s1_entries.len(), 1);
    assert_eq!(s1_entries[0].search_type, SearchType::Both);

    // Re-rank: every rerank score at least the fused score
    let fused_len = fused.len();
    let reranked = Reranker::rerank(fused, "vacation days", fused_len);
    for r in &reranked {
        assert!(r.rerank_score.unwrap() >= r.score);
    }

    // Diversify: at most 2 chunks per document
    let diversified = diversify_results(reranked, 2);
    let mut per_doc = std::collections::HashMap::new();
    for r in &diversified {
        *per_doc.entry(r.document_id).or_insert(0) += 1;
    }
    assert!(per_doc.values().all(|&c: &i32| c <= 2));

    // Ranks are dense and 1-based after every stage
    let ranks: Vec<usize> = diversified.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, (1..=diversified.len()).collect::<Vec<_>>());

    // Context: markers numbered in list order, budget respected
    let assembler = ContextAssembler::new(500);
    let context = assembler.assemble(&diversified);
    assert!(context.starts_with("[Source 1:"));
    assert!(context.len() <= 500 * 4 + 40);

    // Citations: an answer citing sources 1 and 2 resolves against the list
    let answer = "Per [Source 1], vacation accrues monthly. [Source 2] covers carryover.";
    let report = extract_citations(answer, &diversified);
    assert_eq!(report.cited_count, 2);
    assert_eq!(report.total_sources, diversified.len());
    assert_eq!(report.citations[0].document, diversified[0].document_title);
}

#[test]
fn diversify_drops_third_chunk_of_saturated_document() {
    let results = vec![
        chunk("c1", "doc1", 0, "a", 0.95, SearchType::Semantic),
        chunk("c2", "doc1", 1, "b", 0.90, SearchType::Semantic),
        chunk("c3", "doc1", 2, "c", 0.85, SearchType::Semantic),
        chunk("c4", "doc2", 0, "d", 0.80, SearchType::Semantic),
    ];

    let diversified = diversify_results(results, 2);

    let scores: Vec<f32> = diversified.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![0.95, 0.90, 0.80]);
}

#[test]
fn rerank_on_disjoint_query_is_order_preserving() {
    let results = vec![
        chunk("c1", "doc1", 0, "first content", 0.9, SearchType::Semantic),
        chunk("c2", "doc2", 0, "second content", 0.8, SearchType::Semantic),
        chunk("c3", "doc3", 0, "third content", 0.7, SearchType::Semantic),
    ];
    let before: Vec<Uuid> = results.iter().map(|r| r.chunk_id).collect();

    let reranked = Reranker::rerank(results, "zebra quasar", 3);
    let after: Vec<Uuid> = reranked.iter().map(|r| r.chunk_id).collect();

    assert_eq!(before, after);
}

#[test]
fn empty_retrieval_flows_through_to_empty_context() {
    let results: Vec<SearchResult> = Vec::new();

    let diversified = diversify_results(results, 2);
    assert!(diversified.is_empty());

    let context = ContextAssembler::default().assemble(&diversified);
    assert!(context.is_empty());

    let report = extract_citations("I don't have enough information.", &diversified);
    assert_eq!(report.total_sources, 0);
    assert_eq!(report.cited_count, 0);
}
