//! Citation extraction from generated answers
//!
//! Scans an answer for the `[Source N]` markers the prompt instructs the
//! model to emit and cross-references them against the source list used to
//! build the context. Only marker presence is checked; answer correctness
//! is not validated here.

use serde::Serialize;

use crate::search::SearchResult;

/// One resolved citation in a generated answer
#[derive(Debug, Clone, Serialize)]
pub struct Citation {
    /// 1-based index matching the `[Source N]` marker
    pub citation_id: usize,
    pub document: String,
    pub chunk_index: i32,
    pub score: f32,
}

/// Citations found in an answer, with coverage counts
#[derive(Debug, Clone, Serialize)]
pub struct CitationReport {
    pub citations: Vec<Citation>,
    pub total_sources: usize,
    pub cited_count: usize,
}

/// Extract `[Source N]` citations from an answer
///
/// `sources` must be the same ordered list the context was assembled
/// from, so marker numbers line up. The cited set may be a strict subset
/// of the retrieved sources; an answer with no markers yields an empty
/// report.
#[must_use]
pub fn extract_citations(answer: &str, sources: &[SearchResult]) -> CitationReport {
    let mut citations = Vec::new();

    for (i, source) in sources.iter().enumerate() {
        let marker = format!("[Source {}]", i + 1);
        if answer.contains(&marker) {
            citations.push(Citation {
                citation_id: i + 1,
                document: source.document_title.clone(),
                chunk_index: source.chunk_index,
                score: source.effective_score(),
            });
        }
    }

    let cited_count = citations.len();
    CitationReport {
        citations,
        total_sources: sources.len(),
        cited_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchType;
    use serde_json::json;
    use uuid::Uuid;

    fn source(doc: &str, chunk_index: i32, score: f32) -> SearchResult {
        SearchResult {
            chunk_id: Uuid::new_v4(),
            document_id: Uuid::new_v5(&Uuid::NAMESPACE_OID, doc.as_bytes()),
            document_title: doc.to_string(),
            chunk_index,
            content: "chunk body".to_string(),
            metadata: json!({}),
            score,
            rerank_score: None,
            search_type: SearchType::Semantic,
            rank: 1,
        }
    }

    #[test]
    fn test_extracts_cited_subset() {
        let sources = vec![
            source("HR Policy", 0, 0.9),
            source("Handbook", 2, 0.8),
            source("Security Guide", 1, 0.7),
        ];
        let answer =
            "According to [Source 1], vacation accrues monthly. [Source 3] covers passwords.";

        let report = extract_citations(answer, &sources);

        assert_eq!(report.total_sources, 3);
        assert_eq!(report.cited_count, 2);
        assert_eq!(report.citations[0].citation_id, 1);
        assert_eq!(report.citations[0].document, "HR Policy");
        assert_eq!(report.citations[1].citation_id, 3);
        assert_eq!(report.citations[1].chunk_index, 1);
    }

    #[test]
    fn test_no_markers_yields_empty_report() {
        let sources = vec![source("HR Policy", 0, 0.9)];
        let answer = "I don't have enough information to answer that question.";

        let report = extract_citations(answer, &sources);

        assert!(report.citations.is_empty());
        assert_eq!(report.cited_count, 0);
        assert_eq!(report.total_sources, 1);
    }

    #[test]
    fn test_repeated_marker_counted_once() {
        let sources = vec![source("HR Policy", 0, 0.9)];
        let answer = "[Source 1] says X. Again, [Source 1] says Y.";

        let report = extract_citations(answer, &sources);
        assert_eq!(report.cited_count, 1);
    }

    #[test]
    fn test_out_of_range_markers_ignored() {
        let sources = vec![source("HR Policy", 0, 0.9)];
        let answer = "See [Source 1] and [Source 7].";

        let report = extract_citations(answer, &sources);
        assert_eq!(report.cited_count, 1);
        assert_eq!(report.citations[0].citation_id, 1);
    }

    #[test]
    fn test_rerank_score_preferred_when_present() {
        let mut s = source("HR Policy", 0, 0.8);
        s.rerank_score = Some(0.95);
        let report = extract_citations("[Source 1]", &[s]);
        assert!((report.citations[0].score - 0.95).abs() < 1e-6);
    }
}
