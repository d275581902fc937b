//! Context assembly from retrieved chunks
//!
//! Packs rank-ordered chunks into one bounded text block for the LLM.
//! Each chunk is prefixed with a numbered source marker that the citation
//! extractor later matches against the generated answer.

use crate::search::SearchResult;

/// Separator between context entries
const DIVIDER: &str = "\n---\n";

/// Separator overhead counted against the budget per chunk
const SEPARATOR_OVERHEAD: usize = 4;

/// Slack reserved after the header when truncating the final chunk
const TRUNCATION_SLACK: usize = 10;

/// A truncated tail is only included if this many characters still fit
const MIN_TRUNCATED_CONTENT: usize = 100;

/// Assembler for creating LLM context from search results
pub struct ContextAssembler {
    max_tokens: usize,
}

impl ContextAssembler {
    /// Create an assembler with a token budget (1 token ~ 4 characters)
    #[must_use]
    pub const fn new(max_tokens: usize) -> Self {
        Self { max_tokens }
    }

    /// Assemble context from rank-ordered results
    ///
    /// Chunks are taken in input order and accumulated until the character
    /// budget would be exceeded. The chunk that overflows is included in
    /// truncated form if enough budget remains for meaningful content;
    /// nothing after it is added. Deterministic for a given input and
    /// budget.
    #[must_use]
    pub fn assemble(&self, results: &[SearchResult]) -> String {
        if results.is_empty() {
            return String::new();
        }

        let max_chars = self.max_tokens * 4;
        let mut parts: Vec<String> = Vec::new();
        let mut current_chars = 0;

        for (i, result) in results.iter().enumerate() {
            let source_header = format!(
                "[Source {}: {}, chunk {}]",
                i + 1,
                result.document_title,
                result.chunk_index
            );
            let entry = format!("{}\n{}", source_header, result.content);

            let entry_length = entry.len() + SEPARATOR_OVERHEAD;
            if current_chars + entry_length > max_chars {
                // Try to fit a truncated version of this chunk, then stop
                let remaining = max_chars
                    .saturating_sub(current_chars)
                    .saturating_sub(source_header.len())
                    .saturating_sub(TRUNCATION_SLACK);
                if remaining > MIN_TRUNCATED_CONTENT {
                    let truncated = truncate_chars(&result.content, remaining);
                    parts.push(format!("{source_header}\n{truncated}..."));
                }
                break;
            }

            parts.push(entry);
            current_chars += entry_length;
        }

        parts.join(DIVIDER)
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(3000) // Default token budget for context
    }
}

/// Truncate at a character boundary (not byte boundary)
fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchType;
    use serde_json::json;
    use uuid::Uuid;

    fn result(doc: &str, chunk_index: i32, content: &str) -> SearchResult {
        SearchResult {
            chunk_id: Uuid::new_v4(),
            document_id: Uuid::new_v5(&Uuid::NAMESPACE_OID, doc.as_bytes()),
            document_title: doc.to_string(),
            chunk_index,
            content: content.to_string(),
            metadata: json!({}),
            score: 0.9,
            rerank_score: None,
            search_type: SearchType::Semantic,
            rank: 1,
        }
    }

    #[test]
    fn test_source_markers_and_divider() {
        let assembler = ContextAssembler::new(1000);
        let results = vec![
            result("HR Policy", 0, "Vacation accrues monthly."),
            result("Handbook", 3, "Submit requests two weeks ahead."),
        ];

        let context = assembler.assemble(&results);

        assert!(context.starts_with("[Source 1: HR Policy, chunk 0]\n"));
        assert!(context.contains("\n---\n[Source 2: Handbook, chunk 3]\n"));
        assert!(context.contains("Submit requests two weeks ahead."));
    }

    #[test]
    fn test_budget_never_exceeded() {
        let assembler = ContextAssembler::new(100); // 400 chars
        let results: Vec<SearchResult> = (0..10)
            .map(|i| result("Doc", i, &"word ".repeat(40)))
            .collect();

        let context = assembler.assemble(&results);

        // Budget plus the small header/ellipsis overhead of the truncated tail
        assert!(context.len() <= 100 * 4 + 40);
    }

    #[test]
    fn test_stops_after_first_overflowing_chunk() {
        // ~230 chars per entry; budget of 150 tokens = 600 chars fits two
        // full chunks, the third is truncated or dropped, and nothing
        // after it appears
        let assembler = ContextAssembler::new(150);
        let results: Vec<SearchResult> = (0..5)
            .map(|i| result("Doc", i, &"x".repeat(200)))
            .collect();

        let context = assembler.assemble(&results);

        assert!(context.contains("[Source 1:"));
        assert!(context.contains("[Source 2:"));
        assert!(!context.contains("[Source 4:"));
        assert!(!context.contains("[Source 5:"));
    }

    #[test]
    fn test_truncated_tail_requires_usable_budget() {
        // After two full entries almost nothing remains, so the third
        // chunk is dropped instead of appearing as a stub
        let assembler = ContextAssembler::new(115);
        let results: Vec<SearchResult> = (0..3)
            .map(|i| result("Doc", i, &"x".repeat(190)))
            .collect();

        let context = assembler.assemble(&results);

        assert!(context.contains("[Source 2:"));
        assert!(!context.contains("[Source 3:"));
    }

    #[test]
    fn test_truncated_tail_marked_with_ellipsis() {
        let assembler = ContextAssembler::new(100);
        let results = vec![
            result("Doc", 0, &"a".repeat(200)),
            result("Doc", 1, &"b".repeat(300)),
        ];

        let context = assembler.assemble(&results);

        assert!(context.contains("[Source 2:"));
        assert!(context.ends_with("..."));
    }

    #[test]
    fn test_empty_results_give_empty_context() {
        let assembler = ContextAssembler::default();
        assert_eq!(assembler.assemble(&[]), "");
    }

    #[test]
    fn test_multibyte_content_truncates_safely() {
        let assembler = ContextAssembler::new(60);
        let results = vec![
            result("Doc", 0, &"é".repeat(120)),
            result("Doc", 1, &"日本語テキスト".repeat(40)),
        ];

        // Must not panic on a non-char boundary
        let context = assembler.assemble(&results);
        assert!(context.contains("[Source 1:"));
    }

    #[test]
    fn test_deterministic_output() {
        let assembler = ContextAssembler::new(200);
        let results: Vec<SearchResult> = (0..4)
            .map(|i| result("Doc", i, &format!("content {i} ").repeat(20)))
            .collect();

        assert_eq!(assembler.assemble(&results), assembler.assemble(&results));
    }
}
