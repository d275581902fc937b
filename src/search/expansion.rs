//! Synonym-based query expansion
//!
//! Appends related terms for tokens found in a fixed synonym table. The
//! original query text is preserved verbatim; expansions improve recall
//! without rewriting what the user typed.

/// Common synonyms for query expansion, keyed by lowercase token
const SYNONYMS: &[(&str, &[&str])] = &[
    ("ai", &["artificial intelligence", "machine learning", "ml"]),
    ("ml", &["machine learning", "ai", "artificial intelligence"]),
    ("pto", &["paid time off", "vacation", "time off", "leave"]),
    ("vacation", &["pto", "paid time off", "time off", "holiday"]),
    ("sick", &["illness", "medical", "health"]),
    ("401k", &["retirement", "pension", "retirement plan"]),
    ("health", &["medical", "healthcare", "wellness"]),
    ("insurance", &["coverage", "benefits", "plan"]),
    ("salary", &["compensation", "pay", "wages"]),
    ("remote", &["work from home", "wfh", "telecommute"]),
    ("wfh", &["work from home", "remote", "telecommute"]),
    ("hr", &["human resources", "personnel"]),
    ("employee", &["staff", "worker", "team member"]),
    ("manager", &["supervisor", "lead", "boss"]),
    ("review", &["evaluation", "assessment", "appraisal"]),
    ("bonus", &["incentive", "reward", "commission"]),
];

/// Maximum synonyms appended per matching token, to avoid query explosion
const MAX_SYNONYMS_PER_TOKEN: usize = 2;

/// Expands queries against the fixed synonym table
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryExpander;

impl QueryExpander {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Expand a query with synonyms for known terms
    ///
    /// Tokens are lowercased and stripped of non-word characters before
    /// lookup, and processed in their original order. Returns the query
    /// unchanged when no token matches.
    #[must_use]
    pub fn expand(&self, query: &str) -> String {
        let mut expansions: Vec<&str> = Vec::new();

        for word in query.to_lowercase().split_whitespace() {
            let clean_word: String = word
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .collect();

            if let Some(entry) = SYNONYMS.iter().find(|entry| entry.0 == clean_word) {
                expansions.extend(entry.1.iter().take(MAX_SYNONYMS_PER_TOKEN).copied());
            }
        }

        if expansions.is_empty() {
            return query.to_string();
        }

        format!("{} {}", query, expansions.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_term_is_expanded() {
        let expander = QueryExpander::new();
        let expanded = expander.expand("vacation policy");
        assert_eq!(expanded, "vacation policy pto paid time off");
    }

    #[test]
    fn test_original_query_preserved_verbatim() {
        let expander = QueryExpander::new();
        let expanded = expander.expand("Remote Work");
        assert!(expanded.starts_with("Remote Work "));
        assert!(expanded.contains("work from home"));
    }

    #[test]
    fn test_unknown_terms_unchanged() {
        let expander = QueryExpander::new();
        assert_eq!(expander.expand("quarterly report"), "quarterly report");
    }

    #[test]
    fn test_punctuation_stripped_before_lookup() {
        let expander = QueryExpander::new();
        let expanded = expander.expand("401k?");
        assert_eq!(expanded, "401k? retirement pension");
    }

    #[test]
    fn test_at_most_two_synonyms_per_token() {
        let expander = QueryExpander::new();
        let expanded = expander.expand("pto");
        // "pto" has four dictionary entries; only the first two are used
        assert_eq!(expanded, "pto paid time off vacation");
    }

    #[test]
    fn test_tokens_expanded_in_original_order() {
        let expander = QueryExpander::new();
        let expanded = expander.expand("sick vacation");
        assert_eq!(expanded, "sick vacation illness medical pto paid time off");
    }
}
