//! Heuristic search-mode selection
//!
//! Classifies a raw query as semantic, keyword, or hybrid using ordered
//! rules. No learned components; the same query always selects the same
//! mode.

use std::sync::OnceLock;

use regex::Regex;

use super::SearchMode;

/// Patterns that indicate keyword search is better
const KEYWORD_PATTERNS: &[&str] = &[
    r"[A-Z]{2,}",        // Acronyms like PTO, HR, API
    r"\d+",              // Numbers like 401k, 2024
    r#""[^"]+""#,        // Quoted phrases
    r"'[^']+'",          // Single-quoted phrases
    r"[A-Z][a-z]+[A-Z]", // CamelCase terms
    r"\b[A-Z][A-Z0-9_]+\b", // Constants like MAX_VALUE
];

/// Question words that indicate conceptual intent
const QUESTION_WORDS: &[&str] = &[
    "what", "how", "why", "when", "where", "who", "which", "explain", "describe",
];

fn keyword_patterns() -> &'static Vec<Regex> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        KEYWORD_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("keyword pattern must compile"))
            .collect()
    })
}

/// Count keyword-pattern matches across the fixed pattern set
///
/// Matches are counted per pattern and summed; a token may match several
/// patterns at once.
fn keyword_pattern_score(query: &str) -> usize {
    keyword_patterns()
        .iter()
        .map(|pattern| pattern.find_iter(query).count())
        .sum()
}

/// Select the best search mode for a query
///
/// Rules are evaluated in order, first match wins:
/// 1. Quote characters signal exact-phrase intent: keyword
/// 2. Short queries (≤ 2 tokens) with any keyword pattern: keyword
/// 3. Two or more keyword-pattern matches: keyword
/// 4. Starts with a question word: semantic
/// 5. Long natural-language queries (≥ 6 tokens): semantic
/// 6. Everything else: hybrid
#[must_use]
pub fn select_mode(query: &str) -> SearchMode {
    // Quoted phrases need exact matching
    if query.contains('"') || query.contains('\'') {
        return SearchMode::Keyword;
    }

    let keyword_score = keyword_pattern_score(query);
    let words: Vec<&str> = query.split_whitespace().collect();

    // Short queries with specific terms favor keyword
    if words.len() <= 2 && keyword_score > 0 {
        return SearchMode::Keyword;
    }

    // High keyword pattern density suggests keyword search
    if keyword_score >= 2 {
        return SearchMode::Keyword;
    }

    // Question-like queries favor semantic
    let lowered = query.to_lowercase();
    if QUESTION_WORDS.iter().any(|qw| lowered.starts_with(qw)) {
        return SearchMode::Semantic;
    }

    // Long, natural language queries favor semantic
    if words.len() >= 6 {
        return SearchMode::Semantic;
    }

    // Default to hybrid for balanced queries
    SearchMode::Hybrid
}
