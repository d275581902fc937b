//! Hybrid retrieval core
//!
//! This module contains the retrieval pipeline that sits between user
//! queries and the datastore:
//! - Heuristic search-mode selection (semantic / keyword / hybrid)
//! - Synonym-based query expansion
//! - Hybrid search with weighted-score fusion and deduplication
//! - Secondary re-ranking from keyword, phrase, and title signals
//! - Per-document result diversification
//! - Per-query performance metrics and aggregated reporting
//!
//! # Examples
//!
//! ```rust,no_run
//! use documind::search::{SearchApi, SearchOptions};
//! use documind::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let api = SearchApi::new(&config).await?;
//!
//!     let results = api
//!         .search("What is the vacation policy?", SearchOptions::default())
//!         .await?;
//!     for result in &results {
//!         println!("[{}] {:.4} {}", result.rank, result.score, result.document_title);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod diversify;
pub mod expansion;
pub mod hybrid;
pub mod mode;
pub mod monitor;
pub mod rerank;

pub use api::SearchApi;
pub use api::SearchOptions;
pub use diversify::diversify_results;
pub use expansion::QueryExpander;
pub use hybrid::HybridSearcher;
pub use mode::select_mode;
pub use monitor::PerformanceMonitor;
pub use monitor::PerformanceReport;
pub use monitor::SearchMetrics;
pub use rerank::Reranker;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Search mode for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Vector-similarity search over embeddings
    Semantic,
    /// Lexical full-text search
    Keyword,
    /// Fused semantic + keyword search
    Hybrid,
    /// Heuristic selection per query
    Auto,
}

impl SearchMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Semantic => "semantic",
            Self::Keyword => "keyword",
            Self::Hybrid => "hybrid",
            Self::Auto => "auto",
        }
    }
}

impl std::str::FromStr for SearchMode {
    type Err = crate::DocuMindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "semantic" => Ok(Self::Semantic),
            "keyword" => Ok(Self::Keyword),
            "hybrid" => Ok(Self::Hybrid),
            "auto" => Ok(Self::Auto),
            other => Err(crate::DocuMindError::InvalidParameter(format!(
                "Unknown search mode: {other}"
            ))),
        }
    }
}

/// Which retrieval channel produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// Vector similarity match
    Semantic,
    /// Text keyword match
    Keyword,
    /// Found by both channels
    Both,
}

/// A retrieved chunk with relevance scoring
///
/// `score` holds whatever the most recent pipeline stage assigned: raw
/// similarity after semantic search, a fixed placeholder after keyword
/// search, or the fused weighted score after hybrid merging.
/// `rerank_score` is set by the re-ranker and is never below `score`
/// (boosts are additive and non-negative). `rank` is 1-based and dense,
/// reassigned whenever the list is re-sorted or filtered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk_id: Uuid,
    pub document_id: Uuid,
    pub document_title: String,
    pub chunk_index: i32,
    pub content: String,
    pub metadata: serde_json::Value,
    pub score: f32,
    pub rerank_score: Option<f32>,
    pub search_type: SearchType,
    pub rank: usize,
}

impl SearchResult {
    /// The score the result is currently ordered by
    #[must_use]
    pub fn effective_score(&self) -> f32 {
        self.rerank_score.unwrap_or(self.score)
    }

    /// Build a result from a datastore hit
    #[must_use]
    pub fn from_hit(hit: crate::models::ChunkHit, score: f32, search_type: SearchType) -> Self {
        Self {
            chunk_id: hit.chunk_id,
            document_id: hit.document_id,
            document_title: hit.document_title,
            chunk_index: hit.chunk_index,
            content: hit.content,
            metadata: hit.metadata,
            score,
            rerank_score: None,
            search_type,
            rank: 0,
        }
    }
}

/// Sort by effective score descending and reassign dense 1-based ranks
pub(crate) fn sort_and_rank(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        b.effective_score()
            .partial_cmp(&a.effective_score())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (idx, result) in results.iter_mut().enumerate() {
        result.rank = idx + 1;
    }
}
