//! Production search entry point
//!
//! `SearchApi` ties the retrieval core together: mode selection, query
//! expansion, channel retrieval with oversampling, fusion, re-ranking,
//! diversification, truncation, and metrics recording.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;
use tracing::info;

use super::diversify::diversify_results;
use super::expansion::QueryExpander;
use super::hybrid::HybridSearcher;
use super::mode::select_mode;
use super::monitor::PerformanceMonitor;
use super::monitor::PerformanceReport;
use super::monitor::SearchMetrics;
use super::rerank::Reranker;
use super::SearchMode;
use super::SearchResult;
use crate::config::AppConfig;
use crate::database::Database;
use crate::embeddings::EmbeddingService;
use crate::errors::DocuMindError;
use crate::errors::Result;

/// Per-call search options
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Search mode; `Auto` selects per query
    pub mode: SearchMode,
    /// Maximum number of results to return
    pub top_k: usize,
    /// Whether to expand the query with synonyms
    pub expand_query: bool,
    /// Whether to cap per-document result counts
    pub diversify: bool,
    /// Maximum chunks per document when diversifying
    pub max_per_document: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            mode: SearchMode::Auto,
            top_k: 10,
            expand_query: false,
            diversify: true,
            max_per_document: 2,
        }
    }
}

/// Unified search API with monitoring
pub struct SearchApi {
    searcher: HybridSearcher,
    expander: QueryExpander,
    monitor: PerformanceMonitor,
}

impl SearchApi {
    /// Create a new search API from configuration
    ///
    /// # Errors
    /// - Database connection errors
    /// - Embedding service configuration errors
    /// - Invalid search weights or floors in the config
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let database = Arc::new(Database::from_config(config).await?);
        let embedding_service = Arc::new(EmbeddingService::new(config)?);
        Self::from_services(database, embedding_service, config)
    }

    /// Create from existing services
    pub fn from_services(
        database: Arc<Database>,
        embedding_service: Arc<EmbeddingService>,
        config: &AppConfig,
    ) -> Result<Self> {
        let searcher = HybridSearcher::new(database, embedding_service, &config.search)?;

        Ok(Self {
            searcher,
            expander: QueryExpander::new(),
            monitor: PerformanceMonitor::new(),
        })
    }

    /// Search documents with the given options
    ///
    /// Pipeline: mode selection → optional expansion → channel retrieval
    /// (oversampled at 2×top_k) → fusion → re-rank against the original
    /// query → optional diversification → truncation to top_k. Zero
    /// results is a success, not an error.
    pub async fn search(&self, query: &str, options: SearchOptions) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(DocuMindError::InvalidQuery(
                "Query cannot be empty".to_string(),
            ));
        }
        if options.top_k == 0 {
            return Err(DocuMindError::InvalidParameter(
                "top_k must be at least 1".to_string(),
            ));
        }

        let start = Instant::now();

        // Mode is selected from the raw query, before any expansion
        let mode = if options.mode == SearchMode::Auto {
            let selected = select_mode(query);
            debug!("Auto mode selection: {:?} -> {:?}", query, selected);
            selected
        } else {
            options.mode
        };

        let search_query = if options.expand_query {
            let expanded = self.expander.expand(query);
            if expanded != query {
                debug!("Expanded query: {}", expanded);
            }
            expanded
        } else {
            query.to_string()
        };

        // Oversample so re-ranking and diversification have candidates to
        // work with after truncation
        let candidate_count = options.top_k * 2;
        let candidates = match mode {
            SearchMode::Semantic => {
                self.searcher
                    .search_semantic(&search_query, candidate_count, None)
                    .await?
            }
            SearchMode::Keyword => {
                self.searcher
                    .search_keyword(&search_query, candidate_count)
                    .await?
            }
            SearchMode::Hybrid | SearchMode::Auto => {
                self.searcher
                    .search_hybrid(&search_query, candidate_count)
                    .await?
            }
        };

        // Boosts are computed against what the user actually typed
        let candidate_len = candidates.len();
        let mut results = Reranker::rerank(candidates, query, candidate_len);

        if options.diversify {
            results = diversify_results(results, options.max_per_document);
        }

        results.truncate(options.top_k);
        for (idx, result) in results.iter_mut().enumerate() {
            result.rank = idx + 1;
        }

        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
        let scores: Vec<f64> = results
            .iter()
            .map(|r| f64::from(r.effective_score()))
            .filter(|s| *s > 0.0)
            .collect();

        self.monitor.record(SearchMetrics {
            query: query.to_string(),
            mode,
            latency_ms,
            num_results: results.len(),
            avg_score: if scores.is_empty() {
                0.0
            } else {
                scores.iter().sum::<f64>() / scores.len() as f64
            },
            top_score: scores.iter().copied().fold(0.0, f64::max),
        });

        info!(
            "Search completed: mode={} results={} latency={:.1}ms",
            mode.as_str(),
            results.len(),
            latency_ms
        );

        Ok(results)
    }

    /// Generate the aggregated performance report
    #[must_use]
    pub fn performance_report(&self) -> PerformanceReport {
        self.monitor.report()
    }

    /// Clear the recorded query history
    pub fn clear_history(&self) {
        self.monitor.clear();
    }

    /// Access the underlying monitor
    #[must_use]
    pub const fn monitor(&self) -> &PerformanceMonitor {
        &self.monitor
    }

    /// Access the underlying searcher
    #[must_use]
    pub const fn searcher(&self) -> &HybridSearcher {
        &self.searcher
    }
}
