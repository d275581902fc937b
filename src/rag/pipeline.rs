//! Complete RAG pipeline: Retrieve -> Rank -> Generate -> Cite -> Log

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::debug;
use tracing::info;
use tracing::warn;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::database::Database;
use crate::embeddings::EmbeddingService;
use crate::errors::Result;
use crate::llm::build_qa_prompt;
use crate::llm::LlmService;
use crate::rag::citations::extract_citations;
use crate::rag::citations::CitationReport;
use crate::rag::context::ContextAssembler;
use crate::search::SearchApi;
use crate::search::SearchMode;
use crate::search::SearchOptions;
use crate::search::SearchResult;

/// Length of source previews in responses
const PREVIEW_CHARS: usize = 200;

/// Complete question-answering service
pub struct QaService {
    search: SearchApi,
    llm: LlmService,
    assembler: ContextAssembler,
    database: Arc<Database>,
}

impl QaService {
    /// Create a new QA service
    ///
    /// # Errors
    /// - Database connection errors
    /// - Embedding service configuration errors (invalid endpoints, keys)
    /// - LLM service configuration errors
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let database = Arc::new(Database::from_config(config).await?);
        let embedding_service = Arc::new(EmbeddingService::new(config)?);
        let search = SearchApi::from_services(database.clone(), embedding_service, config)?;
        let llm = LlmService::new(config)?;
        let assembler = ContextAssembler::new(config.context_max_tokens());

        Ok(Self {
            search,
            llm,
            assembler,
            database,
        })
    }

    /// Create from existing services
    pub fn from_services(
        search: SearchApi,
        llm: LlmService,
        assembler: ContextAssembler,
        database: Arc<Database>,
    ) -> Self {
        Self {
            search,
            llm,
            assembler,
            database,
        }
    }

    /// Perform a complete RAG query
    ///
    /// # Errors
    /// - Document retrieval errors (embedding generation, database queries)
    /// - LLM generation errors (API failures, rate limits)
    /// - Invalid query parameters (empty question, zero top_k)
    ///
    /// Zero retrieved chunks is not an error: generation proceeds with an
    /// empty context and the prompt instructs the model to say it lacks
    /// information. Query-log failures never abort the query.
    pub async fn query(&self, request: QaRequest) -> Result<QaResponse> {
        info!("Processing QA query: {}", request.question);
        let start = Instant::now();

        // Step 1: Retrieve relevant chunks
        debug!("Step 1: Retrieving documents");
        let results = self
            .search
            .search(
                &request.question,
                SearchOptions {
                    mode: request.mode,
                    top_k: request.top_k,
                    expand_query: request.expand_query,
                    diversify: request.diversify,
                    max_per_document: request.max_per_document,
                },
            )
            .await?;

        debug!("Retrieved {} chunks", results.len());

        // Step 2: Assemble context
        debug!("Step 2: Assembling context");
        let context = self.assembler.assemble(&results);

        // Step 3: Generate answer
        debug!("Step 3: Generating answer");
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.llm.model().to_string());
        let prompt = build_qa_prompt(&request.question, &context);
        let answer = self
            .llm
            .generate_for_model(&model, &prompt, request.temperature, request.max_tokens)
            .await?;

        // Step 4: Extract citations
        debug!("Step 4: Extracting citations");
        let citations = extract_citations(&answer, &results);

        let sources: Vec<SourceSummary> = results.iter().map(SourceSummary::from_result).collect();
        let response_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        // Step 5: Log for analytics; never abort the query path
        if let Err(e) = self
            .log_query(&request.question, &answer, &model, &sources, response_time_ms)
            .await
        {
            warn!("Failed to log query: {}", e);
        }

        info!("QA query completed in {:.0}ms", response_time_ms);

        Ok(QaResponse {
            answer,
            citations,
            sources,
            query: request.question,
            model,
            context_chunks: results.len(),
            response_time_ms,
        })
    }

    /// Compare answers from multiple models over the same retrieved context
    ///
    /// Retrieval happens once; each model gets the identical prompt.
    /// Per-model failures are captured in the comparison rather than
    /// failing the whole call.
    pub async fn compare_models(
        &self,
        question: &str,
        models: &[String],
    ) -> Result<ModelComparison> {
        let results = self
            .search
            .search(question, SearchOptions::default())
            .await?;
        let context = self.assembler.assemble(&results);
        let prompt = build_qa_prompt(question, &context);
        let sources: Vec<SourceSummary> = results.iter().map(SourceSummary::from_result).collect();

        let mut answers = Vec::with_capacity(models.len());
        for model in models {
            let start = Instant::now();
            let outcome = match self.llm.generate_for_model(model, &prompt, 0.1, 500).await {
                Ok(answer) => ModelOutcome::Success {
                    answer,
                    response_time_ms: start.elapsed().as_secs_f64() * 1000.0,
                },
                Err(e) => ModelOutcome::Error {
                    message: e.to_string(),
                },
            };
            answers.push(ModelAnswer {
                model: model.clone(),
                outcome,
            });
        }

        Ok(ModelComparison {
            query: question.to_string(),
            sources,
            context_chunks: results.len(),
            results: answers,
        })
    }

    /// Aggregated retrieval performance report for this service instance
    #[must_use]
    pub fn performance_report(&self) -> crate::search::PerformanceReport {
        self.search.performance_report()
    }

    /// Access the search API
    #[must_use]
    pub const fn search_api(&self) -> &SearchApi {
        &self.search
    }

    async fn log_query(
        &self,
        question: &str,
        answer: &str,
        model: &str,
        sources: &[SourceSummary],
        response_time_ms: f64,
    ) -> Result<()> {
        let sources_json = serde_json::to_value(sources)?;
        self.database
            .insert_query_log(question, answer, model, &sources_json, response_time_ms)
            .await
    }
}

/// QA query configuration
#[derive(Debug, Clone)]
pub struct QaRequest {
    pub question: String,
    pub mode: SearchMode,
    pub top_k: usize,
    pub temperature: f32,
    pub max_tokens: usize,
    pub expand_query: bool,
    pub diversify: bool,
    pub max_per_document: usize,
    /// Model override; defaults to the configured model
    pub model: Option<String>,
}

impl QaRequest {
    #[must_use]
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            mode: SearchMode::Auto,
            top_k: 5,
            temperature: 0.1,
            max_tokens: 500,
            expand_query: false,
            diversify: true,
            max_per_document: 2,
            model: None,
        }
    }
}

/// A retrieved source summarized for responses and logs
#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub id: Uuid,
    pub document: String,
    pub chunk_index: i32,
    pub score: f32,
    pub rerank_score: Option<f32>,
    pub preview: String,
}

impl SourceSummary {
    fn from_result(result: &SearchResult) -> Self {
        let preview: String = if result.content.chars().count() > PREVIEW_CHARS {
            let truncated: String = result.content.chars().take(PREVIEW_CHARS).collect();
            format!("{truncated}...")
        } else {
            result.content.clone()
        };

        Self {
            id: result.chunk_id,
            document: result.document_title.clone(),
            chunk_index: result.chunk_index,
            score: result.score,
            rerank_score: result.rerank_score,
            preview,
        }
    }
}

/// QA response
#[derive(Debug, Clone, Serialize)]
pub struct QaResponse {
    pub answer: String,
    pub citations: CitationReport,
    pub sources: Vec<SourceSummary>,
    pub query: String,
    pub model: String,
    pub context_chunks: usize,
    pub response_time_ms: f64,
}

impl QaResponse {
    /// Get a formatted string representation
    #[must_use]
    pub fn format(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Query: {}\n\n", self.query));
        output.push_str(&format!("Answer:\n{}\n\n", self.answer));
        output.push_str(&format!("Sources ({} chunks):\n", self.sources.len()));

        for (idx, source) in self.sources.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} (chunk {}, score: {:.4})\n",
                idx + 1,
                source.document,
                source.chunk_index,
                source.rerank_score.unwrap_or(source.score)
            ));
        }

        if !self.citations.citations.is_empty() {
            output.push_str("\nCitations:\n");
            for cite in &self.citations.citations {
                output.push_str(&format!("  [{}] {}\n", cite.citation_id, cite.document));
            }
        }

        output
    }
}

/// Outcome of one model in a comparison
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ModelOutcome {
    Success {
        answer: String,
        response_time_ms: f64,
    },
    Error {
        message: String,
    },
}

/// One model's entry in a comparison
#[derive(Debug, Clone, Serialize)]
pub struct ModelAnswer {
    pub model: String,
    #[serde(flatten)]
    pub outcome: ModelOutcome,
}

/// Side-by-side model comparison over identical context
#[derive(Debug, Clone, Serialize)]
pub struct ModelComparison {
    pub query: String,
    pub sources: Vec<SourceSummary>,
    pub context_chunks: usize,
    pub results: Vec<ModelAnswer>,
}
