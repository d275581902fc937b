//! RAG (Retrieval-Augmented Generation) module
//!
//! End-to-end question answering over the document knowledge base:
//! - Hybrid retrieval through the search core
//! - Context assembly with numbered source markers under a token budget
//! - LLM answer generation from a grounded prompt
//! - Citation extraction against the retrieved sources
//! - Query logging for analytics
//!
//! # Examples
//!
//! ```rust,no_run
//! use documind::rag::{QaRequest, QaService};
//! use documind::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = QaService::new(&config).await?;
//!
//!     let response = service.query(QaRequest::new("What is the vacation policy?")).await?;
//!     println!("Answer: {}", response.answer);
//!     println!("Cited {}/{} sources", response.citations.cited_count, response.citations.total_sources);
//!
//!     Ok(())
//! }
//! ```

pub mod citations;
pub mod context;
pub mod pipeline;

pub use citations::extract_citations;
pub use citations::Citation;
pub use citations::CitationReport;
pub use context::ContextAssembler;
pub use pipeline::ModelAnswer;
pub use pipeline::ModelComparison;
pub use pipeline::ModelOutcome;
pub use pipeline::QaRequest;
pub use pipeline::QaResponse;
pub use pipeline::QaService;
pub use pipeline::SourceSummary;
