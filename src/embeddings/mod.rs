//! Embeddings generation module
//!
//! This module provides functionality for generating text embeddings using various providers:
//! - OpenAI (text-embedding-3-small, text-embedding-ada-002, etc.)
//! - Ollama (local models)
//! - Custom OpenAI-compatible endpoints
//!
//! # Examples
//!
//! ```rust,no_run
//! use documind::embeddings::EmbeddingService;
//! use documind::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = EmbeddingService::new(&config)?;
//!
//!     let embedding = service.generate("What is the vacation policy?").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod backfill;
pub mod client;
pub mod generator;

pub use backfill::backfill_embeddings;
pub use backfill::BackfillStats;
pub use client::EmbeddingClient;
pub use client::EmbeddingProvider;
pub use generator::EmbeddingService;

/// Default embedding dimension for OpenAI text-embedding-3-small
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Maximum batch size for embedding generation
pub const MAX_BATCH_SIZE: usize = 100;

/// Configuration for embedding generation
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub dimension: usize,
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl EmbeddingConfig {
    pub fn from_app_config(config: &crate::config::AppConfig) -> Self {
        // Ollama endpoints have no API key; everything else is treated as
        // an OpenAI-compatible embeddings API
        let provider = if config.embedding_api_key().is_none()
            && !config.embedding_endpoint().contains("api.openai.com")
        {
            EmbeddingProvider::Ollama
        } else {
            EmbeddingProvider::OpenAI
        };

        Self {
            provider,
            model: config.embedding_model().to_string(),
            dimension: config.embedding_dimension(),
            endpoint: config.embedding_endpoint().to_string(),
            api_key: config.embedding_api_key().map(ToString::to_string),
        }
    }
}
