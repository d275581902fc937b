//! Embedding generation service with batch processing

use std::sync::Arc;

use super::client::EmbeddingClient;
use super::EmbeddingConfig;
use super::MAX_BATCH_SIZE;
use crate::errors::DocuMindError;
use crate::errors::Result;

/// Service for generating embeddings
pub struct EmbeddingService {
    client: Arc<EmbeddingClient>,
    config: EmbeddingConfig,
}

impl EmbeddingService {
    /// Create a new embedding service
    pub fn new(config: &crate::config::AppConfig) -> Result<Self> {
        let embedding_config = EmbeddingConfig::from_app_config(config);
        Self::from_config(embedding_config)
    }

    /// Create from custom config
    pub fn from_config(config: EmbeddingConfig) -> Result<Self> {
        let client = EmbeddingClient::new(
            config.provider,
            config.model.clone(),
            config.endpoint.clone(),
            config.api_key.clone(),
        )?;

        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    /// Expected embedding dimension
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.config.dimension
    }

    /// Generate embedding for a single text
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = self.client.generate(text).await?;

        if embedding.len() != self.config.dimension {
            return Err(DocuMindError::Embedding(format!(
                "Expected {} dimensions, provider returned {}",
                self.config.dimension,
                embedding.len()
            )));
        }

        Ok(embedding)
    }

    /// Generate embeddings for multiple texts in batch
    ///
    /// Large inputs are split into provider-sized batches; output order
    /// matches input order.
    pub async fn generate_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(MAX_BATCH_SIZE) {
            let chunk_embeddings = self.client.generate_batch(chunk.to_vec()).await?;
            all_embeddings.extend(chunk_embeddings);
        }

        Ok(all_embeddings)
    }
}
