//! Backfill embeddings for chunks ingested without them

use std::sync::Arc;

use tracing::info;
use tracing::warn;

use super::generator::EmbeddingService;
use crate::database::Database;
use crate::errors::Result;

/// Backfill statistics
#[derive(Debug, Default, Clone)]
pub struct BackfillStats {
    pub total_chunks: usize,
    pub updated: usize,
    pub failed: usize,
}

/// Generate and store embeddings for all chunks that don't have them
///
/// Chunks are fetched and embedded in batches so a large backlog doesn't
/// hold one giant transaction or one giant embedding request.
pub async fn backfill_embeddings(
    db: Arc<Database>,
    embedding_service: Arc<EmbeddingService>,
    batch_size: usize,
) -> Result<BackfillStats> {
    info!("Starting embeddings backfill");

    let mut stats = BackfillStats::default();

    loop {
        let pending = db.chunks_missing_embeddings(batch_size as i64).await?;
        if pending.is_empty() {
            break;
        }

        stats.total_chunks += pending.len();
        info!("Embedding batch of {} chunks", pending.len());

        let texts: Vec<&str> = pending.iter().map(|c| c.content.as_str()).collect();
        let embeddings = match embedding_service.generate_batch(texts).await {
            Ok(embeddings) => embeddings,
            Err(e) => {
                // A failed batch leaves its chunks NULL; the next run retries them
                warn!("Embedding batch failed: {}", e);
                stats.failed += pending.len();
                return Ok(stats);
            }
        };

        let mut updated_this_batch = 0;
        for (chunk, embedding) in pending.iter().zip(embeddings) {
            match db.set_chunk_embedding(chunk.id, embedding).await {
                Ok(()) => {
                    stats.updated += 1;
                    updated_this_batch += 1;
                }
                Err(e) => {
                    warn!("Failed to store embedding for chunk {}: {}", chunk.id, e);
                    stats.failed += 1;
                }
            }
        }

        // Nothing stored means the same chunks would come straight back
        if updated_this_batch == 0 {
            warn!("No embeddings stored in this batch, stopping backfill");
            break;
        }

        // Short batch means the backlog is drained
        if pending.len() < batch_size {
            break;
        }
    }

    info!(
        "Backfill complete: {} updated, {} failed",
        stats.updated, stats.failed
    );

    Ok(stats)
}
