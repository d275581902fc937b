use pgvector::Vector;
use uuid::Uuid;

use super::Database;
use crate::models::ChunkHit;
use crate::models::DocumentChunk;
use crate::models::PendingChunk;
use crate::Result;

/// Outcome of a full-text search against the chunk store
///
/// Full-text failure is not an error for callers: the hybrid searcher
/// branches on this kind and degrades to substring matching instead of
/// failing the whole query.
#[derive(Debug, Clone)]
pub enum FulltextSearch {
    /// Query parsed and executed; may be empty
    Matched(Vec<ChunkHit>),
    /// The ts_query derived from the user query was rejected by the backend
    UnsupportedQuery,
    /// The backend failed for reasons unrelated to query syntax
    BackendError(String),
}

const HIT_COLUMNS: &str = r"
    c.id AS chunk_id,
    c.document_id,
    d.title AS document_title,
    c.chunk_index,
    c.content,
    c.metadata
";

impl Database {
    /// Insert a chunk row, optionally with its embedding
    pub async fn insert_chunk(
        &self,
        chunk: &DocumentChunk,
        embedding: Option<Vec<f32>>,
    ) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO document_chunks (id, document_id, chunk_index, content, metadata, embedding)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(chunk.id)
        .bind(chunk.document_id)
        .bind(chunk.chunk_index)
        .bind(&chunk.content)
        .bind(&chunk.metadata)
        .bind(embedding.map(Vector::from))
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Vector-similarity top-k search with a similarity floor
    ///
    /// Similarity is cosine: `1 - (embedding <=> query)`. Chunks without
    /// an embedding are skipped; the backfill job picks them up later.
    pub async fn vector_search_chunks(
        &self,
        query_embedding: Vec<f32>,
        limit: i64,
        similarity_floor: f32,
    ) -> Result<Vec<ChunkHit>> {
        let query_vector = Vector::from(query_embedding);

        let hits = sqlx::query_as::<_, ChunkHit>(&format!(
            r"
            SELECT {HIT_COLUMNS},
                (1 - (c.embedding <=> $1))::float4 AS similarity
            FROM document_chunks c
            JOIN documents d ON d.id = c.document_id
            WHERE c.embedding IS NOT NULL
                AND (1 - (c.embedding <=> $1)) >= $2
            ORDER BY c.embedding <=> $1
            LIMIT $3
            ",
        ))
        .bind(&query_vector)
        .bind(similarity_floor)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(hits)
    }

    /// Full-text search over chunk content
    ///
    /// The user query is turned into an AND-joined ts_query. Returns an
    /// explicit outcome rather than an error so the caller can degrade to
    /// substring matching.
    pub async fn fulltext_search_chunks(&self, query: &str, limit: i64) -> FulltextSearch {
        let ts_query = query
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" & ");

        let result = sqlx::query_as::<_, ChunkHit>(&format!(
            r"
            SELECT {HIT_COLUMNS},
                NULL::float4 AS similarity
            FROM document_chunks c
            JOIN documents d ON d.id = c.document_id
            WHERE to_tsvector('english', c.content) @@ to_tsquery('english', $1)
            ORDER BY ts_rank(to_tsvector('english', c.content), to_tsquery('english', $1)) DESC
            LIMIT $2
            ",
        ))
        .bind(&ts_query)
        .bind(limit)
        .fetch_all(self.pool())
        .await;

        match result {
            Ok(hits) => FulltextSearch::Matched(hits),
            Err(sqlx::Error::Database(db_err)) => {
                // 42601: syntax error - the derived ts_query was unparseable
                if db_err.code().as_deref() == Some("42601") {
                    tracing::debug!("Full-text query rejected: {}", db_err);
                    FulltextSearch::UnsupportedQuery
                } else {
                    tracing::debug!("Full-text search backend error: {}", db_err);
                    FulltextSearch::BackendError(db_err.to_string())
                }
            }
            Err(e) => {
                tracing::debug!("Full-text search failed: {}", e);
                FulltextSearch::BackendError(e.to_string())
            }
        }
    }

    /// Substring search over chunk content, the degraded keyword path
    pub async fn substring_search_chunks(&self, query: &str, limit: i64) -> Result<Vec<ChunkHit>> {
        let hits = sqlx::query_as::<_, ChunkHit>(&format!(
            r"
            SELECT {HIT_COLUMNS},
                NULL::float4 AS similarity
            FROM document_chunks c
            JOIN documents d ON d.id = c.document_id
            WHERE c.content ILIKE $1
            LIMIT $2
            ",
        ))
        .bind(format!("%{query}%"))
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(hits)
    }

    /// Chunks that still need an embedding, oldest first
    pub async fn chunks_missing_embeddings(&self, limit: i64) -> Result<Vec<PendingChunk>> {
        let chunks = sqlx::query_as::<_, PendingChunk>(
            r"
            SELECT id, content
            FROM document_chunks
            WHERE embedding IS NULL
            ORDER BY created_at
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(chunks)
    }

    /// Store the embedding for a chunk
    pub async fn set_chunk_embedding(&self, chunk_id: Uuid, embedding: Vec<f32>) -> Result<()> {
        sqlx::query("UPDATE document_chunks SET embedding = $1 WHERE id = $2")
            .bind(Vector::from(embedding))
            .bind(chunk_id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Count chunks belonging to a document
    pub async fn count_document_chunks(&self, document_id: Uuid) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM document_chunks WHERE document_id = $1")
                .bind(document_id)
                .fetch_one(self.pool())
                .await?;

        Ok(count)
    }
}
