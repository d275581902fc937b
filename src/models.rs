use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A source document registered in the knowledge base
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub source_path: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// A chunk of document text, the unit of retrieval
///
/// `chunk_index` is the position within the owning document and is unique
/// per document. The embedding column is populated at ingestion time or
/// later by the backfill job; it is never rewritten once set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: Uuid,
    pub document_id: Uuid,
    pub chunk_index: i32,
    pub content: String,
    pub metadata: serde_json::Value,
}

/// Create document request
#[derive(Debug, Clone)]
pub struct CreateDocumentRequest {
    pub title: String,
    pub source_path: Option<String>,
    pub metadata: serde_json::Value,
}

/// A chunk row returned by datastore search operations
///
/// `similarity` is populated by vector search and left empty by the
/// keyword paths; the search layer assigns placeholder confidence to
/// keyword matches.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChunkHit {
    pub chunk_id: Uuid,
    pub document_id: Uuid,
    pub document_title: String,
    pub chunk_index: i32,
    pub content: String,
    pub metadata: serde_json::Value,
    pub similarity: Option<f32>,
}

/// A chunk still waiting for its embedding
#[derive(Debug, Clone, FromRow)]
pub struct PendingChunk {
    pub id: Uuid,
    pub content: String,
}

/// One logged question/answer exchange, persisted for analytics
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QueryLog {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub model: String,
    pub sources: serde_json::Value,
    pub response_time_ms: f64,
    pub created_at: DateTime<Utc>,
}

/// Aggregated query-log analytics over a trailing window
#[derive(Debug, Clone, Serialize)]
pub struct QueryAnalytics {
    pub period_days: i64,
    pub total_queries: usize,
    pub avg_response_time_ms: f64,
    pub queries_per_day: f64,
    pub model_usage: Vec<ModelUsage>,
    pub top_documents: Vec<DocumentUsage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelUsage {
    pub model: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentUsage {
    pub document: String,
    pub count: usize,
}

/// Knowledge-base counters for the stats command
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeBaseStats {
    pub document_count: i64,
    pub chunk_count: i64,
    pub embedded_chunk_count: i64,
    pub query_log_count: i64,
}
