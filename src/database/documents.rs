use uuid::Uuid;

use super::Database;
use crate::models::CreateDocumentRequest;
use crate::models::Document;
use crate::models::KnowledgeBaseStats;
use crate::Result;

impl Database {
    /// Insert a new document record
    pub async fn create_document(&self, request: &CreateDocumentRequest) -> Result<Document> {
        let document = sqlx::query_as::<_, Document>(
            r"
            INSERT INTO documents (title, source_path, metadata)
            VALUES ($1, $2, $3)
            RETURNING id, title, source_path, metadata, created_at
            ",
        )
        .bind(&request.title)
        .bind(&request.source_path)
        .bind(&request.metadata)
        .fetch_one(self.pool())
        .await?;

        Ok(document)
    }

    /// Get a document by id
    pub async fn get_document(&self, id: Uuid) -> Result<Option<Document>> {
        let document = sqlx::query_as::<_, Document>(
            "SELECT id, title, source_path, metadata, created_at FROM documents WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(document)
    }

    /// Find a document by exact title
    pub async fn get_document_by_title(&self, title: &str) -> Result<Option<Document>> {
        let document = sqlx::query_as::<_, Document>(
            "SELECT id, title, source_path, metadata, created_at FROM documents WHERE title = $1",
        )
        .bind(title)
        .fetch_optional(self.pool())
        .await?;

        Ok(document)
    }

    /// List documents, newest first
    pub async fn list_documents(&self, limit: i64) -> Result<Vec<Document>> {
        let documents = sqlx::query_as::<_, Document>(
            r"
            SELECT id, title, source_path, metadata, created_at
            FROM documents
            ORDER BY created_at DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(documents)
    }

    /// Delete a document and its chunks (cascade)
    pub async fn delete_document(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Knowledge-base counters for the stats command
    pub async fn knowledge_base_stats(&self) -> Result<KnowledgeBaseStats> {
        let document_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
            .fetch_one(self.pool())
            .await?;

        let chunk_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM document_chunks")
            .fetch_one(self.pool())
            .await?;

        let embedded_chunk_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM document_chunks WHERE embedding IS NOT NULL")
                .fetch_one(self.pool())
                .await?;

        let query_log_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM query_logs")
            .fetch_one(self.pool())
            .await?;

        Ok(KnowledgeBaseStats {
            document_count,
            chunk_count,
            embedded_chunk_count,
            query_log_count,
        })
    }
}
