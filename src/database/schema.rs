use super::Database;
use crate::DocuMindError;
use crate::Result;

impl Database {
    /// Check if database schema is initialized
    /// Returns true if all required tables exist
    pub async fn is_schema_initialized(&self) -> Result<bool> {
        let required_tables = vec!["documents", "document_chunks", "query_logs"];

        for table_name in required_tables {
            let result = sqlx::query_scalar::<_, bool>(
                r"
                SELECT EXISTS (
                    SELECT FROM information_schema.tables
                    WHERE table_schema = 'public'
                    AND table_name = $1
                )
                ",
            )
            .bind(table_name)
            .fetch_one(self.pool())
            .await?;

            if !result {
                tracing::debug!("Missing required table: {}", table_name);
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Verify database schema or return helpful error
    pub async fn verify_schema_or_error(&self) -> Result<()> {
        if !self.is_schema_initialized().await? {
            return Err(DocuMindError::Config(
                "Database schema not initialized. Run: documind init --force".to_string(),
            ));
        }
        Ok(())
    }

    /// Initialize database schema
    pub async fn init_schema(&self, embedding_dimension: usize) -> Result<()> {
        // pgvector must be available before the chunk table is created
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(self.pool())
            .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS documents (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                title VARCHAR(512) NOT NULL,
                source_path TEXT,
                metadata JSONB NOT NULL DEFAULT '{}',
                created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(&format!(
            r"
            CREATE TABLE IF NOT EXISTS document_chunks (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                document_id UUID NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
                chunk_index INTEGER NOT NULL,
                content TEXT NOT NULL,
                metadata JSONB NOT NULL DEFAULT '{{}}',
                embedding VECTOR({embedding_dimension}),
                created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
                UNIQUE(document_id, chunk_index)
            )
            ",
        ))
        .execute(self.pool())
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS query_logs (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                model VARCHAR(255) NOT NULL,
                sources JSONB NOT NULL DEFAULT '[]',
                response_time_ms DOUBLE PRECISION NOT NULL,
                created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
            )
            ",
        )
        .execute(self.pool())
        .await?;

        self.create_indexes().await?;

        Ok(())
    }

    async fn create_indexes(&self) -> Result<()> {
        // ivfflat needs rows to build useful lists; fine to create up front,
        // pgvector falls back to a flat scan on small tables
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_document_chunks_embedding \
             ON document_chunks USING ivfflat (embedding vector_cosine_ops) WITH (lists = 100)",
        )
        .execute(self.pool())
        .await
        .ok(); // Ignore errors if already exists

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_document_chunks_fts \
             ON document_chunks USING GIN (to_tsvector('english', content))",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_document_chunks_document \
             ON document_chunks(document_id, chunk_index)",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_query_logs_created_at \
             ON query_logs(created_at DESC)",
        )
        .execute(self.pool())
        .await?;

        tracing::debug!("Essential indexes ensured");
        Ok(())
    }

    /// Drop all DocuMind tables. Destructive; used by init --force
    pub async fn drop_schema(&self) -> Result<()> {
        sqlx::query("DROP TABLE IF EXISTS query_logs")
            .execute(self.pool())
            .await?;
        sqlx::query("DROP TABLE IF EXISTS document_chunks")
            .execute(self.pool())
            .await?;
        sqlx::query("DROP TABLE IF EXISTS documents")
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
