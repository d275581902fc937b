//! Document ingestion
//!
//! Validates and reads uploaded files, chunks their text, persists the
//! document and its chunks, and embeds the chunks so they are searchable
//! immediately. Binary formats (PDF and friends) are rejected; parsing
//! them is out of scope.

pub mod chunker;

pub use chunker::chunk_text;
pub use chunker::DEFAULT_CHUNK_SIZE;

use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tracing::info;
use tracing::warn;
use uuid::Uuid;

use crate::database::Database;
use crate::embeddings::EmbeddingService;
use crate::errors::DocuMindError;
use crate::errors::Result;
use crate::models::CreateDocumentRequest;
use crate::models::Document;
use crate::models::DocumentChunk;

/// Extensions accepted for upload
const ALLOWED_EXTENSIONS: &[&str] = &["txt", "md"];

/// Maximum accepted file size
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10 MB

/// Result of ingesting one document
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub document: Document,
    pub chunk_count: usize,
    pub embedded_count: usize,
}

/// Service that ingests documents into the knowledge base
pub struct DocumentIngestor {
    database: Arc<Database>,
    embedding_service: Arc<EmbeddingService>,
    chunk_size: usize,
}

impl DocumentIngestor {
    pub fn new(database: Arc<Database>, embedding_service: Arc<EmbeddingService>) -> Self {
        Self {
            database,
            embedding_service,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Ingest one file: validate, read, chunk, persist, embed
    ///
    /// # Errors
    /// - `Document` for validation failures (missing file, bad extension,
    ///   oversize, empty content)
    /// - Database or embedding provider errors
    pub async fn ingest_file(&self, path: &Path) -> Result<IngestReport> {
        validate_file(path)?;

        let content = read_text_file(path)?;
        if content.trim().is_empty() {
            return Err(DocuMindError::Document(format!(
                "File contains no text: {}",
                path.display()
            )));
        }

        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();

        let chunks = chunk_text(&content, self.chunk_size);
        info!("Ingesting '{}': {} chunks", title, chunks.len());

        let word_count = content.split_whitespace().count();
        let document = self
            .database
            .create_document(&CreateDocumentRequest {
                title,
                source_path: Some(path.display().to_string()),
                metadata: json!({
                    "char_count": content.chars().count(),
                    "word_count": word_count,
                    "chunk_size": self.chunk_size,
                }),
            })
            .await?;

        // Embed up front so new chunks are searchable without a backfill
        // pass; failures leave embeddings NULL for the backfill job
        let texts: Vec<&str> = chunks.iter().map(String::as_str).collect();
        let embeddings = match self.embedding_service.generate_batch(texts).await {
            Ok(embeddings) => embeddings.into_iter().map(Some).collect(),
            Err(e) => {
                warn!("Embedding failed during ingest, chunks stored without vectors: {e}");
                vec![None; chunks.len()]
            }
        };

        let mut embedded_count = 0;
        for (idx, (content, embedding)) in chunks.iter().zip(embeddings).enumerate() {
            if embedding.is_some() {
                embedded_count += 1;
            }
            let chunk = DocumentChunk {
                id: Uuid::new_v4(),
                document_id: document.id,
                chunk_index: idx as i32,
                content: content.clone(),
                metadata: json!({}),
            };
            self.database.insert_chunk(&chunk, embedding).await?;
        }

        Ok(IngestReport {
            document,
            chunk_count: chunks.len(),
            embedded_count,
        })
    }
}

/// Validate that a path points at an ingestable file
fn validate_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(DocuMindError::Document(format!(
            "File does not exist: {}",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(DocuMindError::Document(format!(
            "Path is not a file: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(DocuMindError::Document(format!(
            "Invalid extension '.{extension}'. Allowed: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    let size = path.metadata()?.len();
    if size > MAX_FILE_SIZE {
        return Err(DocuMindError::Document(format!(
            "File too large ({size} bytes). Maximum allowed: {} MB",
            MAX_FILE_SIZE / (1024 * 1024)
        )));
    }

    Ok(())
}

/// Read a text file, tolerating invalid UTF-8 sequences
fn read_text_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validate_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::File::create(&path).unwrap();

        let result = validate_file(&path);
        assert!(matches!(result, Err(DocuMindError::Document(_))));
    }

    #[test]
    fn test_validate_rejects_missing_file() {
        let result = validate_file(Path::new("/nonexistent/notes.txt"));
        assert!(matches!(result, Err(DocuMindError::Document(_))));
    }

    #[test]
    fn test_validate_accepts_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("handbook.md");
        std::fs::File::create(&path).unwrap();

        assert!(validate_file(&path).is_ok());
    }

    #[test]
    fn test_read_tolerates_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"caf\xe9 policy").unwrap();

        let content = read_text_file(&path).unwrap();
        assert!(content.contains("caf"));
        assert!(content.contains("policy"));
    }
}
