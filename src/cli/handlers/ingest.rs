//! Schema init and document upload handlers

use std::path::Path;
use std::sync::Arc;

use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::database::Database;
use crate::embeddings::EmbeddingService;
use crate::ingest::DocumentIngestor;
use crate::AppConfig;
use crate::Result;

pub async fn handle_init(config: &AppConfig, force: bool) -> Result<()> {
    let database = Database::from_config(config).await?;

    if force {
        print_warning("Dropping existing DocuMind tables");
        database.drop_schema().await?;
    } else if database.is_schema_initialized().await? {
        print_success("Schema already initialized");
        return Ok(());
    }

    database.init_schema(config.embedding_dimension()).await?;
    print_success("Database schema initialized");
    Ok(())
}

pub async fn handle_upload(
    config: &AppConfig,
    paths: Vec<String>,
    chunk_size: usize,
) -> Result<()> {
    let database = Arc::new(Database::from_config(config).await?);
    database.verify_schema_or_error().await?;

    let embedding_service = Arc::new(EmbeddingService::new(config)?);
    let ingestor = DocumentIngestor::new(database, embedding_service).with_chunk_size(chunk_size);

    let mut succeeded = 0;
    let mut failed = 0;

    for path in &paths {
        match ingestor.ingest_file(Path::new(path)).await {
            Ok(report) => {
                succeeded += 1;
                print_success(&format!(
                    "{} -> {} chunks ({} embedded)",
                    report.document.title, report.chunk_count, report.embedded_count
                ));
            }
            Err(e) => {
                failed += 1;
                print_warning(&format!("{path}: {e}"));
            }
        }
    }

    println!("\nUploaded {succeeded} document(s), {failed} failed");
    Ok(())
}
