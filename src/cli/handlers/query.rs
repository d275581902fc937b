//! QA query and model-comparison handlers

use crate::cli::output::print_warning;
use crate::rag::ModelOutcome;
use crate::rag::QaRequest;
use crate::rag::QaService;
use crate::search::SearchMode;
use crate::AppConfig;
use crate::Result;

#[allow(clippy::too_many_arguments)]
pub async fn handle_query(
    config: &AppConfig,
    query: String,
    limit: usize,
    mode: String,
    model: Option<String>,
    temperature: f32,
    max_tokens: usize,
    expand: bool,
    verbose: bool,
    json: bool,
) -> Result<()> {
    let mode: SearchMode = mode.parse()?;
    let service = QaService::new(config).await?;

    if !json {
        println!("🤖 Answering: \"{query}\"");
    }

    let mut request = QaRequest::new(query);
    request.mode = mode;
    request.top_k = limit;
    request.temperature = temperature;
    request.max_tokens = max_tokens;
    request.expand_query = expand;
    request.model = model;

    let response = service.query(request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("\n{}", "─".repeat(60));
    println!("{}", response.answer.trim());
    println!("{}", "─".repeat(60));
    println!(
        "[model: {} | {:.0} ms | {} context chunks | {}/{} cited]",
        response.model,
        response.response_time_ms,
        response.context_chunks,
        response.citations.cited_count,
        response.citations.total_sources
    );

    if verbose {
        println!("\n📚 Sources:");
        for (idx, source) in response.sources.iter().enumerate() {
            println!(
                "  {}. {} (chunk {}, score: {:.4})",
                idx + 1,
                source.document,
                source.chunk_index,
                source.rerank_score.unwrap_or(source.score)
            );
            println!("     {}", source.preview);
        }
    } else if !response.citations.citations.is_empty() {
        println!("\nCitations:");
        for cite in &response.citations.citations {
            println!("  [{}] {} (chunk {})", cite.citation_id, cite.document, cite.chunk_index);
        }
    }

    Ok(())
}

pub async fn handle_compare(
    config: &AppConfig,
    query: String,
    models: Vec<String>,
    json: bool,
) -> Result<()> {
    let service = QaService::new(config).await?;

    if !json {
        println!("🔀 Comparing {} models: \"{query}\"", models.len());
    }

    let comparison = service.compare_models(&query, &models).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
        return Ok(());
    }

    println!(
        "\nRetrieved {} context chunks shared by all models",
        comparison.context_chunks
    );
    for entry in &comparison.results {
        println!("\n--- {} ---", entry.model);
        match &entry.outcome {
            ModelOutcome::Success {
                answer,
                response_time_ms,
            } => {
                println!("({response_time_ms:.0} ms)");
                println!("{}", answer.trim());
            }
            ModelOutcome::Error { message } => {
                print_warning(&format!("Error: {message}"));
            }
        }
    }

    Ok(())
}
