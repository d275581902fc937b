//! Search and bench handlers

use crate::cli::output::print_performance_report;
use crate::cli::output::print_search_results;
use crate::search::SearchApi;
use crate::search::SearchMode;
use crate::search::SearchOptions;
use crate::AppConfig;
use crate::Result;

/// Built-in bench queries, used when none are passed on the command line
const SAMPLE_QUERIES: &[&str] = &[
    "How many vacation days do full-time employees receive?",
    "How do I request time off?",
    "What are the password requirements?",
    "How do I report a security incident?",
    "PTO",
    "remote work policy",
];

#[allow(clippy::too_many_arguments)]
pub async fn handle_search(
    config: &AppConfig,
    query: String,
    limit: usize,
    mode: String,
    expand: bool,
    no_diversify: bool,
    max_per_document: usize,
    detailed: bool,
) -> Result<()> {
    let mode: SearchMode = mode.parse()?;
    let api = SearchApi::new(config).await?;

    println!("🔍 Searching: \"{query}\"");

    let results = api
        .search(
            &query,
            SearchOptions {
                mode,
                top_k: limit,
                expand_query: expand,
                diversify: !no_diversify,
                max_per_document,
            },
        )
        .await?;

    print_search_results(&results, detailed);
    Ok(())
}

pub async fn handle_bench(
    config: &AppConfig,
    queries: Vec<String>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let api = SearchApi::new(config).await?;

    let queries = if queries.is_empty() {
        SAMPLE_QUERIES.iter().map(ToString::to_string).collect()
    } else {
        queries
    };

    println!("Running {} queries...", queries.len());
    for (idx, query) in queries.iter().enumerate() {
        let results = api
            .search(
                query,
                SearchOptions {
                    top_k: limit,
                    ..SearchOptions::default()
                },
            )
            .await?;
        println!(
            "  [{}/{}] \"{}\" -> {} results",
            idx + 1,
            queries.len(),
            query,
            results.len()
        );
    }

    let report = api.performance_report();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        print_performance_report(&report);
    }

    Ok(())
}
