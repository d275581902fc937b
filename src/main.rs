use clap::Parser;
use documind::cli::commands::Cli;
use documind::cli::commands::Commands;
use documind::cli::commands::EmbeddingsCommands;
use documind::cli::handlers;
use documind::config::AppConfig;
use documind::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;

    if cli.verbose {
        documind::logging::init_logging_with_level("debug")?;
    } else {
        documind::logging::init_logging_with_config(Some(&config))?;
    }

    match cli.command {
        Commands::Init { force } => handlers::ingest::handle_init(&config, force).await,
        Commands::Upload { paths, chunk_size } => {
            handlers::ingest::handle_upload(&config, paths, chunk_size).await
        }
        Commands::Search {
            query,
            limit,
            mode,
            expand,
            no_diversify,
            max_per_document,
            detailed,
        } => {
            handlers::search::handle_search(
                &config,
                query,
                limit,
                mode,
                expand,
                no_diversify,
                max_per_document,
                detailed,
            )
            .await
        }
        Commands::Query {
            query,
            limit,
            mode,
            model,
            temperature,
            max_tokens,
            expand,
            verbose,
            json,
        } => {
            handlers::query::handle_query(
                &config,
                query,
                limit,
                mode,
                model,
                temperature,
                max_tokens,
                expand,
                verbose,
                json,
            )
            .await
        }
        Commands::Compare {
            query,
            models,
            json,
        } => handlers::query::handle_compare(&config, query, models, json).await,
        Commands::Analytics { days, json } => {
            handlers::maintenance::handle_analytics(&config, days, json).await
        }
        Commands::Bench {
            queries,
            limit,
            json,
        } => handlers::search::handle_bench(&config, queries, limit, json).await,
        Commands::Embeddings(command) => match command {
            EmbeddingsCommands::Backfill { batch_size } => {
                handlers::maintenance::handle_embeddings_backfill(&config, batch_size).await
            }
            EmbeddingsCommands::Test { text } => {
                handlers::maintenance::handle_embeddings_test(&config, text).await
            }
            EmbeddingsCommands::Stats => {
                handlers::maintenance::handle_embeddings_stats(&config).await
            }
        },
        Commands::Stats => handlers::maintenance::handle_stats(&config).await,
        Commands::Config => handlers::maintenance::handle_config(&config),
    }
}
