//! CLI command definitions and argument parsing

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "documind")]
#[command(about = "DocuMind CLI for document Q&A, hybrid search, and knowledge-base management")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize database schema and indexes
    Init {
        /// Drop existing tables before creating them
        #[arg(short, long)]
        force: bool,
    },
    /// Upload documents into the knowledge base
    Upload {
        /// Files to ingest (.txt or .md)
        #[arg(required = true)]
        paths: Vec<String>,
        /// Chunk size in characters
        #[arg(long, default_value = "1200")]
        chunk_size: usize,
    },
    /// Search documents without LLM generation
    Search {
        /// Search query
        query: String,
        /// Maximum number of results
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Search mode (semantic, keyword, hybrid, auto)
        #[arg(short, long, default_value = "auto")]
        mode: String,
        /// Expand the query with synonyms
        #[arg(long)]
        expand: bool,
        /// Disable per-document diversification
        #[arg(long)]
        no_diversify: bool,
        /// Maximum chunks per document when diversifying
        #[arg(long, default_value = "2")]
        max_per_document: usize,
        /// Show full chunk content
        #[arg(short, long)]
        detailed: bool,
    },
    /// Ask a question and generate an answer from retrieved context
    Query {
        /// The question to ask
        query: String,
        /// Maximum number of chunks to retrieve
        #[arg(short, long, default_value = "5")]
        limit: usize,
        /// Search mode (semantic, keyword, hybrid, auto)
        #[arg(short, long, default_value = "auto")]
        mode: String,
        /// Model override (defaults to configured model)
        #[arg(long)]
        model: Option<String>,
        /// LLM temperature (0.0 - 1.0)
        #[arg(long, default_value = "0.1")]
        temperature: f32,
        /// Maximum tokens for response
        #[arg(long, default_value = "500")]
        max_tokens: usize,
        /// Expand the query with synonyms
        #[arg(long)]
        expand: bool,
        /// Show detailed sources
        #[arg(long)]
        verbose: bool,
        /// Output raw JSON response
        #[arg(short, long)]
        json: bool,
    },
    /// Compare answers from multiple models over the same context
    Compare {
        /// The question to ask
        query: String,
        /// Models to compare (space-separated model identifiers)
        #[arg(required = true)]
        models: Vec<String>,
        /// Output raw JSON response
        #[arg(short, long)]
        json: bool,
    },
    /// Show query-log analytics
    Analytics {
        /// Trailing window in days
        #[arg(short, long, default_value = "7")]
        days: i64,
        /// Output raw JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Run a batch of queries and print the retrieval performance report
    Bench {
        /// Queries to run (falls back to a built-in sample set)
        queries: Vec<String>,
        /// Maximum number of results per query
        #[arg(short, long, default_value = "5")]
        limit: usize,
        /// Output report as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Embeddings maintenance commands
    #[command(subcommand)]
    Embeddings(EmbeddingsCommands),
    /// Show knowledge-base statistics
    Stats,
    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
pub enum EmbeddingsCommands {
    /// Generate embeddings for chunks that are missing them
    Backfill {
        /// Process in batches of N chunks
        #[arg(short, long, default_value = "50")]
        batch_size: usize,
    },
    /// Test embedding generation
    Test {
        /// Text to generate embedding for
        text: String,
    },
    /// Show embedding coverage statistics
    Stats,
}
