//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the DocuMind CLI

use crate::models::KnowledgeBaseStats;
use crate::models::QueryAnalytics;
use crate::search::PerformanceReport;
use crate::search::SearchResult;

/// Safely truncate a string at character boundary (not byte boundary)
///
/// This prevents panics when truncating strings with multi-byte UTF-8 characters
///
/// # Returns
/// Truncated string with "..." suffix if truncated, otherwise the original string
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Print an informational message
pub fn print_info(message: &str) {
    println!("ℹ️  {message}");
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("⚠️  {message}");
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("✅ {message}");
}

/// Print search results
pub fn print_search_results(results: &[SearchResult], detailed: bool) {
    if results.is_empty() {
        print_warning("No results found");
        return;
    }

    println!("Found {} result(s):", results.len());
    for result in results {
        println!();
        println!(
            "  [{}] {} (chunk {}) | score: {:.4} | {:?}",
            result.rank,
            result.document_title,
            result.chunk_index,
            result.effective_score(),
            result.search_type
        );
        if detailed {
            println!("  {}", result.content);
        } else {
            println!("  {}", truncate_str(&result.content, 120));
        }
    }
}

/// Print knowledge-base statistics
pub fn print_kb_stats(stats: &KnowledgeBaseStats) {
    println!("📚 Knowledge base:");
    println!("  Documents:        {}", stats.document_count);
    println!("  Chunks:           {}", stats.chunk_count);
    println!(
        "  Embedded chunks:  {} ({:.1}%)",
        stats.embedded_chunk_count,
        if stats.chunk_count > 0 {
            stats.embedded_chunk_count as f64 / stats.chunk_count as f64 * 100.0
        } else {
            0.0
        }
    );
    println!("  Logged queries:   {}", stats.query_log_count);
}

/// Print query-log analytics
pub fn print_analytics(analytics: &QueryAnalytics) {
    println!(
        "📊 Query analytics (last {} days)",
        analytics.period_days
    );
    println!("  Total queries:     {}", analytics.total_queries);
    println!(
        "  Avg response time: {:.0} ms",
        analytics.avg_response_time_ms
    );
    println!("  Queries per day:   {:.2}", analytics.queries_per_day);

    if !analytics.model_usage.is_empty() {
        println!("\n  Model usage:");
        for usage in &analytics.model_usage {
            println!("    - {}: {}", usage.model, usage.count);
        }
    }

    if !analytics.top_documents.is_empty() {
        println!("\n  Top documents:");
        for doc in analytics.top_documents.iter().take(5) {
            println!("    - {}: {} retrievals", doc.document, doc.count);
        }
    }
}

/// Print the retrieval performance report
pub fn print_performance_report(report: &PerformanceReport) {
    println!("📈 Performance report ({} queries)", report.total_queries);

    if let Some(overall) = &report.overall {
        println!("\n  Overall:");
        println!("    Avg latency:  {:.2} ms", overall.avg_latency_ms);
        println!("    P95 latency:  {:.2} ms", overall.p95_latency_ms);
        println!("    Avg score:    {:.4}", overall.avg_score);
        println!("    Avg top:      {:.4}", overall.avg_top_score);
    }

    for (mode, stats) in &report.by_mode {
        println!("\n  Mode '{mode}' ({} queries):", stats.query_count);
        println!(
            "    Latency: avg {:.2} / min {:.2} / max {:.2} / stdev {:.2} ms",
            stats.avg_latency_ms,
            stats.min_latency_ms,
            stats.max_latency_ms,
            stats.latency_stdev_ms
        );
        println!(
            "    Avg score: {:.4} | Avg results: {:.1}",
            stats.avg_score, stats.avg_results
        );
    }

    if !report.mode_distribution.is_empty() {
        println!("\n  Mode distribution:");
        for (mode, share) in &report.mode_distribution {
            println!("    {mode}: {share:.1}%");
        }
    }

    if !report.slowest_queries.is_empty() {
        println!("\n  Slowest queries:");
        for slow in &report.slowest_queries {
            println!(
                "    {:.2} ms [{}] \"{}\"",
                slow.latency_ms,
                slow.mode.as_str(),
                slow.query
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str_multibyte_safe() {
        let text = "日本語のテキストです";
        let truncated = truncate_str(text, 4);
        assert_eq!(truncated, "日本語の...");
    }

    #[test]
    fn test_truncate_str_short_unchanged() {
        assert_eq!(truncate_str("short", 10), "short");
    }
}
