//! Search performance monitoring
//!
//! Keeps an append-only, in-process history of per-query metrics and
//! aggregates it into a report. History lives for the process lifetime
//! and is only dropped by an explicit `clear`.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::Serialize;

use super::SearchMode;

/// Metrics captured for one executed search call
#[derive(Debug, Clone, Serialize)]
pub struct SearchMetrics {
    pub query: String,
    pub mode: SearchMode,
    pub latency_ms: f64,
    pub num_results: usize,
    pub avg_score: f64,
    pub top_score: f64,
}

/// Per-mode aggregate statistics
#[derive(Debug, Clone, Serialize)]
pub struct ModeStats {
    pub query_count: usize,
    pub avg_latency_ms: f64,
    pub min_latency_ms: f64,
    pub max_latency_ms: f64,
    pub latency_stdev_ms: f64,
    pub avg_score: f64,
    pub avg_results: f64,
}

/// Whole-history aggregate statistics
#[derive(Debug, Clone, Serialize)]
pub struct OverallStats {
    pub avg_latency_ms: f64,
    pub p95_latency_ms: f64,
    pub avg_score: f64,
    pub avg_top_score: f64,
}

/// One of the slowest recorded queries
#[derive(Debug, Clone, Serialize)]
pub struct SlowQuery {
    pub query: String,
    pub latency_ms: f64,
    pub mode: SearchMode,
}

/// Aggregated performance report
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub total_queries: usize,
    pub by_mode: BTreeMap<String, ModeStats>,
    pub overall: Option<OverallStats>,
    pub slowest_queries: Vec<SlowQuery>,
    pub mode_distribution: BTreeMap<String, f64>,
}

/// Append-only recorder of per-query search metrics
///
/// The history list is the only shared mutable state in the search core;
/// the mutex keeps it safe when the service is shared across tasks. Lock
/// scopes are short and never held across an await.
#[derive(Debug, Default)]
pub struct PerformanceMonitor {
    history: Mutex<Vec<SearchMetrics>>,
}

impl PerformanceMonitor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one metrics record
    pub fn record(&self, metrics: SearchMetrics) {
        self.history
            .lock()
            .expect("metrics history lock poisoned")
            .push(metrics);
    }

    /// Number of recorded queries
    #[must_use]
    pub fn len(&self) -> usize {
        self.history
            .lock()
            .expect("metrics history lock poisoned")
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear the recorded history
    pub fn clear(&self) {
        self.history
            .lock()
            .expect("metrics history lock poisoned")
            .clear();
    }

    /// Generate an aggregated report from the recorded history
    #[must_use]
    pub fn report(&self) -> PerformanceReport {
        let history = self
            .history
            .lock()
            .expect("metrics history lock poisoned")
            .clone();

        if history.is_empty() {
            return PerformanceReport {
                total_queries: 0,
                by_mode: BTreeMap::new(),
                overall: None,
                slowest_queries: Vec::new(),
                mode_distribution: BTreeMap::new(),
            };
        }

        let total = history.len();

        // Group metrics by mode
        let mut by_mode_metrics: BTreeMap<&'static str, Vec<&SearchMetrics>> = BTreeMap::new();
        for metrics in &history {
            by_mode_metrics
                .entry(metrics.mode.as_str())
                .or_default()
                .push(metrics);
        }

        let mut by_mode = BTreeMap::new();
        let mut mode_distribution = BTreeMap::new();
        for (mode, group) in &by_mode_metrics {
            let latencies: Vec<f64> = group.iter().map(|m| m.latency_ms).collect();
            let scores: Vec<f64> = group
                .iter()
                .map(|m| m.avg_score)
                .filter(|s| *s > 0.0)
                .collect();
            let result_counts: Vec<f64> = group.iter().map(|m| m.num_results as f64).collect();

            by_mode.insert(
                (*mode).to_string(),
                ModeStats {
                    query_count: group.len(),
                    avg_latency_ms: round2(mean(&latencies)),
                    min_latency_ms: round2(latencies.iter().copied().fold(f64::MAX, f64::min)),
                    max_latency_ms: round2(latencies.iter().copied().fold(f64::MIN, f64::max)),
                    latency_stdev_ms: round2(stdev(&latencies)),
                    avg_score: round4(mean(&scores)),
                    avg_results: round1(mean(&result_counts)),
                },
            );
            mode_distribution.insert(
                (*mode).to_string(),
                round2(group.len() as f64 / total as f64 * 100.0),
            );
        }

        // Overall statistics
        let all_latencies: Vec<f64> = history.iter().map(|m| m.latency_ms).collect();
        let all_scores: Vec<f64> = history
            .iter()
            .map(|m| m.avg_score)
            .filter(|s| *s > 0.0)
            .collect();
        let all_top_scores: Vec<f64> = history
            .iter()
            .map(|m| m.top_score)
            .filter(|s| *s > 0.0)
            .collect();

        let overall = Some(OverallStats {
            avg_latency_ms: round2(mean(&all_latencies)),
            p95_latency_ms: round2(p95(&all_latencies)),
            avg_score: round4(mean(&all_scores)),
            avg_top_score: round4(mean(&all_top_scores)),
        });

        // Top-5 slowest queries
        let mut slowest: Vec<&SearchMetrics> = history.iter().collect();
        slowest.sort_by(|a, b| {
            b.latency_ms
                .partial_cmp(&a.latency_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let slowest_queries = slowest
            .into_iter()
            .take(5)
            .map(|m| SlowQuery {
                query: m.query.chars().take(50).collect(),
                latency_ms: round2(m.latency_ms),
                mode: m.mode,
            })
            .collect();

        PerformanceReport {
            total_queries: total,
            by_mode,
            overall,
            slowest_queries,
            mode_distribution,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation; 0 when fewer than 2 samples exist
fn stdev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// 95th percentile by sorted-index lookup, no interpolation
fn p95(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let idx = ((sorted.len() as f64) * 0.95) as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(query: &str, mode: SearchMode, latency_ms: f64, avg_score: f64) -> SearchMetrics {
        SearchMetrics {
            query: query.to_string(),
            mode,
            latency_ms,
            num_results: 5,
            avg_score,
            top_score: avg_score + 0.1,
        }
    }

    #[test]
    fn test_empty_report() {
        let monitor = PerformanceMonitor::new();
        let report = monitor.report();
        assert_eq!(report.total_queries, 0);
        assert!(report.overall.is_none());
        assert!(report.by_mode.is_empty());
    }

    #[test]
    fn test_stdev_zero_for_single_sample() {
        let monitor = PerformanceMonitor::new();
        monitor.record(metrics("q1", SearchMode::Hybrid, 12.0, 0.8));

        let report = monitor.report();
        let stats = &report.by_mode["hybrid"];
        assert_eq!(stats.query_count, 1);
        assert!((stats.latency_stdev_ms - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_per_mode_latency_stats() {
        let monitor = PerformanceMonitor::new();
        monitor.record(metrics("q1", SearchMode::Semantic, 10.0, 0.8));
        monitor.record(metrics("q2", SearchMode::Semantic, 20.0, 0.9));
        monitor.record(metrics("q3", SearchMode::Keyword, 5.0, 0.7));

        let report = monitor.report();
        let semantic = &report.by_mode["semantic"];
        assert_eq!(semantic.query_count, 2);
        assert!((semantic.avg_latency_ms - 15.0).abs() < 1e-9);
        assert!((semantic.min_latency_ms - 10.0).abs() < 1e-9);
        assert!((semantic.max_latency_ms - 20.0).abs() < 1e-9);
        // Sample stdev of [10, 20] is ~7.07
        assert!((semantic.latency_stdev_ms - 7.07).abs() < 0.01);
    }

    #[test]
    fn test_p95_by_index_without_interpolation() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        // index = (100 * 0.95) = 95 -> sorted[95] = 96
        assert!((p95(&values) - 96.0).abs() < f64::EPSILON);

        let small = vec![3.0, 1.0, 2.0];
        // index = (3 * 0.95) = 2 -> sorted[2] = 3
        assert!((p95(&small) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mode_distribution_percentages() {
        let monitor = PerformanceMonitor::new();
        monitor.record(metrics("q1", SearchMode::Hybrid, 10.0, 0.8));
        monitor.record(metrics("q2", SearchMode::Hybrid, 10.0, 0.8));
        monitor.record(metrics("q3", SearchMode::Semantic, 10.0, 0.8));
        monitor.record(metrics("q4", SearchMode::Keyword, 10.0, 0.8));

        let report = monitor.report();
        assert!((report.mode_distribution["hybrid"] - 50.0).abs() < f64::EPSILON);
        assert!((report.mode_distribution["semantic"] - 25.0).abs() < f64::EPSILON);
        assert!((report.mode_distribution["keyword"] - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_slowest_queries_capped_at_five() {
        let monitor = PerformanceMonitor::new();
        for i in 0..8 {
            monitor.record(metrics(&format!("q{i}"), SearchMode::Hybrid, i as f64, 0.5));
        }

        let report = monitor.report();
        assert_eq!(report.slowest_queries.len(), 5);
        assert_eq!(report.slowest_queries[0].query, "q7");
        assert!((report.slowest_queries[0].latency_ms - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_slow_query_text_truncated() {
        let monitor = PerformanceMonitor::new();
        let long_query = "x".repeat(80);
        monitor.record(metrics(&long_query, SearchMode::Hybrid, 10.0, 0.5));

        let report = monitor.report();
        assert_eq!(report.slowest_queries[0].query.chars().count(), 50);
    }

    #[test]
    fn test_zero_scores_excluded_from_averages() {
        let monitor = PerformanceMonitor::new();
        monitor.record(metrics("q1", SearchMode::Hybrid, 10.0, 0.0));
        monitor.record(metrics("q2", SearchMode::Hybrid, 10.0, 0.8));

        let report = monitor.report();
        assert!((report.by_mode["hybrid"].avg_score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_clear_resets_history() {
        let monitor = PerformanceMonitor::new();
        monitor.record(metrics("q1", SearchMode::Hybrid, 10.0, 0.8));
        assert_eq!(monitor.len(), 1);

        monitor.clear();
        assert!(monitor.is_empty());
        assert_eq!(monitor.report().total_queries, 0);
    }
}
