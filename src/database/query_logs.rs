use std::collections::HashMap;

use chrono::Duration;
use chrono::Utc;

use super::Database;
use crate::models::DocumentUsage;
use crate::models::ModelUsage;
use crate::models::QueryAnalytics;
use crate::models::QueryLog;
use crate::Result;

impl Database {
    /// Persist one question/answer exchange for analytics
    pub async fn insert_query_log(
        &self,
        question: &str,
        answer: &str,
        model: &str,
        sources: &serde_json::Value,
        response_time_ms: f64,
    ) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO query_logs (question, answer, model, sources, response_time_ms)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(question)
        .bind(answer)
        .bind(model)
        .bind(sources)
        .bind(response_time_ms)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Fetch query logs newer than the cutoff, newest first
    pub async fn recent_query_logs(&self, days: i64) -> Result<Vec<QueryLog>> {
        let cutoff = Utc::now() - Duration::days(days);

        let logs = sqlx::query_as::<_, QueryLog>(
            r"
            SELECT id, question, answer, model, sources, response_time_ms, created_at
            FROM query_logs
            WHERE created_at >= $1
            ORDER BY created_at DESC
            ",
        )
        .bind(cutoff)
        .fetch_all(self.pool())
        .await?;

        Ok(logs)
    }

    /// Aggregate query-log analytics over a trailing window
    pub async fn query_analytics(&self, days: i64) -> Result<QueryAnalytics> {
        let logs = self.recent_query_logs(days).await?;

        if logs.is_empty() {
            return Ok(QueryAnalytics {
                period_days: days,
                total_queries: 0,
                avg_response_time_ms: 0.0,
                queries_per_day: 0.0,
                model_usage: Vec::new(),
                top_documents: Vec::new(),
            });
        }

        let total_queries = logs.len();
        let avg_response_time_ms =
            logs.iter().map(|l| l.response_time_ms).sum::<f64>() / total_queries as f64;

        let mut model_counts: HashMap<String, usize> = HashMap::new();
        let mut doc_counts: HashMap<String, usize> = HashMap::new();

        for log in &logs {
            *model_counts.entry(log.model.clone()).or_default() += 1;

            // sources is a JSON array of {document, ...} entries
            if let Some(sources) = log.sources.as_array() {
                for source in sources {
                    if let Some(doc) = source.get("document").and_then(|d| d.as_str()) {
                        *doc_counts.entry(doc.to_string()).or_default() += 1;
                    }
                }
            }
        }

        let mut model_usage: Vec<ModelUsage> = model_counts
            .into_iter()
            .map(|(model, count)| ModelUsage { model, count })
            .collect();
        model_usage.sort_by(|a, b| b.count.cmp(&a.count));

        let mut top_documents: Vec<DocumentUsage> = doc_counts
            .into_iter()
            .map(|(document, count)| DocumentUsage { document, count })
            .collect();
        top_documents.sort_by(|a, b| b.count.cmp(&a.count));
        top_documents.truncate(10);

        Ok(QueryAnalytics {
            period_days: days,
            total_queries,
            avg_response_time_ms,
            queries_per_day: total_queries as f64 / days as f64,
            model_usage,
            top_documents,
        })
    }
}
