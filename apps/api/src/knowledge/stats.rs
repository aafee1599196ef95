//! Knowledge stats — the totals behind the admin training dashboard.

use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnowledgeStats {
    pub total_entries: i64,
    pub active_entries: i64,
    pub total_usage: i64,
    /// Percent of positive chat feedback, 0 when no feedback exists yet.
    pub satisfaction_pct: i64,
}

/// Percent of positive ratings, rounded to a whole number.
pub fn satisfaction_pct(positive: i64, total: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    ((positive as f64 / total as f64) * 100.0).round() as i64
}

pub async fn compute_stats(pool: &PgPool) -> Result<KnowledgeStats, AppError> {
    let (total_entries, active_entries, total_usage): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*),
               COUNT(*) FILTER (WHERE is_active),
               COALESCE(SUM(usage_count), 0)::BIGINT
        FROM knowledge_entries
        "#,
    )
    .fetch_one(pool)
    .await?;

    let (positive, total_feedback): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*) FILTER (WHERE rating = 'positive'), COUNT(*) FROM chat_feedback",
    )
    .fetch_one(pool)
    .await?;

    Ok(KnowledgeStats {
        total_entries,
        active_entries,
        total_usage,
        satisfaction_pct: satisfaction_pct(positive, total_feedback),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_satisfaction_zero_without_feedback() {
        assert_eq!(satisfaction_pct(0, 0), 0);
    }

    #[test]
    fn test_satisfaction_all_positive() {
        assert_eq!(satisfaction_pct(12, 12), 100);
    }

    #[test]
    fn test_satisfaction_rounds() {
        // 2 of 3 → 66.67 → 67
        assert_eq!(satisfaction_pct(2, 3), 67);
    }

    #[test]
    fn test_satisfaction_all_negative() {
        assert_eq!(satisfaction_pct(0, 5), 0);
    }
}
