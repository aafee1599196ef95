use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// One trained question/answer pair in the knowledge base.
///
/// `usage_count` and `last_used_at` move together: both are written only by
/// the single `record_use` UPDATE, so `last_used_at` is null exactly when the
/// entry has never answered a query.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct KnowledgeEntryRow {
    pub id: i64,
    pub category: String,
    pub question: String,
    pub answer: String,
    pub keywords: Vec<String>,
    pub priority: i32,
    pub is_active: bool,
    pub usage_count: i64,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Audit row for knowledge mutations and successful uses.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrainingAuditRow {
    pub id: i64,
    pub action: String,
    pub knowledge_id: Option<i64>,
    pub details: Option<Value>,
    pub created_at: DateTime<Utc>,
}
