use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One turn of a chat session. Turns are append-only.
///
/// `matched_entry_id` is a weak reference: the knowledge entry that produced
/// an assistant reply may be deleted later, and the turn keeps the id anyway.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ConversationTurnRow {
    pub id: i64,
    pub session_id: String,
    pub role: String,
    pub message: String,
    pub matched_entry_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Visitor rating of an assistant turn.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatFeedbackRow {
    pub id: i64,
    pub turn_id: i64,
    pub rating: String,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}
