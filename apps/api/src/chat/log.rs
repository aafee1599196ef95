//! Chat session log — append-only record of conversation turns.
//!
//! CRITICAL: turns are never updated or deleted; the log is the audit trail
//! the training review workflow reads from.

use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::chat::{ChatFeedbackRow, ConversationTurnRow};

pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";

/// Appends one turn to a session.
pub async fn append_turn(
    pool: &PgPool,
    session_id: &str,
    role: &str,
    message: &str,
    matched_entry_id: Option<i64>,
) -> Result<ConversationTurnRow, AppError> {
    Ok(sqlx::query_as::<_, ConversationTurnRow>(
        r#"
        INSERT INTO conversation_turns (session_id, role, message, matched_entry_id)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(session_id)
    .bind(role)
    .bind(message)
    .bind(matched_entry_id)
    .fetch_one(pool)
    .await?)
}

/// Turns for one session in chronological order. `id` is the secondary sort
/// so same-timestamp turns keep their append order.
pub async fn list_by_session(
    pool: &PgPool,
    session_id: &str,
    limit: i64,
) -> Result<Vec<ConversationTurnRow>, AppError> {
    Ok(sqlx::query_as::<_, ConversationTurnRow>(
        r#"
        SELECT * FROM conversation_turns
        WHERE session_id = $1
        ORDER BY created_at ASC, id ASC
        LIMIT $2
        "#,
    )
    .bind(session_id)
    .bind(limit)
    .fetch_all(pool)
    .await?)
}

/// Latest turns across all sessions, newest first — the admin
/// "recent conversations → train" view.
pub async fn recent_turns(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<ConversationTurnRow>, AppError> {
    Ok(sqlx::query_as::<_, ConversationTurnRow>(
        "SELECT * FROM conversation_turns ORDER BY created_at DESC, id DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?)
}

/// Records a visitor rating of an assistant turn.
pub async fn record_feedback(
    pool: &PgPool,
    turn_id: i64,
    rating: &str,
    comment: Option<&str>,
) -> Result<ChatFeedbackRow, AppError> {
    if rating != "positive" && rating != "negative" {
        return Err(AppError::Validation(
            "rating must be 'positive' or 'negative'".to_string(),
        ));
    }

    let turn_exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM conversation_turns WHERE id = $1)")
            .bind(turn_id)
            .fetch_one(pool)
            .await?;
    if !turn_exists {
        return Err(AppError::NotFound(format!("Conversation turn {turn_id} not found")));
    }

    Ok(sqlx::query_as::<_, ChatFeedbackRow>(
        r#"
        INSERT INTO chat_feedback (turn_id, rating, comment)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(turn_id)
    .bind(rating)
    .bind(comment)
    .fetch_one(pool)
    .await?)
}
