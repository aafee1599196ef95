use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::chat::log::{self, recent_turns};
use crate::chat::respond::{respond, ChatRequest, ChatResponse};
use crate::errors::AppError;
use crate::models::chat::{ChatFeedbackRow, ConversationTurnRow};
use crate::state::AppState;

fn default_limit() -> i64 {
    50
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub session_id: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub turn_id: i64,
    pub rating: String,
    pub comment: Option<String>,
}

/// POST /api/v1/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    Ok(Json(respond(&state, &req).await?))
}

/// GET /api/v1/chat/history
pub async fn handle_chat_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<ConversationTurnRow>>, AppError> {
    Ok(Json(
        log::list_by_session(&state.db, &params.session_id, params.limit).await?,
    ))
}

/// POST /api/v1/chat/feedback
pub async fn handle_chat_feedback(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> Result<(StatusCode, Json<ChatFeedbackRow>), AppError> {
    let row =
        log::record_feedback(&state.db, req.turn_id, &req.rating, req.comment.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/knowledge/conversations
pub async fn handle_recent_conversations(
    State(state): State<AppState>,
    Query(params): Query<RecentQuery>,
) -> Result<Json<Vec<ConversationTurnRow>>, AppError> {
    Ok(Json(recent_turns(&state.db, params.limit).await?))
}
