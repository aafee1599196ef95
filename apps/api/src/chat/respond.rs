//! Respond orchestration — the hot path from visitor message to answer.
//!
//! Flow: append the user turn, normalize + match against the active entries,
//! then either record the use and answer from the matched entry, or answer
//! with the configured fallback text. A miss is a normal outcome, never an
//! error surfaced to the visitor.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::chat::log::{append_turn, ROLE_ASSISTANT, ROLE_USER};
use crate::errors::AppError;
use crate::knowledge::store::{self, record_use};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Omit to start a new session; the minted id comes back in the response.
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub answer: String,
    pub matched_entry_id: Option<i64>,
}

pub async fn respond(state: &AppState, req: &ChatRequest) -> Result<ChatResponse, AppError> {
    let session_id = match &req.session_id {
        Some(id) if id.trim().is_empty() => {
            return Err(AppError::Validation("empty session_id".to_string()))
        }
        Some(id) => id.clone(),
        None => Uuid::new_v4().to_string(),
    };
    if req.message.trim().is_empty() {
        return Err(AppError::Validation("empty message".to_string()));
    }

    // The user's turn is logged first, whatever happens to the match.
    append_turn(&state.db, &session_id, ROLE_USER, &req.message, None).await?;

    let entries = store::list_active(&state.db).await?;
    match state.matcher.best_match(&req.message, &entries).await {
        Some(matched) => {
            record_use(&state.db, matched.entry.id).await;
            append_turn(
                &state.db,
                &session_id,
                ROLE_ASSISTANT,
                &matched.entry.answer,
                Some(matched.entry.id),
            )
            .await?;
            info!(
                entry = matched.entry.id,
                score = matched.score,
                "answered from knowledge base"
            );
            Ok(ChatResponse {
                session_id,
                answer: matched.entry.answer,
                matched_entry_id: Some(matched.entry.id),
            })
        }
        None => {
            let fallback = state.config.fallback_message.clone();
            append_turn(&state.db, &session_id, ROLE_ASSISTANT, &fallback, None).await?;
            info!("no knowledge match, answered with fallback");
            Ok(ChatResponse {
                session_id,
                answer: fallback,
                matched_entry_id: None,
            })
        }
    }
}
