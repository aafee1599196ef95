pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::chat::handlers as chat_handlers;
use crate::knowledge::handlers as knowledge_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Chat API
        .route("/api/v1/chat", post(chat_handlers::handle_chat))
        .route(
            "/api/v1/chat/history",
            get(chat_handlers::handle_chat_history),
        )
        .route(
            "/api/v1/chat/feedback",
            post(chat_handlers::handle_chat_feedback),
        )
        // Knowledge API (training center)
        .route(
            "/api/v1/knowledge",
            get(knowledge_handlers::handle_list_knowledge)
                .post(knowledge_handlers::handle_create_knowledge),
        )
        .route(
            "/api/v1/knowledge/:id",
            patch(knowledge_handlers::handle_update_knowledge)
                .delete(knowledge_handlers::handle_delete_knowledge),
        )
        .route(
            "/api/v1/knowledge/stats",
            get(knowledge_handlers::handle_knowledge_stats),
        )
        .route(
            "/api/v1/knowledge/export",
            get(knowledge_handlers::handle_export_knowledge),
        )
        .route(
            "/api/v1/knowledge/import",
            post(knowledge_handlers::handle_import_knowledge),
        )
        .route(
            "/api/v1/knowledge/audit",
            get(knowledge_handlers::handle_training_audit),
        )
        .route(
            "/api/v1/knowledge/conversations",
            get(chat_handlers::handle_recent_conversations),
        )
        .with_state(state)
}
