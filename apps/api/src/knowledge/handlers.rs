use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::knowledge::import::{import_entries, ImportReport, ImportRow};
use crate::knowledge::stats::{compute_stats, KnowledgeStats};
use crate::knowledge::store::{
    self, ExportRow, KnowledgeUpdate, NewKnowledgeEntry,
};
use crate::models::knowledge::{KnowledgeEntryRow, TrainingAuditRow};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LimitQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// GET /api/v1/knowledge
pub async fn handle_list_knowledge(
    State(state): State<AppState>,
) -> Result<Json<Vec<KnowledgeEntryRow>>, AppError> {
    Ok(Json(store::list_all(&state.db).await?))
}

/// POST /api/v1/knowledge
pub async fn handle_create_knowledge(
    State(state): State<AppState>,
    Json(req): Json<NewKnowledgeEntry>,
) -> Result<(StatusCode, Json<KnowledgeEntryRow>), AppError> {
    let row = store::create_entry(&state.db, &req).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/v1/knowledge/:id
pub async fn handle_update_knowledge(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<KnowledgeUpdate>,
) -> Result<Json<KnowledgeEntryRow>, AppError> {
    Ok(Json(store::update_entry(&state.db, id, &req).await?))
}

/// DELETE /api/v1/knowledge/:id
pub async fn handle_delete_knowledge(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    store::delete_entry(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/knowledge/stats
pub async fn handle_knowledge_stats(
    State(state): State<AppState>,
) -> Result<Json<KnowledgeStats>, AppError> {
    Ok(Json(compute_stats(&state.db).await?))
}

/// GET /api/v1/knowledge/export
pub async fn handle_export_knowledge(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExportRow>>, AppError> {
    Ok(Json(store::export_entries(&state.db).await?))
}

/// POST /api/v1/knowledge/import
pub async fn handle_import_knowledge(
    State(state): State<AppState>,
    Json(rows): Json<Vec<ImportRow>>,
) -> Result<Json<ImportReport>, AppError> {
    Ok(Json(import_entries(&state.db, &rows).await?))
}

/// GET /api/v1/knowledge/audit
pub async fn handle_training_audit(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<TrainingAuditRow>>, AppError> {
    Ok(Json(store::list_audit(&state.db, params.limit).await?))
}
