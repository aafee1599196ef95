//! Knowledge store — CRUD over `knowledge_entries` plus the training audit
//! trail.
//!
//! `id`, `created_at`, and `usage_count` are never writable through the CRUD
//! surface; usage moves only through `record_use`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::knowledge::matching::MAX_PRIORITY;
use crate::models::knowledge::{KnowledgeEntryRow, TrainingAuditRow};

#[derive(Debug, Clone, Deserialize)]
pub struct NewKnowledgeEntry {
    pub category: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub priority: i32,
}

/// Partial update. Absent fields are left untouched (last-write-wins at the
/// field level; no version counter).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KnowledgeUpdate {
    pub category: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
}

/// Flat row shape for export/import, matching the admin Export button.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExportRow {
    pub question: String,
    pub answer: String,
    pub category: String,
}

/// Validates the required fields of a new or imported entry.
/// The reason strings double as per-row import errors.
pub fn validate_entry_fields(question: &str, answer: &str) -> Result<(), String> {
    if question.trim().is_empty() {
        return Err("empty question".to_string());
    }
    if answer.trim().is_empty() {
        return Err("empty answer".to_string());
    }
    Ok(())
}

/// Trims, lower-cases, and dedups keywords, preserving first-seen order.
pub fn normalize_keywords(keywords: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty() && seen.insert(k.clone()))
        .collect()
}

pub async fn create_entry(
    pool: &PgPool,
    new: &NewKnowledgeEntry,
) -> Result<KnowledgeEntryRow, AppError> {
    validate_entry_fields(&new.question, &new.answer).map_err(AppError::Validation)?;

    let row: KnowledgeEntryRow = sqlx::query_as(
        r#"
        INSERT INTO knowledge_entries (category, question, answer, keywords, priority)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(&new.category)
    .bind(new.question.trim())
    .bind(new.answer.trim())
    .bind(normalize_keywords(&new.keywords))
    .bind(new.priority.clamp(0, MAX_PRIORITY))
    .fetch_one(pool)
    .await?;

    info!("Created knowledge entry {} ({})", row.id, row.category);
    record_audit(pool, "added", Some(row.id), Some(json!({ "category": row.category }))).await;
    Ok(row)
}

pub async fn update_entry(
    pool: &PgPool,
    id: i64,
    update: &KnowledgeUpdate,
) -> Result<KnowledgeEntryRow, AppError> {
    if let Some(question) = &update.question {
        if question.trim().is_empty() {
            return Err(AppError::Validation("empty question".to_string()));
        }
    }
    if let Some(answer) = &update.answer {
        if answer.trim().is_empty() {
            return Err(AppError::Validation("empty answer".to_string()));
        }
    }

    let row: Option<KnowledgeEntryRow> = sqlx::query_as(
        r#"
        UPDATE knowledge_entries SET
            category = COALESCE($2, category),
            question = COALESCE($3, question),
            answer = COALESCE($4, answer),
            keywords = COALESCE($5, keywords),
            priority = COALESCE($6, priority),
            is_active = COALESCE($7, is_active)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(update.category.as_deref())
    .bind(update.question.as_deref().map(str::trim))
    .bind(update.answer.as_deref().map(str::trim))
    .bind(update.keywords.as_deref().map(normalize_keywords))
    .bind(update.priority.map(|p| p.clamp(0, MAX_PRIORITY)))
    .bind(update.is_active)
    .fetch_optional(pool)
    .await?;

    let row = row.ok_or_else(|| AppError::NotFound(format!("Knowledge entry {id} not found")))?;

    record_audit(pool, "updated", Some(id), Some(json!({ "fields": changed_fields(update) })))
        .await;
    Ok(row)
}

/// Hard delete. A second delete of the same id fails with NotFound.
pub async fn delete_entry(pool: &PgPool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM knowledge_entries WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Knowledge entry {id} not found")));
    }

    info!("Deleted knowledge entry {id}");
    record_audit(pool, "deleted", Some(id), None).await;
    Ok(())
}

/// Active entries only — the matcher's input snapshot.
pub async fn list_active(pool: &PgPool) -> Result<Vec<KnowledgeEntryRow>, AppError> {
    Ok(sqlx::query_as::<_, KnowledgeEntryRow>(
        "SELECT * FROM knowledge_entries WHERE is_active ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await?)
}

/// Full admin listing, most-relevant-first for the training center.
pub async fn list_all(pool: &PgPool) -> Result<Vec<KnowledgeEntryRow>, AppError> {
    Ok(sqlx::query_as::<_, KnowledgeEntryRow>(
        "SELECT * FROM knowledge_entries ORDER BY priority DESC, usage_count DESC, id ASC",
    )
    .fetch_all(pool)
    .await?)
}

/// Records a successful use: atomic increment plus timestamp.
///
/// A missing entry is a benign race (deleted between match and record) and is
/// logged, not surfaced — the visitor already has their answer.
pub async fn record_use(pool: &PgPool, id: i64) {
    let result = sqlx::query(
        "UPDATE knowledge_entries SET usage_count = usage_count + 1, last_used_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await;

    match result {
        Ok(r) if r.rows_affected() == 0 => {
            warn!("record_use: knowledge entry {id} no longer exists, treating as a miss");
        }
        Ok(_) => record_audit(pool, "used", Some(id), None).await,
        Err(e) => warn!("record_use failed for entry {id}: {e}"),
    }
}

pub async fn export_entries(pool: &PgPool) -> Result<Vec<ExportRow>, AppError> {
    Ok(sqlx::query_as::<_, ExportRow>(
        "SELECT question, answer, category FROM knowledge_entries ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await?)
}

pub async fn list_audit(pool: &PgPool, limit: i64) -> Result<Vec<TrainingAuditRow>, AppError> {
    Ok(sqlx::query_as::<_, TrainingAuditRow>(
        "SELECT * FROM training_audit ORDER BY created_at DESC, id DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?)
}

/// Best effort: an audit failure must never fail the mutation it describes.
async fn record_audit(
    pool: &PgPool,
    action: &str,
    knowledge_id: Option<i64>,
    details: Option<serde_json::Value>,
) {
    let result =
        sqlx::query("INSERT INTO training_audit (action, knowledge_id, details) VALUES ($1, $2, $3)")
            .bind(action)
            .bind(knowledge_id)
            .bind(details)
            .execute(pool)
            .await;
    if let Err(e) = result {
        warn!("failed to record training audit ({action}): {e}");
    }
}

fn changed_fields(update: &KnowledgeUpdate) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if update.category.is_some() {
        fields.push("category");
    }
    if update.question.is_some() {
        fields.push("question");
    }
    if update.answer.is_some() {
        fields.push("answer");
    }
    if update.keywords.is_some() {
        fields.push("keywords");
    }
    if update.priority.is_some() {
        fields.push("priority");
    }
    if update.is_active.is_some() {
        fields.push("is_active");
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_question() {
        assert_eq!(
            validate_entry_fields("", "An answer"),
            Err("empty question".to_string())
        );
    }

    #[test]
    fn test_validate_rejects_whitespace_only_answer() {
        assert_eq!(
            validate_entry_fields("A question?", "   \t"),
            Err("empty answer".to_string())
        );
    }

    #[test]
    fn test_validate_accepts_normal_fields() {
        assert!(validate_entry_fields("What is this?", "It is a thing.").is_ok());
    }

    #[test]
    fn test_normalize_keywords_dedups_case_insensitively() {
        let input = vec![
            "Mission".to_string(),
            "mission".to_string(),
            " MISSION ".to_string(),
        ];
        assert_eq!(normalize_keywords(&input), vec!["mission"]);
    }

    #[test]
    fn test_normalize_keywords_drops_empty_and_preserves_order() {
        let input = vec![
            "sovereignty".to_string(),
            "  ".to_string(),
            "leadership".to_string(),
        ];
        assert_eq!(normalize_keywords(&input), vec!["sovereignty", "leadership"]);
    }

    #[test]
    fn test_changed_fields_names_only_supplied_fields() {
        let update = KnowledgeUpdate {
            priority: Some(5),
            is_active: Some(false),
            ..Default::default()
        };
        assert_eq!(changed_fields(&update), vec!["priority", "is_active"]);
    }
}
