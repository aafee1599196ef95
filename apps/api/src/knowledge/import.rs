//! Bulk import — partial success by design. Bad rows are reported with their
//! index and skipped; valid rows are always created.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::knowledge::store::{create_entry, validate_entry_fields, NewKnowledgeEntry};

fn default_category() -> String {
    "custom".to_string()
}

/// One row of the flat import shape (the admin Import button's JSON array).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRow {
    pub question: String,
    pub answer: String,
    #[serde(default = "default_category")]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRowError {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub imported_count: usize,
    pub errors: Vec<ImportRowError>,
}

/// Splits rows into insertable entries and per-row errors. Pure — the
/// database half of the import never sees an invalid row.
pub fn screen_rows(rows: &[ImportRow]) -> (Vec<&ImportRow>, Vec<ImportRowError>) {
    let mut valid = Vec::new();
    let mut errors = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        match validate_entry_fields(&row.question, &row.answer) {
            Ok(()) => valid.push(row),
            Err(reason) => errors.push(ImportRowError { index, reason }),
        }
    }
    (valid, errors)
}

pub async fn import_entries(pool: &PgPool, rows: &[ImportRow]) -> Result<ImportReport, AppError> {
    let (valid, errors) = screen_rows(rows);

    let mut imported_count = 0;
    for row in valid {
        let new = NewKnowledgeEntry {
            category: row.category.clone(),
            question: row.question.clone(),
            answer: row.answer.clone(),
            keywords: Vec::new(),
            priority: 0,
        };
        create_entry(pool, &new).await?;
        imported_count += 1;
    }

    info!(
        "Imported {imported_count} knowledge entries ({} rows rejected)",
        errors.len()
    );
    Ok(ImportReport {
        imported_count,
        errors,
    })
}
