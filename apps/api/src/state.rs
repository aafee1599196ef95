use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::knowledge::matching::Matcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Pluggable matcher. Default: KeywordMatcher with config-driven weights.
    pub matcher: Arc<dyn Matcher>,
}
