use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Idempotent schema bootstrap, run once at startup.
///
/// `matched_entry_id` on conversation_turns is intentionally not a foreign
/// key: turns outlive the entries that answered them and keep the id as a
/// historical pointer.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    const STATEMENTS: &[&str] = &[
        r#"
        CREATE TABLE IF NOT EXISTS knowledge_entries (
            id BIGSERIAL PRIMARY KEY,
            category TEXT NOT NULL DEFAULT 'custom',
            question TEXT NOT NULL,
            answer TEXT NOT NULL,
            keywords TEXT[] NOT NULL DEFAULT '{}',
            priority INT NOT NULL DEFAULT 0,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            usage_count BIGINT NOT NULL DEFAULT 0,
            last_used_at TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS conversation_turns (
            id BIGSERIAL PRIMARY KEY,
            session_id TEXT NOT NULL,
            role TEXT NOT NULL,
            message TEXT NOT NULL,
            matched_entry_id BIGINT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS chat_feedback (
            id BIGSERIAL PRIMARY KEY,
            turn_id BIGINT NOT NULL,
            rating TEXT NOT NULL,
            comment TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS training_audit (
            id BIGSERIAL PRIMARY KEY,
            action TEXT NOT NULL,
            knowledge_id BIGINT,
            details JSONB,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_turns_session ON conversation_turns (session_id, created_at)",
        "CREATE INDEX IF NOT EXISTS idx_knowledge_active ON knowledge_entries (is_active)",
    ];

    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema bootstrapped");
    Ok(())
}
