use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS settings (
        id SERIAL PRIMARY KEY,
        email TEXT NOT NULL,
        job_query TEXT NOT NULL DEFAULT 'Software Engineer',
        expected_salary BIGINT NOT NULL DEFAULT 100000,
        match_threshold INTEGER NOT NULL DEFAULT 7,
        job_limit INTEGER NOT NULL DEFAULT 30,
        auto_run BOOLEAN NOT NULL DEFAULT false,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS resumes (
        id SERIAL PRIMARY KEY,
        filename TEXT NOT NULL,
        raw_text TEXT NOT NULL,
        parsed_text TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS job_matches (
        id SERIAL PRIMARY KEY,
        job_title TEXT NOT NULL,
        company TEXT NOT NULL,
        employment_type TEXT NOT NULL,
        remote TEXT NOT NULL,
        salary TEXT NOT NULL,
        benefits TEXT NOT NULL,
        responsibilities TEXT NOT NULL,
        qualifications TEXT NOT NULL,
        apply_links TEXT[] NOT NULL DEFAULT '{}',
        match_score SMALLINT NOT NULL CHECK (match_score BETWEEN 0 AND 10),
        match_reason TEXT NOT NULL,
        kind TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS run_history (
        id SERIAL PRIMARY KEY,
        status TEXT NOT NULL,
        jobs_found INTEGER NOT NULL,
        jobs_matched INTEGER NOT NULL,
        email_sent BOOLEAN NOT NULL,
        error_message TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
];

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

/// Creates missing tables and seeds a default settings row on first boot.
pub async fn init_schema(pool: &PgPool, default_email: &str) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM settings")
        .fetch_one(pool)
        .await?;

    if existing == 0 {
        sqlx::query("INSERT INTO settings (email) VALUES ($1)")
            .bind(default_email)
            .execute(pool)
            .await?;
        info!("Seeded default settings for {default_email}");
    }

    info!("Database schema ready");
    Ok(())
}
