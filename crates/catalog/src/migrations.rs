use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};

pub async fn ensure_database_exists(database_url: &str) -> Result<()> {
    if database_url.contains(":memory:") {
        return Ok(());
    }

    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        Sqlite::create_database(database_url).await?;
        tracing::info!("Database created: {}", database_url);
    }
    Ok(())
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pdf_files (
            id TEXT PRIMARY KEY NOT NULL,
            filename TEXT NOT NULL UNIQUE,
            original_name TEXT NOT NULL,
            name TEXT NOT NULL,
            year INTEGER NOT NULL,
            type TEXT NOT NULL,
            file_size INTEGER NOT NULL,
            file_url TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_pdf_files_year_type ON pdf_files (year, type)")
        .execute(pool)
        .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
