use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/medivia.db?mode=rwc";

pub async fn create_pool() -> Result<SqlitePool, sqlx::Error> {
    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    // Ensure the data directory exists before SQLite tries to open the file
    let file_path = database_url
        .trim_start_matches("sqlite://")
        .split('?')
        .next()
        .unwrap_or_default();
    if let Some(parent) = std::path::Path::new(file_path).parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    Ok(pool)
}
