use std::path::Path;

use anyhow::Context;
use sqlx::{
    SqliteConnection,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous},
};
use time::OffsetDateTime;

/// Open (creating if missing) the storage database and bring its schema up to date.
pub(super) async fn connect(db_file: &Path) -> anyhow::Result<SqlitePool> {
    if let Some(parent) = db_file.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            anyhow::bail!("Storage directory does not exist: {:?}", parent);
        }
    }

    let connect_opts = SqliteConnectOptions::new()
        .filename(db_file)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_opts)
        .await
        .with_context(|| format!("Failed to open storage database {:?}", db_file))?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}

pub(super) async fn read_item(conn: &mut SqliteConnection, key: &str) -> anyhow::Result<Option<String>> {
    let value = sqlx::query_scalar::<_, String>("SELECT value FROM local_storage WHERE key = $1")
        .bind(key)
        .fetch_optional(conn)
        .await?;
    Ok(value)
}

pub(super) async fn write_item(conn: &mut SqliteConnection, key: &str, value: &str) -> anyhow::Result<()> {
    let updated_at = OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339)?;
    sqlx::query(
        r#"INSERT INTO local_storage (key, value, updated_at) VALUES ($1, $2, $3)
        ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at"#,
    )
    .bind(key)
    .bind(value)
    .bind(updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub(super) async fn remove_item(conn: &mut SqliteConnection, key: &str) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM local_storage WHERE key = $1")
        .bind(key)
        .execute(conn)
        .await?;
    Ok(())
}
