use std::{str::FromStr, time::Duration};

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{ConnectOptions, SqlitePool};
use tracing::log::LevelFilter;

/// Options shared by both pools. Set on the connect options so every
/// connection the pool opens gets them, not only the first one.
fn connect_options(database_url: &str) -> Result<SqliteConnectOptions> {
    Ok(SqliteConnectOptions::from_str(database_url)?
        .busy_timeout(Duration::from_secs(5))
        .pragma("cache_size", "-20000")
        .pragma("temp_store", "memory")
        .log_statements(LevelFilter::Debug))
}

/// Pool serving recipe, calendar and grocery reads. Connections are opened
/// read-only; the journal mode is left to the write pool.
pub async fn create_read_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(connect_options(database_url)?.read_only(true))
        .await?;

    tracing::info!(max_connections, "read pool ready");

    Ok(pool)
}

/// Pool for commands and migrations. One connection, so writes never race
/// each other for the database lock. Creates the file and switches it to WAL.
pub async fn create_write_pool(database_url: &str) -> Result<SqlitePool> {
    let options = connect_options(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    tracing::info!("write pool ready");

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn pragma_int(pool: &SqlitePool, name: &str) -> i64 {
        let (value,): (i64,) = sqlx::query_as(&format!("PRAGMA {name}"))
            .fetch_one(pool)
            .await
            .unwrap();
        value
    }

    #[tokio::test]
    async fn test_pools_share_one_database_file() {
        let dir = temp_dir::TempDir::new().unwrap();
        let url = format!("sqlite:{}", dir.child("chefdeck.db").display());

        let write_pool = create_write_pool(&url).await.unwrap();
        let (journal_mode,): (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&write_pool)
            .await
            .unwrap();
        assert_eq!(journal_mode, "wal");
        assert_eq!(pragma_int(&write_pool, "synchronous").await, 1);

        sqlx::query("CREATE TABLE note (body TEXT)")
            .execute(&write_pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO note (body) VALUES ('soup on sunday')")
            .execute(&write_pool)
            .await
            .unwrap();

        let read_pool = create_read_pool(&url, 2).await.unwrap();
        let (body,): (String,) = sqlx::query_as("SELECT body FROM note")
            .fetch_one(&read_pool)
            .await
            .unwrap();
        assert_eq!(body, "soup on sunday");
        assert_eq!(pragma_int(&read_pool, "temp_store").await, 2);
        assert_eq!(pragma_int(&read_pool, "busy_timeout").await, 5000);

        assert!(
            sqlx::query("INSERT INTO note (body) VALUES ('stew on monday')")
                .execute(&read_pool)
                .await
                .is_err()
        );
    }
}
