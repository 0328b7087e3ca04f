use anyhow::Result;
use sqlx::{Sqlite, migrate::MigrateDatabase};
use sqlx_migrator::{Migrate, Plan};

use crate::config::Config;

/// Apply every pending migration, creating the database file if needed.
pub async fn migrate(config: &Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    let pool = crate::db::create_write_pool(&config.database.url).await?;
    run_migrations(&pool).await?;
    pool.close().await;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

/// Drop the database if it exists and recreate it with migrations.
pub async fn reset(config: &Config) -> Result<()> {
    tracing::info!("Resetting database...");

    if Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!("Dropping existing database: {}", config.database.url);
        Sqlite::drop_database(&config.database.url).await?;
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate(config).await?;

    tracing::info!("Database reset completed successfully");

    Ok(())
}

pub(crate) async fn run_migrations(pool: &sqlx::SqlitePool) -> Result<()> {
    let mut conn = pool.acquire().await?;
    chefdeck_db::migrator::<Sqlite>()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(())
}
