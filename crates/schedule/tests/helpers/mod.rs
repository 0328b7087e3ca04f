#![allow(dead_code)]

use chefdeck_shared::State;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use std::{path::PathBuf, str::FromStr};

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    chefdeck_db::migrator::<sqlx::Sqlite>()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(State {
        read_db: pool.clone(),
        write_db: pool,
    })
}

pub async fn insert_recipe(
    state: &State,
    id: &str,
    user_id: &str,
    title: &str,
    color: &str,
) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO recipe (id, user_id, title, servings, minutes, color, created_at) VALUES (?, ?, ?, 2, 30, ?, 0)",
    )
    .bind(id)
    .bind(user_id)
    .bind(title)
    .bind(color)
    .execute(&state.write_db)
    .await?;

    Ok(())
}
