#![allow(dead_code)]

use chefdeck_recipe::RecipeInput;
use chefdeck_shared::{Color, Ingredient, State};
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

pub fn recipe(title: &str, tags: &[&str]) -> RecipeInput {
    RecipeInput {
        title: title.to_owned(),
        servings: 2,
        minutes: 25,
        source_url: None,
        color: Color::Green,
        ingredients: vec![
            Ingredient::new("flour", 1.5, "cup"),
            Ingredient::new("eggs", 2.0, "count"),
        ],
        directions: vec!["Mix".to_owned(), "Bake".to_owned()],
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

pub async fn set_created_at(state: &State, id: &str, created_at: i64) -> anyhow::Result<()> {
    sqlx::query("UPDATE recipe SET created_at = ? WHERE id = ?")
        .bind(created_at)
        .bind(id)
        .execute(&state.write_db)
        .await?;

    Ok(())
}

pub async fn count(state: &State, table: &str, recipe_id: &str) -> anyhow::Result<i64> {
    let (count,) = sqlx::query_as::<_, (i64,)>(&format!(
        "SELECT COUNT(*) FROM {table} WHERE recipe_id = ?"
    ))
    .bind(recipe_id)
    .fetch_one(&state.read_db)
    .await?;

    Ok(count)
}
