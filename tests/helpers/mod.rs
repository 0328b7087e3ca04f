#![allow(dead_code)]

use std::{
    str::FromStr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chefdeck::{AppState, auth::generate_token};
use chefdeck_recipe::{ImportError, ScrapeRecipe, ScrapedRecipe};
use chefdeck_shared::{Ingredient, State};
use chefdeck_shopping::{GroceryError, MergeIngredients};
use http_body_util::BodyExt;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use temp_dir::TempDir;
use tower::ServiceExt;

pub const SECRET: &str = "test_secret_key_minimum_32_characters_long";

/// Stands in for the merge service: records every request and answers with
/// the configured outcome.
#[derive(Default)]
pub struct StubMerger {
    pub calls: AtomicUsize,
    pub received: Mutex<Vec<Ingredient>>,
    pub outcome: Outcome,
}

#[derive(Default, Clone, Copy)]
pub enum Outcome {
    /// Sum amounts of lines sharing name and unit.
    #[default]
    Sum,
    RateLimited,
    Failed,
}

#[async_trait]
impl MergeIngredients for StubMerger {
    async fn merge(&self, ingredients: &[Ingredient]) -> Result<Vec<Ingredient>, GroceryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut received) = self.received.lock() {
            received.extend_from_slice(ingredients);
        }

        match self.outcome {
            Outcome::RateLimited => Err(GroceryError::RateLimited),
            Outcome::Failed => Err(GroceryError::MergeFailed),
            Outcome::Sum => {
                let mut merged: Vec<Ingredient> = vec![];
                for ingredient in ingredients {
                    match merged
                        .iter_mut()
                        .find(|m| m.name == ingredient.name && m.unit == ingredient.unit)
                    {
                        Some(existing) => existing.amount += ingredient.amount,
                        None => merged.push(ingredient.clone()),
                    }
                }
                Ok(merged)
            }
        }
    }
}

/// Stands in for the scraping service: answers every page with the same
/// recipe, or with `error` when set.
#[derive(Default)]
pub struct StubScraper {
    pub calls: AtomicUsize,
    pub error: Mutex<Option<fn() -> ImportError>>,
}

#[async_trait]
impl ScrapeRecipe for StubScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedRecipe, ImportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.error.lock().ok().and_then(|e| *e) {
            return Err(error());
        }

        Ok(ScrapedRecipe {
            title: "Focaccia".to_owned(),
            ingredients: vec![Ingredient::new("flour", 500.0, "g")],
            servings: Some(6),
            minutes: Some(90),
            directions: vec!["Knead".to_owned(), "Bake".to_owned()],
            source_url: Some(url.to_owned()),
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: State,
    pub merger: Arc<StubMerger>,
    pub scraper: Arc<StubScraper>,
    _dir: TempDir,
}

pub async fn setup_test_app(outcome: Outcome) -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    chefdeck_db::migrator::<sqlx::Sqlite>()?
        .run(&mut conn, &Plan::apply_all())
        .await?;
    drop(conn);

    let state = State::new(pool.clone(), pool);
    let merger = Arc::new(StubMerger {
        outcome,
        ..Default::default()
    });
    let scraper = Arc::new(StubScraper::default());
    let router = chefdeck::router(AppState::new(
        state.clone(),
        merger.clone(),
        scraper.clone(),
        SECRET,
    ));

    Ok(TestApp {
        router,
        state,
        merger,
        scraper,
        _dir: dir,
    })
}

pub fn token(user_id: &str) -> String {
    generate_token(user_id, SECRET, 3600).unwrap()
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        user_id: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> anyhow::Result<(StatusCode, String)> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(user_id) = user_id {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token(user_id)));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();

        Ok((status, String::from_utf8(bytes.to_vec())?))
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        user_id: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> anyhow::Result<(StatusCode, serde_json::Value)> {
        let (status, text) = self.request(method, uri, user_id, body).await?;

        Ok((status, serde_json::from_str(&text)?))
    }

    pub async fn create_recipe(
        &self,
        user_id: &str,
        body: serde_json::Value,
    ) -> anyhow::Result<String> {
        let (status, body) = self
            .json(Method::POST, "/api/recipe/new", Some(user_id), Some(body))
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create failed: {body}");

        Ok(body["data"]["id"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("missing id"))?
            .to_owned())
    }
}
