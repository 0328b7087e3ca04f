use async_trait::async_trait;
use chefdeck_shared::{Color, Ingredient};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::RecipeInput;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Too many requests. Try again in a minute.")]
    RateLimited,

    #[error("That website doesn't permit chefdeck to access its recipes.")]
    Forbidden,

    #[error("Error fetching recipe from website, check the URL.")]
    FetchFailed,

    #[error("{0}")]
    Data(#[from] chefdeck_shared::Error),
}

/// Recipe as extracted from a web page by the scraping service.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ScrapedRecipe {
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub minutes: Option<u32>,
    #[serde(default)]
    pub directions: Vec<String>,
    #[serde(default)]
    pub source_url: Option<String>,
}

impl ScrapedRecipe {
    /// Input for [`crate::Command::create`]. Blank directions are dropped and
    /// `url` stands in when the page reported no source of its own.
    pub fn into_input(self, url: &str) -> RecipeInput {
        RecipeInput {
            title: self.title,
            servings: self.servings.unwrap_or(1).max(1),
            minutes: self.minutes.unwrap_or_default(),
            source_url: self
                .source_url
                .filter(|source| !source.trim().is_empty())
                .or_else(|| Some(url.trim().to_owned())),
            color: Color::White,
            ingredients: self.ingredients,
            directions: self
                .directions
                .into_iter()
                .filter(|d| !d.trim().is_empty())
                .collect(),
            tags: vec![],
        }
    }
}

#[async_trait]
pub trait ScrapeRecipe: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ScrapedRecipe, ImportError>;
}

/// Client for the external `GET /scrape-recipe?url=` endpoint.
#[derive(Clone)]
pub struct HttpScrapeClient {
    api_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpScrapeClient {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/scrape-recipe", self.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ScrapeRecipe for HttpScrapeClient {
    #[tracing::instrument(skip(self))]
    async fn scrape(&self, url: &str) -> Result<ScrapedRecipe, ImportError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[("url", url)])
            .header("X-API-Key", &self.api_key)
            .send()
            .await
            .map_err(|err| {
                tracing::error!("scrape-recipe request failed: {err}");
                ImportError::FetchFailed
            })?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::TOO_MANY_REQUESTS => {
                tracing::warn!("scrape-recipe rate limited");
                return Err(ImportError::RateLimited);
            }
            StatusCode::FORBIDDEN => return Err(ImportError::Forbidden),
            status => {
                tracing::warn!(%status, "scrape-recipe returned an error");
                return Err(ImportError::FetchFailed);
            }
        }

        response.json::<ScrapedRecipe>().await.map_err(|err| {
            tracing::error!("scrape-recipe returned an invalid body: {err}");
            ImportError::FetchFailed
        })
    }
}
