use async_trait::async_trait;
use chefdeck_shared::Ingredient;
use reqwest::StatusCode;

use crate::GroceryError;

/// Service combining ingredient lines that refer to the same product
/// ("2 cup flour" + "1 cup flour").
#[async_trait]
pub trait MergeIngredients: Send + Sync {
    async fn merge(&self, ingredients: &[Ingredient]) -> Result<Vec<Ingredient>, GroceryError>;
}

/// Client for the external `POST /merge-ingredients` endpoint. One attempt
/// per call, no retries.
#[derive(Clone)]
pub struct HttpMergeClient {
    api_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpMergeClient {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/merge-ingredients", self.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl MergeIngredients for HttpMergeClient {
    #[tracing::instrument(skip_all, fields(count = ingredients.len()))]
    async fn merge(&self, ingredients: &[Ingredient]) -> Result<Vec<Ingredient>, GroceryError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("X-API-Key", &self.api_key)
            .json(ingredients)
            .send()
            .await
            .map_err(|err| {
                tracing::error!("merge-ingredients request failed: {err}");
                GroceryError::MergeFailed
            })?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::TOO_MANY_REQUESTS => {
                tracing::warn!("merge-ingredients rate limited");
                return Err(GroceryError::RateLimited);
            }
            status => {
                tracing::error!(%status, "merge-ingredients returned an error");
                return Err(GroceryError::MergeFailed);
            }
        }

        response.json::<Vec<Ingredient>>().await.map_err(|err| {
            tracing::error!("merge-ingredients returned an invalid body: {err}");
            GroceryError::MergeFailed
        })
    }
}
