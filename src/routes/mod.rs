use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use chefdeck_recipe::ScrapeRecipe;
use chefdeck_shopping::MergeIngredients;
use sqlx::SqlitePool;

mod calendar;
mod groceries;
mod health;
mod recipes;
mod schedules;
mod tags;

#[derive(Clone)]
pub struct AppState {
    pub jwt_secret: Arc<str>,
    pub recipe_command: chefdeck_recipe::Command,
    pub recipe_query: chefdeck_recipe::Query,
    pub schedule_command: chefdeck_schedule::Command,
    pub schedule_query: chefdeck_schedule::Query,
    pub groceries: chefdeck_shopping::Service,
    pub scraper: Arc<dyn ScrapeRecipe>,
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(
        state: chefdeck_shared::State,
        merger: Arc<dyn MergeIngredients>,
        scraper: Arc<dyn ScrapeRecipe>,
        jwt_secret: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            recipe_command: chefdeck_recipe::Command(state.clone()),
            recipe_query: chefdeck_recipe::Query(state.clone()),
            schedule_command: chefdeck_schedule::Command(state.clone()),
            schedule_query: chefdeck_schedule::Query(state.clone()),
            groceries: chefdeck_shopping::Service::new(state.clone(), merger),
            scraper,
            pool: state.read_db,
        }
    }
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        // Health check endpoints (no auth required)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .merge(api().with_state(app_state))
}

fn api() -> Router<AppState> {
    Router::new()
        .route("/api/recipes", get(recipes::list))
        .route("/api/recipes/which-exist", post(recipes::which_exist))
        .route("/api/recipes/scheduled", get(schedules::scheduled))
        .route("/api/recipe/new", post(recipes::create))
        .route("/api/recipe/new/from-web", post(recipes::import))
        .route("/api/recipe/{id}", get(recipes::detail))
        .route("/api/recipe/{id}/update", post(recipes::update))
        .route("/api/recipe/{id}/delete", post(recipes::delete))
        .route("/api/recipe/{id}/schedules", get(schedules::list))
        .route("/api/recipe/{id}/schedules/update", post(schedules::update))
        .route("/api/calendar", get(calendar::month))
        .route("/api/groceries", get(groceries::list))
        .route("/api/tags", get(tags::list))
        .route("/api/tags/delete", post(tags::delete))
}
