use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use chefdeck_recipe::{DEFAULT_PAGE_LIMIT, RecipeInput, RecipesQuery};
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::AuthSession,
    error::{ApiError, Data},
    routes::AppState,
};

#[derive(Deserialize)]
pub struct ListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub q: Option<String>,
    /// Comma-separated
    pub tags: Option<String>,
}

impl From<ListParams> for RecipesQuery {
    fn from(params: ListParams) -> Self {
        RecipesQuery {
            page: params.page.unwrap_or(1),
            limit: params.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
            q: params.q,
            tags: params
                .tags
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }
}

#[tracing::instrument(skip_all, fields(user_id = session.user_id))]
pub async fn list(
    AuthSession(session): AuthSession,
    State(app): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app.recipe_query.filter(&session, params.into()).await?;

    Ok(Data(page))
}

#[derive(Deserialize)]
pub struct WhichExistInput {
    pub ids: Vec<String>,
}

pub async fn which_exist(
    AuthSession(session): AuthSession,
    State(app): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<WhichExistInput>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let existence = app.recipe_query.which_exist(&session, &input.ids).await?;

    Ok(Data(existence))
}

#[tracing::instrument(skip_all, fields(user_id = session.user_id))]
pub async fn create(
    AuthSession(session): AuthSession,
    State(app): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<RecipeInput>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let id = app.recipe_command.create(&session, input).await?;

    Ok((StatusCode::CREATED, Data(json!({ "id": id }))))
}

#[derive(Deserialize)]
pub struct ImportInput {
    #[serde(default)]
    pub url: String,
}

#[tracing::instrument(skip_all, fields(user_id = session.user_id))]
pub async fn import(
    AuthSession(session): AuthSession,
    State(app): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<ImportInput>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let id = app
        .recipe_command
        .import(&session, app.scraper.as_ref(), &input.url)
        .await?;

    Ok((StatusCode::CREATED, Data(json!({ "id": id }))))
}

pub async fn detail(
    AuthSession(session): AuthSession,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, ApiError> {
    let recipe = app.recipe_query.find(&session, &id).await?;

    Ok(Data(recipe))
}

#[tracing::instrument(skip_all, fields(user_id = session.user_id, recipe_id = id))]
pub async fn update(
    AuthSession(session): AuthSession,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
    WithRejection(Json(input), _): WithRejection<Json<RecipeInput>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    app.recipe_command.update(&session, &id, input).await?;

    Ok(Data(json!({ "id": id })))
}

#[tracing::instrument(skip_all, fields(user_id = session.user_id, recipe_id = id))]
pub async fn delete(
    AuthSession(session): AuthSession,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, ApiError> {
    app.recipe_command.delete(&session, &id).await?;

    Ok(Data(json!({ "id": id })))
}
