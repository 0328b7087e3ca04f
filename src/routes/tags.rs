use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::AuthSession,
    error::{ApiError, Data},
    routes::AppState,
};

pub async fn list(
    AuthSession(session): AuthSession,
    State(app): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let tags = app.recipe_query.tags(&session).await?;

    Ok(Data(tags))
}

#[derive(Deserialize)]
pub struct DeleteInput {
    pub tag: String,
}

#[tracing::instrument(skip_all, fields(user_id = session.user_id))]
pub async fn delete(
    AuthSession(session): AuthSession,
    State(app): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<DeleteInput>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = app.recipe_command.delete_tag(&session, &input.tag).await?;

    Ok(Data(json!({ "tag": input.tag, "removed": removed })))
}
