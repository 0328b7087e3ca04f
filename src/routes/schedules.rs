use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use chefdeck_schedule::{ScheduleInput, parse_date};
use serde::Deserialize;

use crate::{
    auth::AuthSession,
    error::{ApiError, Data},
    routes::AppState,
};

pub async fn list(
    AuthSession(session): AuthSession,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, ApiError> {
    let schedules = app.schedule_query.find_by_recipe(&session, &id).await?;

    Ok(Data(schedules))
}

#[derive(Deserialize)]
pub struct UpdateInput {
    pub data: Vec<ScheduleInput>,
}

#[tracing::instrument(skip_all, fields(user_id = session.user_id, recipe_id = id))]
pub async fn update(
    AuthSession(session): AuthSession,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
    WithRejection(Json(input), _): WithRejection<Json<UpdateInput>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let schedules = app
        .schedule_command
        .replace(&session, &id, &input.data)
        .await?;

    Ok(Data(schedules))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledParams {
    pub start_date: String,
    pub end_date: String,
}

#[tracing::instrument(skip_all, fields(user_id = session.user_id))]
pub async fn scheduled(
    AuthSession(session): AuthSession,
    State(app): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ScheduledParams>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let start = parse_date(&params.start_date)?;
    let end = parse_date(&params.end_date)?;
    let occurrences = app.schedule_query.scheduled(&session, start, end).await?;

    Ok(Data(occurrences))
}
