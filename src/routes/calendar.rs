use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use chrono::Datelike;
use serde::Deserialize;

use crate::{
    auth::AuthSession,
    error::{ApiError, Data},
    routes::AppState,
};

/// Both default to the current month (UTC).
#[derive(Deserialize)]
pub struct MonthParams {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[tracing::instrument(skip_all, fields(user_id = session.user_id))]
pub async fn month(
    AuthSession(session): AuthSession,
    State(app): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<MonthParams>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let today = chrono::Utc::now().date_naive();
    let cells = app
        .schedule_query
        .month(
            &session,
            params.year.unwrap_or(today.year()),
            params.month.unwrap_or(today.month()),
        )
        .await?;

    Ok(Data(cells))
}
