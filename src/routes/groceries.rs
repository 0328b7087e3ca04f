use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use chefdeck_schedule::parse_date;
use chefdeck_shopping::ingredient_line;
use serde::Deserialize;

use crate::{
    auth::AuthSession,
    error::{ApiError, Data},
    routes::AppState,
};

#[derive(Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    /// One printable line per ingredient.
    Text,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceriesParams {
    pub from_date: String,
    pub to_date: String,
    #[serde(default)]
    pub format: Format,
}

#[tracing::instrument(skip_all, fields(user_id = session.user_id))]
pub async fn list(
    AuthSession(session): AuthSession,
    State(app): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<GroceriesParams>, ApiError>,
) -> Result<Response, ApiError> {
    let from = parse_date(&params.from_date)?;
    let to = parse_date(&params.to_date)?;
    let groceries = app.groceries.groceries(&session, from, to).await?;

    if params.format == Format::Json {
        return Ok(Data(groceries).into_response());
    }

    let mut text = groceries
        .iter()
        .map(ingredient_line)
        .collect::<Vec<_>>()
        .join("\n");
    if !text.is_empty() {
        text.push('\n');
    }

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        text,
    )
        .into_response())
}
