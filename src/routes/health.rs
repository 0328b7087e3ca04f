use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Serialize)]
pub struct HealthStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

pub async fn health() -> impl IntoResponse {
    Json(HealthStatus {
        status: "ok",
        reason: None,
    })
}

/// Ready once the read pool can reach a migrated schedule table. An empty
/// or unmigrated file answers 503 like an unreachable one.
pub async fn ready(State(pool): State<SqlitePool>) -> impl IntoResponse {
    match sqlx::query("SELECT 1 FROM schedule LIMIT 1")
        .fetch_optional(&pool)
        .await
    {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthStatus {
                status: "ready",
                reason: None,
            }),
        ),
        Err(err) => {
            tracing::error!("database not ready: {err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    status: "not_ready",
                    reason: Some("database_unavailable"),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_always_answers() {
        let response = health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_needs_schema_and_connection() {
        let pool = memory_pool().await;

        let response = ready(State(pool.clone())).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        sqlx::query("CREATE TABLE schedule (id TEXT PRIMARY KEY)")
            .execute(&pool)
            .await
            .unwrap();
        let response = ready(State(pool.clone())).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        pool.close().await;
        let response = ready(State(pool)).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
