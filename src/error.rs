use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chefdeck_recipe::ImportError;
use chefdeck_shopping::GroceryError;
use serde::Serialize;
use thiserror::Error;

pub const SERVER_ERROR_MESSAGE: &str = "Internal Server Error. Please try again later.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized. Please log in to access your recipes.")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("No recipes found.")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Too many requests. Try again in a minute.")]
    RateLimited,

    #[error("Could not merge ingredients.")]
    MergeFailed,

    #[error("Error fetching recipe from website, check the URL.")]
    ImportFailed,

    #[error("Internal Server Error. Please try again later.")]
    Internal(String),
}

impl From<chefdeck_shared::Error> for ApiError {
    fn from(err: chefdeck_shared::Error) -> Self {
        use chefdeck_shared::Error;

        match err {
            Error::Validate(errors) => ApiError::Validation(errors.to_string()),
            Error::Invalid(message) => ApiError::Validation(message),
            Error::NotFound => ApiError::NotFound,
            Error::Server(message) => ApiError::Internal(message),
            Error::Unknown(err) => ApiError::Internal(format!("{err:?}")),
        }
    }
}

impl From<GroceryError> for ApiError {
    fn from(err: GroceryError) -> Self {
        match err {
            GroceryError::InvalidRange | GroceryError::RangeTooLong => {
                ApiError::Validation(err.to_string())
            }
            GroceryError::RateLimited => ApiError::RateLimited,
            GroceryError::MergeFailed => ApiError::MergeFailed,
            GroceryError::Data(err) => err.into(),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::RateLimited => ApiError::RateLimited,
            ImportError::Forbidden => ApiError::Forbidden(err.to_string()),
            ImportError::FetchFailed => ApiError::ImportFailed,
            ImportError::Data(err) => err.into(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Serialize)]
struct ErrorMessage {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(message) => {
                tracing::debug!("request rejected: {message}");
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::MergeFailed | ApiError::ImportFailed => StatusCode::BAD_GATEWAY,
            ApiError::Internal(details) => {
                tracing::error!("{details}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            error: ErrorMessage {
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Success envelope: `{ "data": ... }`.
pub struct Data<T>(pub T);

impl<T: Serialize> IntoResponse for Data<T> {
    fn into_response(self) -> Response {
        Json(DataBody { data: self.0 }).into_response()
    }
}

#[derive(Serialize)]
struct DataBody<T> {
    data: T,
}
