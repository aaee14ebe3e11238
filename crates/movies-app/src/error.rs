use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use movies_dal::ValidationErrors;
use serde_json::json;
use tracing::error;

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0} not found")]
    ResourceNotFound(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] ValidationErrors),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] QueryRejection),

    #[error("Origin not allowed: {0}")]
    OriginNotAllowed(String),

    #[error("Data error: {0}")]
    DataError(movies_dal::Error),
}

impl From<movies_dal::Error> for ApiError {
    fn from(e: movies_dal::Error) -> Self {
        match e {
            movies_dal::Error::RecordNotFound(what) => ApiError::ResourceNotFound(what),
            other => ApiError::DataError(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::ResourceNotFound(what) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": format!("{what} not found") })),
            )
                .into_response(),
            ApiError::InvalidPayload(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": errors }))).into_response()
            }
            ApiError::InvalidBody(rejection) => {
                // a missing JSON content type is reported like any unreadable body
                let status = match rejection {
                    JsonRejection::MissingJsonContentType(_) => StatusCode::BAD_REQUEST,
                    ref other => other.status(),
                };
                let body = json!({
                    "error": [{ "field": "body", "message": rejection.body_text() }]
                });
                (status, Json(body)).into_response()
            }
            ApiError::InvalidQuery(rejection) => {
                let body = json!({
                    "error": [{ "field": "genre", "message": rejection.body_text() }]
                });
                (rejection.status(), Json(body)).into_response()
            }
            ApiError::OriginNotAllowed(_) => (
                StatusCode::FORBIDDEN,
                Json(json!({ "message": "Not allowed by CORS" })),
            )
                .into_response(),
            ApiError::DataError(e) => {
                error!("Data error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
