use axum::extract::{FromRequest, Request};
use axum::Json;
use movies_dal::{CreateMovie, UpdateMovie, ValidationErrors};
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;

/// Payload types that can be checked against raw JSON.
pub trait FromPayload: Sized {
    fn from_payload(payload: &Value) -> Result<Self, ValidationErrors>;
}

impl FromPayload for CreateMovie {
    fn from_payload(payload: &Value) -> Result<Self, ValidationErrors> {
        CreateMovie::from_json(payload)
    }
}

impl FromPayload for UpdateMovie {
    fn from_payload(payload: &Value) -> Result<Self, ValidationErrors> {
        UpdateMovie::from_json(payload)
    }
}

/// JSON body extractor that only succeeds for a valid payload.
///
/// Rejects with [`ApiError::InvalidBody`] when the body is not JSON and with
/// [`ApiError::InvalidPayload`], carrying every field error, when it does not
/// validate.
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

impl<T, S> FromRequest<S> for Validated<T>
where
    T: FromPayload,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<Value>::from_request(req, state).await?;
        let value =
            T::from_payload(&payload).inspect_err(|e| debug!("Invalid payload: {e}"))?;
        Ok(Validated(value))
    }
}
