//! JSON body extractor that renders failures as the 422 error envelope.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::{core::http::error_envelope::ErrorDetail, error_handler::AppError};

/// Request payloads that check their own fields after deserialization.
pub trait Validate {
    /// The checked value handed to the handler.
    type Valid;

    fn validate(self) -> Result<Self::Valid, Vec<ErrorDetail>>;
}

/// Extracts `T` from a JSON object body and validates it.
///
/// Unreadable bodies, invalid JSON and non-object roots are reported as
/// `{"value": "could not parse body", "param": "invalid", "location": "body"}`.
pub struct ValidJson<T: Validate>(pub T::Valid);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            debug!(error = %e, "json_extractor: body read failed");
            AppError::Validation(vec![ErrorDetail::unparseable_body()])
        })?;

        let value: Value = serde_json::from_slice(&bytes).map_err(|e| {
            debug!(error = %e, "json_extractor: invalid json");
            AppError::Validation(vec![ErrorDetail::unparseable_body()])
        })?;
        if !value.is_object() {
            debug!("json_extractor: body is not an object");
            return Err(AppError::Validation(vec![ErrorDetail::unparseable_body()]));
        }

        let raw: T = serde_json::from_value(value).map_err(|e| {
            debug!(error = %e, "json_extractor: shape mismatch");
            AppError::Validation(vec![ErrorDetail::unparseable_body()])
        })?;

        raw.validate().map(ValidJson).map_err(AppError::Validation)
    }
}
