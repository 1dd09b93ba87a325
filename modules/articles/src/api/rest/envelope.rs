//! Request validation for write verbs: every body must be JSON with the
//! payload wrapped in a top-level `data` key.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::api::rest::error::{map_envelope_error, ProblemContext};
use crate::api::rest::problem::ProblemResponse;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("Malformed JSON: {0}")]
    MalformedJson(String),

    #[error("Invalid JSON format. Data should be wrapped inside a 'data' key.")]
    MissingData,

    #[error("Invalid 'data' payload: {0}")]
    InvalidData(String),
}

/// Parse `raw` and return the value under `data`. A `null` data counts as missing.
pub fn unwrap_envelope(raw: &[u8]) -> Result<Value, EnvelopeError> {
    let parsed: Value =
        serde_json::from_slice(raw).map_err(|e| EnvelopeError::MalformedJson(e.to_string()))?;

    match parsed {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Null) | None => Err(EnvelopeError::MissingData),
            Some(data) => Ok(data),
        },
        _ => Err(EnvelopeError::MissingData),
    }
}

/// Unwrap the envelope and decode `data` into `T`.
pub fn decode_data<T: DeserializeOwned>(raw: &[u8]) -> Result<T, EnvelopeError> {
    let data = unwrap_envelope(raw)?;
    if !data.is_object() {
        return Err(EnvelopeError::InvalidData(
            "'data' must be a JSON object".to_string(),
        ));
    }
    serde_json::from_value(data).map_err(|e| EnvelopeError::InvalidData(e.to_string()))
}

/// Extractor counterpart of [`decode_data`]; rejects with a 400 problem.
#[derive(Debug, Clone)]
pub struct Envelope<T>(pub T);

/// Why an [`Envelope`] could not be extracted.
#[derive(Debug)]
pub enum EnvelopeRejection {
    /// Body exceeded the configured size limit; answered with axum's own 413.
    TooLarge(BytesRejection),
    Invalid(ProblemResponse),
}

impl IntoResponse for EnvelopeRejection {
    fn into_response(self) -> Response {
        match self {
            EnvelopeRejection::TooLarge(rejection) => rejection.into_response(),
            EnvelopeRejection::Invalid(problem) => problem.into_response(),
        }
    }
}

impl<S, T> FromRequest<S> for Envelope<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = EnvelopeRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = ProblemContext::from_head(req.uri(), req.headers());
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                EnvelopeRejection::TooLarge(e)
            } else {
                EnvelopeRejection::Invalid(map_envelope_error(
                    &EnvelopeError::MalformedJson(e.body_text()),
                    &ctx,
                ))
            }
        })?;
        decode_data(&bytes)
            .map(Envelope)
            .map_err(|e| EnvelopeRejection::Invalid(map_envelope_error(&e, &ctx)))
    }
}
