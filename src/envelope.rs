//! The response envelope every adapter answers with:
//! `{"timings": "0.42", "response": {"body": <payload>}}`.

use std::time::Instant;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Serialize, Serializer};

use crate::error::AdapterError;

/// Outcome tag embedded in every payload under `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success = 0,
    NotFound = 1,
    Error = 2,
}

impl Status {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Payload used for every failed call and for the fixed stub routes.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub status: Status,
    pub message: String,
}

impl Failure {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<&AdapterError> for Failure {
    fn from(err: &AdapterError) -> Self {
        Failure::new(err.status(), err.to_string())
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Body<T> {
    Payload(T),
    Failure(Failure),
}

const ENCODE_FALLBACK: &str =
    r#"{"timings":"0.00","response":{"body":{"status":2,"message":"failed to encode response"}}}"#;

/// Wraps a payload with the elapsed time since `started`. Timing is taken when
/// the response is encoded, not when the envelope is built.
#[derive(Debug)]
pub struct ApiResponse<T> {
    started: Instant,
    body: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(started: Instant, body: T) -> Self {
        Self { started, body }
    }

    pub fn body(&self) -> &T {
        &self.body
    }

    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        #[derive(Serialize)]
        struct Wire<'a, T> {
            timings: String,
            response: WireResponse<'a, T>,
        }

        #[derive(Serialize)]
        struct WireResponse<'a, T> {
            body: &'a T,
        }

        serde_json::to_vec(&Wire {
            timings: format_timings(self.started),
            response: WireResponse { body: &self.body },
        })
    }
}

impl<T: Serialize> ApiResponse<Body<T>> {
    /// Converts an adapter result into an envelope. Failures are logged here so
    /// every route reports them the same way.
    pub fn from_result(started: Instant, result: Result<T, AdapterError>) -> Self {
        match result {
            Ok(payload) => Self::new(started, Body::Payload(payload)),
            Err(err) => {
                tracing::warn!(status = err.status().code(), error = %err, "adapter call failed");
                if let Some(source) = std::error::Error::source(&err) {
                    tracing::debug!(cause = %source, "adapter failure cause");
                }
                Self::new(started, Body::Failure(Failure::from(&err)))
            }
        }
    }
}

impl ApiResponse<Failure> {
    pub fn not_implemented(started: Instant) -> Self {
        Self::new(started, Failure::new(Status::Error, "not implemented"))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let bytes = match self.encode() {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("failed to encode API response: {}", e);
                ENCODE_FALLBACK.as_bytes().to_vec()
            }
        };
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            bytes,
        )
            .into_response()
    }
}

/// Seconds since `started`, two decimals.
pub fn format_timings(started: Instant) -> String {
    format!("{:.2}", started.elapsed().as_secs_f64())
}
