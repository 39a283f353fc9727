use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use super::AppState;

/// Requires `Authorization: Bearer <api key>`. The scheme is matched
/// case-insensitively, the key exactly.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    match check(header_value, &state.api_key) {
        Ok(()) => next.run(request).await,
        Err(message) => {
            tracing::debug!(path = %request.uri().path(), reason = message, "rejected request");
            (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
        }
    }
}

pub fn check(header_value: &str, api_key: &str) -> Result<(), &'static str> {
    if header_value.is_empty() {
        return Err("missing authorization header");
    }
    let token = match header_value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token,
        _ => return Err("invalid authorization header format"),
    };
    if token != api_key {
        return Err("invalid api key");
    }
    Ok(())
}
