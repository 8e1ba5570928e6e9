//! Voice platform invocation endpoint

use std::any::Any;
use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::ApiState;
use crate::Error;
use crate::dispatcher::Outcome;
use crate::speechlet::RequestEnvelope;

/// Body returned when an invocation fails
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handle one platform invocation
///
/// The body is taken as raw bytes and parsed here so that malformed envelopes,
/// including ones that are not UTF-8, get the same error shape as dispatch
/// failures.
pub async fn handle_invocation(State(state): State<Arc<ApiState>>, body: Bytes) -> Response {
    let envelope = match RequestEnvelope::from_slice(&body) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!(error = %e, "rejecting malformed request envelope");
            return failure(&e);
        }
    };

    match state.dispatcher.handle(&envelope).await {
        Ok(Outcome::Respond(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(Outcome::NoContent) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!(
                request_id = envelope.request.request_id(),
                error = %e,
                "invocation failed"
            );
            failure(&e)
        }
    }
}

/// Map an invocation error to the platform failure signal
fn failure(error: &Error) -> Response {
    let status = match error {
        Error::InvalidApplication(_) => StatusCode::FORBIDDEN,
        Error::Serialization(_) => StatusCode::BAD_REQUEST,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

/// Turn a panic caught by the router into an invocation failure
pub fn panic_failure(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = match panic.downcast::<String>() {
        Ok(message) => *message,
        Err(panic) => panic
            .downcast_ref::<&str>()
            .map_or_else(|| "unknown panic".to_string(), |s| (*s).to_string()),
    };

    tracing::error!(panic = %message, "invocation panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("internal error: {message}"),
        }),
    )
        .into_response()
}
