// src/server/error.rs
// =============================================================================
// The one place where failures become HTTP responses.
//
// Three kinds of failure reach the front-end:
// - BadRequest: a query parameter was missing or malformed (400)
// - Upstream:   GitHub said no; its own message is forwarded verbatim
// - Internal:   something broke in between (network, decoding, ...) (500)
//
// Handlers return Result<_, ApiError>, and axum calls into_response() on
// the error side. Every body has the shape {"error": ...}, plus "details"
// for internal errors.
// =============================================================================

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::github::GithubError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("{error}: {details}")]
    Internal { error: &'static str, details: String },
}

impl ApiError {
    /// Classifies a GitHub failure.
    ///
    /// Errors GitHub reported itself become `Upstream` with `status`;
    /// anything else becomes `Internal` with the `generic` message.
    pub fn from_github(err: GithubError, status: StatusCode, generic: &'static str) -> Self {
        match err.upstream_message() {
            Some(message) => ApiError::Upstream {
                status,
                message: message.to_string(),
            },
            None => ApiError::Internal {
                error: generic,
                details: err.to_string(),
            },
        }
    }
}

/// Unwraps a query extractor. A query string axum can't deserialize
/// (duplicate keys, bad encoding) is answered with the route's own `message`.
pub fn parse_query<T>(
    query: Result<Query<T>, QueryRejection>,
    message: &'static str,
) -> Result<T, ApiError> {
    match query {
        Ok(Query(params)) => Ok(params),
        Err(rejection) => {
            tracing::debug!(%rejection, "malformed query string");
            Err(ApiError::BadRequest(message))
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                tracing::debug!(reason = message, "rejecting request");
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Upstream { status, message } => {
                tracing::error!(%status, github_message = %message, "GitHub returned an error");
                (status, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Internal { error, details } => {
                tracing::error!(%details, "{}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": error, "details": details })),
                )
                    .into_response()
            }
        }
    }
}
