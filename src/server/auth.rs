// src/server/auth.rs
// =============================================================================
// GET /getAccessToken?code=...
//
// The code is checked against ^[a-zA-Z0-9_-]+$ before anything is sent to
// GitHub, so junk never reaches the token endpoint.
// =============================================================================

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::error::{parse_query, ApiError};
use super::AppState;
use crate::github::AccessToken;

#[derive(Debug, Deserialize)]
pub struct TokenParams {
    code: Option<String>,
}

const INVALID_CODE: &str = "Invalid authorization code";

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    token: AccessToken,
}

/// True for non-empty codes made only of ASCII letters, digits, '_' and '-'.
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

pub async fn get_access_token(
    State(state): State<AppState>,
    query: Result<Query<TokenParams>, QueryRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let params = parse_query(query, INVALID_CODE)?;
    let code = params
        .code
        .filter(|code| is_valid_code(code))
        .ok_or(ApiError::BadRequest(INVALID_CODE))?;

    let token = state.github.exchange_code(&code).await.map_err(|e| {
        ApiError::from_github(e, StatusCode::BAD_REQUEST, "Failed to obtain access token.")
    })?;

    Ok(Json(TokenResponse { token }))
}
