// src/github/oauth.rs
// =============================================================================
// Exchanges an OAuth authorization code for an access token.
//
// Flow:
// 1. The front-end sends the user to GitHub, GitHub redirects back with ?code=
// 2. The front-end hands that code to us
// 3. We POST it to GitHub together with the server-held client credentials
// 4. GitHub answers with an access token (or an error) as JSON
//
// Quirk: the token endpoint reports a bad code with HTTP 200 and an `error`
// field in the body, not with a 4xx status.
// =============================================================================

use reqwest::header::ACCEPT;
use serde::Deserialize;

use super::client::{ensure_success, GithubClient};
use super::error::GithubError;
use super::types::AccessToken;

#[derive(Debug, Deserialize)]
struct TokenExchangeResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl GithubClient {
    /// Trades an authorization code for an access token.
    ///
    /// The code must already be validated by the caller; it is sent as-is.
    pub async fn exchange_code(&self, code: &str) -> Result<AccessToken, GithubError> {
        tracing::info!("exchanging OAuth code for an access token");

        let response = self
            .http
            .post(self.oauth_url.clone())
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
            ])
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let body: TokenExchangeResponse = ensure_success(response).await?.json().await?;

        match body {
            TokenExchangeResponse {
                error: Some(error),
                error_description,
                ..
            } => {
                tracing::warn!(%error, "GitHub rejected the OAuth code");
                Err(GithubError::OAuth {
                    error,
                    description: error_description,
                })
            }
            TokenExchangeResponse {
                access_token: Some(token),
                ..
            } => Ok(AccessToken::new(token)),
            _ => Err(GithubError::MissingToken),
        }
    }
}
