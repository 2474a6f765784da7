// src/github/error.rs
// =============================================================================
// Errors that can come back from any GitHub call.
//
// The HTTP layer decides which status code each variant turns into, so the
// variants keep GitHub's own wording intact (`message` from the JSON error
// body, `error` from the OAuth endpoint).
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GithubError {
    /// The request never produced a usable response (DNS, TLS, bad JSON, ...)
    #[error("request to GitHub failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// GitHub answered with a non-2xx status
    #[error("GitHub API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    /// The OAuth endpoint answered 200 but reported a failed exchange
    #[error("OAuth exchange failed: {error} ({})", .description.as_deref().unwrap_or("no description"))]
    OAuth {
        error: String,
        description: Option<String>,
    },

    /// The OAuth endpoint answered with neither a token nor an error
    #[error("OAuth response contained no access token")]
    MissingToken,

    /// A markdown file in a directory listing had no download URL
    #[error("no download URL for {0}")]
    MissingDownloadUrl(String),

    #[error("cannot build GitHub URL from {0}")]
    InvalidUrl(String),
}

impl GithubError {
    /// The message GitHub itself reported, when there is one.
    ///
    /// Callers forward this verbatim to the front-end.
    pub fn upstream_message(&self) -> Option<&str> {
        match self {
            GithubError::Api { message, .. } => Some(message),
            GithubError::OAuth { error, .. } => Some(error),
            _ => None,
        }
    }
}
