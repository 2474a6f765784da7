// src/github/client.rs
// =============================================================================
// The shared GitHub HTTP client.
//
// This file owns the plumbing every GitHub call needs:
// - one pooled reqwest::Client (cheap to share, reuses connections)
// - the API base URL and OAuth endpoint from Config
// - building endpoint URLs from path segments
// - adding the auth/accept headers
// - turning non-2xx responses into GithubError::Api
//
// The actual operations live next door (oauth.rs, repos.rs, contents.rs),
// each as another `impl GithubClient` block.
// =============================================================================

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use super::error::GithubError;
use crate::config::Config;

/// Media type GitHub asks REST v3 clients to send.
pub(super) const GITHUB_JSON: &str = "application/vnd.github+json";

const FALLBACK_ERROR_MESSAGE: &str = "GitHub API error";

pub struct GithubClient {
    pub(super) http: Client,
    api_base: Url,
    pub(super) oauth_url: Url,
    pub(super) client_id: String,
    pub(super) client_secret: String,
}

impl GithubClient {
    /// Builds a client from the process configuration.
    pub fn new(config: &Config) -> Result<Self, GithubError> {
        // GitHub rejects API requests without a User-Agent
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("vault-relay/", env!("CARGO_PKG_VERSION"))),
        );

        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            api_base: config.github_api_url.clone(),
            oauth_url: config.github_oauth_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }

    /// Joins path segments onto the API base URL.
    ///
    /// Each segment is percent-encoded on its own, so a segment may not
    /// contain '/'. Split nested paths before calling.
    pub(super) fn endpoint<'a, I>(&self, segments: I) -> Result<Url, GithubError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| GithubError::InvalidUrl(self.api_base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// A request carrying the token and GitHub's JSON media type.
    pub(super) fn authed(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request.bearer_auth(token).header(ACCEPT, GITHUB_JSON)
    }
}

/// Splits a repository path such as `docs/guides/intro.md` into segments,
/// dropping empty pieces from leading, trailing or doubled slashes.
pub(super) fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Decodes a 2xx response body, or turns anything else into an API error.
pub(super) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GithubError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}

/// Passes 2xx responses through untouched; converts the rest into
/// GithubError::Api using the `message` field of GitHub's error body.
pub(super) async fn ensure_success(response: Response) -> Result<Response, GithubError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    // GitHub's error bodies are JSON, but a proxy in between might not be
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());

    Err(GithubError::Api { status, message })
}
