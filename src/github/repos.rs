// src/github/repos.rs
// =============================================================================
// Repository listing and vault resolution.
//
// Listing:
// - GET /user/repos?visibility=all&page=1, then page=2, page=3, ...
// - GitHub advertises more pages with a `Link` header containing rel="next"
// - We stop as soon as a page comes back without that marker
//
// Lenient paging: if GitHub answers a page with a non-2xx status we log it and
// return whatever was collected so far instead of failing. Callers therefore
// can't tell "no more repos" from "listing broke half-way".
//
// Vault resolution:
// - Scan the full listing for a repo named VAULT_REPO_NAME
// - If it's missing, create it (private, with an initial commit)
// =============================================================================

use reqwest::header::LINK;
use reqwest::Response;
use serde::Serialize;

use super::client::{ensure_success, read_json, GithubClient};
use super::error::GithubError;
use super::types::{Repository, VaultResolution, VAULT_REPO_NAME};

/// Body of `POST /user/repos`.
#[derive(Debug, Serialize)]
struct CreateRepository<'a> {
    name: &'a str,
    private: bool,
    auto_init: bool,
}

impl GithubClient {
    /// Lists every repository visible to `token`, following pagination.
    pub async fn list_repositories(&self, token: &str) -> Result<Vec<Repository>, GithubError> {
        let url = self.endpoint(["user", "repos"])?;
        let mut repositories = Vec::new();
        let mut page: u32 = 1;

        loop {
            tracing::debug!(page, "fetching repository page");

            let response = self
                .authed(self.http.get(url.clone()), token)
                .query(&[("visibility", "all".to_string()), ("page", page.to_string())])
                .send()
                .await?;

            let more = has_next_page(&response);

            let response = match ensure_success(response).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(
                        page,
                        collected = repositories.len(),
                        "stopping repository listing early: {}",
                        e
                    );
                    return Ok(repositories);
                }
            };

            let batch: Vec<Repository> = response.json().await?;
            repositories.extend(batch);

            if !more {
                break;
            }
            page += 1;
        }

        tracing::info!(count = repositories.len(), pages = page, "listed repositories");
        Ok(repositories)
    }

    /// Finds the vault repository, creating it when the account has none.
    pub async fn resolve_vault(&self, token: &str) -> Result<VaultResolution, GithubError> {
        let repositories = self.list_repositories(token).await?;

        if let Some(existing) = repositories.into_iter().find(Repository::is_vault) {
            tracing::info!(repo = %existing.reference(), "vault repository already exists");
            return Ok(VaultResolution::Existing(existing));
        }

        tracing::info!("no vault repository found, creating {}", VAULT_REPO_NAME);
        let created = self.create_vault(token).await?;
        tracing::info!(repo = %created.reference(), "vault repository created");

        Ok(VaultResolution::Created(created))
    }

    async fn create_vault(&self, token: &str) -> Result<Repository, GithubError> {
        let body = CreateRepository {
            name: VAULT_REPO_NAME,
            private: true,
            auto_init: true,
        };

        let response = self
            .authed(self.http.post(self.endpoint(["user", "repos"])?), token)
            .json(&body)
            .send()
            .await?;

        read_json(response).await
    }
}

/// True when the response's `Link` header advertises a `rel="next"` page.
fn has_next_page(response: &Response) -> bool {
    response
        .headers()
        .get(LINK)
        .and_then(|value| value.to_str().ok())
        .map(link_has_next)
        .unwrap_or(false)
}

fn link_has_next(link: &str) -> bool {
    link.contains("rel=\"next\"")
}
