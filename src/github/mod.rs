// src/github/mod.rs
// =============================================================================
// This module talks to GitHub: the OAuth token endpoint and the REST v3 API.
//
// Everything goes through one GithubClient. Each concern lives in its own file
// and adds methods to that client:
// - oauth:    authorization code -> access token
// - repos:    paginated repository listing, vault lookup/creation
// - contents: recursive markdown walk, file creation
//
// All calls are plain sequential awaits: no retries, no caching, no parallel
// fan-out. GitHub's own rate limits apply as-is.
// =============================================================================

mod client;
mod contents;
mod error;
mod oauth;
mod repos;
mod types;

pub use client::GithubClient;
pub use error::GithubError;
pub use types::{
    AccessToken, CreatedFile, FileEntry, Repository, RepositoryRef, VaultResolution,
};
