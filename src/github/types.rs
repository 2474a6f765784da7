// src/github/types.rs
// =============================================================================
// Data types exchanged with GitHub and handed back to the front-end.
//
// GitHub is the system of record for all of these; nothing here is persisted.
//
// Rust concepts:
// - #[serde(flatten)]: keeps every field GitHub sends that we don't name,
//   so repository metadata passes through to the caller untouched
// - Newtypes: AccessToken wraps a String so it can't leak through Debug
// =============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Name of the per-user backup repository.
pub const VAULT_REPO_NAME: &str = "test-blockbook-vault";

/// Branch that new files are committed to.
pub const VAULT_BRANCH: &str = "main";

/// Commit message used for every file written through the relay.
pub const NEW_FILE_COMMIT_MESSAGE: &str = "Adding a new file via API";

/// Extension that marks a file as a note worth returning.
pub const MARKDOWN_EXTENSION: &str = ".md";

/// An OAuth access token issued by GitHub. Opaque to us.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Identifies one repository: `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A repository as returned by `/user/repos`.
///
/// Only `name` and `owner.login` are interpreted; the rest of GitHub's
/// payload is carried along in `extra` and serialized back out as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: RepositoryOwner,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Repository {
    pub fn reference(&self) -> RepositoryRef {
        RepositoryRef::new(&self.owner.login, &self.name)
    }

    pub fn is_vault(&self) -> bool {
        self.name == VAULT_REPO_NAME
    }
}

/// Outcome of looking for the vault repository.
#[derive(Debug, Clone, PartialEq)]
pub enum VaultResolution {
    /// The account already had a vault
    Existing(Repository),
    /// No vault was found, so one was just created
    Created(Repository),
}

impl VaultResolution {
    pub fn repository(&self) -> &Repository {
        match self {
            VaultResolution::Existing(repo) | VaultResolution::Created(repo) => repo,
        }
    }

    pub fn into_repository(self) -> Repository {
        match self {
            VaultResolution::Existing(repo) | VaultResolution::Created(repo) => repo,
        }
    }
}

/// The kind of a directory-listing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    File,
    Dir,
    /// symlinks, submodules: never walked
    #[serde(other)]
    Other,
}

/// One entry of `GET /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl ContentEntry {
    pub fn is_markdown_file(&self) -> bool {
        self.kind == ContentKind::File && self.name.ends_with(MARKDOWN_EXTENSION)
    }
}

/// A markdown file collected during one walk.
///
/// `id` is only meaningful within that walk: 0, 1, 2, ... in visitation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub id: usize,
    pub name: String,
    pub path: String,
    pub content: String,
}

/// What GitHub reports about a file we just wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedFile {
    pub name: String,
    pub path: String,
    pub sha: String,
}
