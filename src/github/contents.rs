// src/github/contents.rs
// =============================================================================
// Reading and writing files through GitHub's Contents API.
//
// Reading (list_markdown_files):
// - List the repository root with GET /repos/{owner}/{repo}/contents/
// - For every entry, in GitHub's order:
//     * a file ending in ".md"  -> download it and record a FileEntry
//     * a directory             -> recurse, depth-first
//     * anything else           -> skip
// - One request per directory plus one per markdown file, all sequential
// - Any failed request aborts the whole walk
//
// Writing (create_file):
// - PUT /repos/{owner}/{repo}/contents/{path} with the text base64-encoded
// - Always on the "main" branch with a fixed commit message
//
// Rust concepts:
// - BoxFuture: an async fn can't call itself directly (its future would have
//   infinite size), so the recursive step returns a boxed future
// =============================================================================

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};

use super::client::{ensure_success, path_segments, read_json, GithubClient};
use super::error::GithubError;
use super::types::{
    ContentEntry, ContentKind, CreatedFile, FileEntry, RepositoryRef, NEW_FILE_COMMIT_MESSAGE,
    VAULT_BRANCH,
};

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Serialize)]
struct PutContents<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
}

#[derive(Debug, Deserialize)]
struct PutContentsResponse {
    content: CreatedFile,
}

impl GithubClient {
    /// Collects every markdown file in `repo`, depth-first from the root.
    pub async fn list_markdown_files(
        &self,
        repo: &RepositoryRef,
        token: &str,
    ) -> Result<Vec<FileEntry>, GithubError> {
        tracing::info!(%repo, "walking repository for markdown files");

        let mut next_id = 0;
        let files = self.walk_directory(repo, token, "", &mut next_id).await?;

        tracing::info!(%repo, count = files.len(), "markdown walk finished");
        Ok(files)
    }

    /// Lists one directory and everything below it.
    ///
    /// `next_id` is shared across the whole walk so ids stay sequential.
    fn walk_directory<'a>(
        &'a self,
        repo: &'a RepositoryRef,
        token: &'a str,
        path: &'a str,
        next_id: &'a mut usize,
    ) -> BoxFuture<'a, Result<Vec<FileEntry>, GithubError>> {
        async move {
            let entries = self.list_directory(repo, token, path).await?;
            let mut files = Vec::new();

            for entry in entries {
                match entry.kind {
                    ContentKind::File if entry.is_markdown_file() => {
                        let content = self.download(&entry, token).await?;
                        files.push(FileEntry {
                            id: *next_id,
                            name: entry.name,
                            path: entry.path,
                            content,
                        });
                        *next_id += 1;
                    }
                    ContentKind::Dir => {
                        let nested = self
                            .walk_directory(repo, token, &entry.path, next_id)
                            .await?;
                        files.extend(nested);
                    }
                    _ => {}
                }
            }

            Ok(files)
        }
        .boxed()
    }

    async fn list_directory(
        &self,
        repo: &RepositoryRef,
        token: &str,
        path: &str,
    ) -> Result<Vec<ContentEntry>, GithubError> {
        tracing::debug!(%repo, path, "listing directory");

        let url = self.endpoint(
            ["repos", repo.owner.as_str(), repo.name.as_str(), "contents"]
                .into_iter()
                .chain(path_segments(path)),
        )?;

        let response = self.authed(self.http.get(url), token).send().await?;
        read_json(response).await
    }

    /// Fetches the raw text of a file from its `download_url`.
    async fn download(&self, entry: &ContentEntry, token: &str) -> Result<String, GithubError> {
        let url = entry
            .download_url
            .as_deref()
            .ok_or_else(|| GithubError::MissingDownloadUrl(entry.path.clone()))?;

        let response = self.authed(self.http.get(url), token).send().await?;
        let text = ensure_success(response).await?.text().await?;
        Ok(text)
    }

    /// Creates (or overwrites) `path` in `repo` with `content`.
    pub async fn create_file(
        &self,
        repo: &RepositoryRef,
        path: &str,
        content: &str,
        token: &str,
    ) -> Result<CreatedFile, GithubError> {
        tracing::info!(%repo, path, "writing file");

        let url = self.endpoint(
            ["repos", repo.owner.as_str(), repo.name.as_str(), "contents"]
                .into_iter()
                .chain(path_segments(path)),
        )?;

        let body = PutContents {
            message: NEW_FILE_COMMIT_MESSAGE,
            content: STANDARD.encode(content),
            branch: VAULT_BRANCH,
        };

        let response = self
            .authed(self.http.put(url), token)
            .json(&body)
            .send()
            .await?;

        let created: PutContentsResponse = read_json(response).await?;
        Ok(created.content)
    }
}
