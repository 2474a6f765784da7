// src/server/repos.rs
// =============================================================================
// Repository endpoints:
// - GET /getVaultRepository?token=
// - GET /getAllFiles?owner=&repo=&token=
// - PUT /addNewFileToVault?owner=&repo=&path=&fileContent=&token=
//
// Each handler checks its query parameters first (an empty value counts as
// missing), then hands off to the GitHub client and reshapes the result.
// =============================================================================

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::error::{parse_query, ApiError};
use super::AppState;
use crate::github::{CreatedFile, FileEntry, Repository, RepositoryRef, VaultResolution};

const TOKEN_REQUIRED: &str = "Token is required.";
const OWNER_AND_REPO_REQUIRED: &str = "Owner and repo parameters are required.";
const NEW_FILE_PARAMS_REQUIRED: &str = "Owner, repo, file path, and file content are required.";
const DOT_SEGMENTS_REJECTED: &str = "File path must not contain '.' or '..' segments.";

#[derive(Debug, Deserialize)]
pub struct VaultParams {
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FilesParams {
    owner: Option<String>,
    repo: Option<String>,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFileParams {
    owner: Option<String>,
    repo: Option<String>,
    path: Option<String>,
    file_content: Option<String>,
    token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VaultResponse {
    message: &'static str,
    repo: Repository,
}

#[derive(Debug, Serialize)]
pub struct FilesResponse {
    message: &'static str,
    files: Vec<FileEntry>,
}

#[derive(Debug, Serialize)]
pub struct NewFileResponse {
    message: &'static str,
    file: CreatedFile,
}

/// Treats `None` and `Some("")` alike.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required(value: Option<String>, message: &'static str) -> Result<String, ApiError> {
    present(value).ok_or(ApiError::BadRequest(message))
}

/// False when `path` has a `.` or `..` segment. URL building collapses
/// those, so the file would land somewhere other than where it was asked for.
fn has_no_dot_segments(path: &str) -> bool {
    path.split('/').all(|segment| segment != "." && segment != "..")
}

pub async fn get_vault_repository(
    State(state): State<AppState>,
    query: Result<Query<VaultParams>, QueryRejection>,
) -> Result<Json<VaultResponse>, ApiError> {
    let params = parse_query(query, TOKEN_REQUIRED)?;
    let token = required(params.token, TOKEN_REQUIRED)?;

    let resolution = state.github.resolve_vault(&token).await.map_err(|e| {
        ApiError::from_github(
            e,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to check vault repository.",
        )
    })?;

    tracing::info!(repo = %resolution.repository().reference(), "vault resolved");

    let message = match resolution {
        VaultResolution::Existing(_) => "Repository already exists",
        VaultResolution::Created(_) => "Repository created successfully",
    };

    Ok(Json(VaultResponse {
        message,
        repo: resolution.into_repository(),
    }))
}

pub async fn get_all_files(
    State(state): State<AppState>,
    query: Result<Query<FilesParams>, QueryRejection>,
) -> Result<Json<FilesResponse>, ApiError> {
    let params = parse_query(query, OWNER_AND_REPO_REQUIRED)?;
    let token = required(params.token, TOKEN_REQUIRED)?;

    let (Some(owner), Some(repo)) = (present(params.owner), present(params.repo)) else {
        return Err(ApiError::BadRequest(OWNER_AND_REPO_REQUIRED));
    };

    let repo = RepositoryRef::new(owner, repo);
    let files = state
        .github
        .list_markdown_files(&repo, &token)
        .await
        // Any failure in the walk is reported the same way, GitHub's or not
        .map_err(|e| ApiError::Internal {
            error: "Failed to fetch files.",
            details: e.to_string(),
        })?;

    Ok(Json(FilesResponse {
        message: "Files fetched successfully",
        files,
    }))
}

pub async fn add_new_file_to_vault(
    State(state): State<AppState>,
    query: Result<Query<NewFileParams>, QueryRejection>,
) -> Result<(StatusCode, Json<NewFileResponse>), ApiError> {
    let params = parse_query(query, NEW_FILE_PARAMS_REQUIRED)?;
    let token = required(params.token, TOKEN_REQUIRED)?;

    let (Some(owner), Some(repo), Some(path), Some(content)) = (
        present(params.owner),
        present(params.repo),
        present(params.path),
        present(params.file_content),
    ) else {
        return Err(ApiError::BadRequest(NEW_FILE_PARAMS_REQUIRED));
    };

    if !has_no_dot_segments(&path) {
        return Err(ApiError::BadRequest(DOT_SEGMENTS_REJECTED));
    }

    let repo = RepositoryRef::new(owner, repo);
    let file = state
        .github
        .create_file(&repo, &path, &content, &token)
        .await
        .map_err(|e| {
            ApiError::from_github(e, StatusCode::INTERNAL_SERVER_ERROR, "Failed to add file.")
        })?;

    Ok((
        StatusCode::CREATED,
        Json(NewFileResponse {
            message: "File added successfully",
            file,
        }),
    ))
}
