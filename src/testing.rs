// src/testing.rs
// =============================================================================
// An in-process fake of the slice of GitHub the relay talks to.
//
// Tests start it on 127.0.0.1 with a Scenario describing what GitHub should
// contain (repository pages, a directory tree, OAuth behaviour), point a
// Config at it, and afterwards inspect every request it received. That lets
// us assert call counts and request bodies without touching the network.
//
// Only compiled for tests.
// =============================================================================

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use url::Url;

use crate::config::Config;

const OWNER: &str = "octocat";

/// What the fake GitHub serves.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Body of every OAuth token exchange
    pub oauth_response: Value,
    /// Repository names, one inner Vec per page of /user/repos
    pub repo_pages: Vec<Vec<String>>,
    /// 1-based page that answers 401 instead of repositories
    pub failing_repo_page: Option<usize>,
    /// Make POST /user/repos answer 422
    pub reject_repo_creation: bool,
    /// Directory path ("" = root) -> (entry name, entry type)
    pub directories: BTreeMap<String, Vec<(String, String)>>,
    /// File path -> raw content served from its download_url
    pub files: BTreeMap<String, String>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            oauth_response: json!({
                "access_token": "gho_fake_token",
                "token_type": "bearer",
                "scope": "repo"
            }),
            repo_pages: vec![Vec::new()],
            failing_repo_page: None,
            reject_repo_creation: false,
            directories: BTreeMap::new(),
            files: BTreeMap::new(),
        }
    }
}

impl Scenario {
    pub fn with_repo_pages(pages: &[&[&str]]) -> Self {
        Self {
            repo_pages: pages
                .iter()
                .map(|page| page.iter().map(|name| name.to_string()).collect())
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_dir(mut self, path: &str, entries: &[(&str, &str)]) -> Self {
        self.directories.insert(
            path.to_string(),
            entries
                .iter()
                .map(|(name, kind)| (name.to_string(), kind.to_string()))
                .collect(),
        );
        self
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }
}

/// One request as the fake saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    pub fn json_body(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

struct FakeState {
    scenario: Scenario,
    base_url: String,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct FakeGithub {
    base_url: String,
    state: Arc<FakeState>,
}

impl FakeGithub {
    pub async fn start(scenario: Scenario) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let state = Arc::new(FakeState {
            scenario,
            base_url: base_url.clone(),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(handle).with_state(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, state }
    }

    /// A Config whose GitHub URLs point at this fake.
    pub fn config(&self) -> Config {
        Config {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            frontend_url: None,
            port: 0,
            github_api_url: Url::parse(&self.base_url).unwrap(),
            github_oauth_url: Url::parse(&format!("{}/login/oauth/access_token", self.base_url))
                .unwrap(),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

/// Starts the relay itself on 127.0.0.1 and returns its base URL.
pub async fn spawn_relay(config: Config) -> String {
    let app = crate::server::app(&config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    base_url
}

async fn handle(
    State(state): State<Arc<FakeState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    state.requests.lock().unwrap().push(request.clone());

    let path = request.path.as_str();
    match (method.as_str(), path) {
        ("POST", "/login/oauth/access_token") => {
            Json(state.scenario.oauth_response.clone()).into_response()
        }
        ("GET", "/user/repos") => repo_page(&state, &request),
        ("POST", "/user/repos") => create_repo(&state, &request),
        ("GET", p) if p.starts_with("/raw/") => raw_file(&state, &p["/raw/".len()..]),
        ("GET", p) if p.starts_with("/repos/") => match contents_path(p) {
            Some(dir) => list_dir(&state, &dir),
            None => not_found(),
        },
        ("PUT", p) if p.starts_with("/repos/") => match contents_path(p) {
            Some(file) => put_file(&file),
            None => not_found(),
        },
        _ => not_found(),
    }
}

fn repo_json(id: usize, name: &str, private: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "full_name": format!("{OWNER}/{name}"),
        "private": private,
        "owner": { "login": OWNER }
    })
}

fn repo_page(state: &FakeState, request: &RecordedRequest) -> Response {
    let page: usize = request
        .query_param("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);

    if state.scenario.failing_repo_page == Some(page) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Bad credentials" })),
        )
            .into_response();
    }

    let pages = &state.scenario.repo_pages;
    let repos: Vec<Value> = pages
        .get(page.saturating_sub(1))
        .map(|names| {
            names
                .iter()
                .enumerate()
                .map(|(i, name)| repo_json(page * 100 + i, name, false))
                .collect()
        })
        .unwrap_or_default();

    if page < pages.len() {
        let link = format!(
            "<{base}/user/repos?page={next}>; rel=\"next\", <{base}/user/repos?page={last}>; rel=\"last\"",
            base = state.base_url,
            next = page + 1,
            last = pages.len()
        );
        ([(header::LINK, link)], Json(repos)).into_response()
    } else {
        Json(repos).into_response()
    }
}

fn create_repo(state: &FakeState, request: &RecordedRequest) -> Response {
    if state.scenario.reject_repo_creation {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": "Repository creation failed." })),
        )
            .into_response();
    }

    let body = request.json_body();
    let name = body["name"].as_str().unwrap_or_default();
    (StatusCode::CREATED, Json(repo_json(1, name, true))).into_response()
}

/// "/repos/{owner}/{repo}/contents[/rest]" -> "rest" ("" for the root)
fn contents_path(path: &str) -> Option<String> {
    let rest = path.strip_prefix("/repos/")?;
    let mut parts = rest.splitn(4, '/');
    let _owner = parts.next()?;
    let _repo = parts.next()?;
    if parts.next()? != "contents" {
        return None;
    }
    Some(parts.next().unwrap_or("").trim_end_matches('/').to_string())
}

fn list_dir(state: &FakeState, dir: &str) -> Response {
    let Some(entries) = state.scenario.directories.get(dir) else {
        return not_found();
    };

    let listing: Vec<Value> = entries
        .iter()
        .map(|(name, kind)| {
            let path = if dir.is_empty() {
                name.clone()
            } else {
                format!("{dir}/{name}")
            };
            let download_url = if kind == "file" {
                json!(format!("{}/raw/{}", state.base_url, path))
            } else {
                Value::Null
            };
            json!({
                "name": name,
                "path": path,
                "type": kind,
                "sha": "0000000000000000000000000000000000000000",
                "download_url": download_url
            })
        })
        .collect();

    Json(listing).into_response()
}

fn raw_file(state: &FakeState, path: &str) -> Response {
    match state.scenario.files.get(path) {
        Some(content) => content.clone().into_response(),
        None => not_found(),
    }
}

fn put_file(path: &str) -> Response {
    let name = path.rsplit('/').next().unwrap_or(path);
    (
        StatusCode::CREATED,
        Json(json!({
            "content": {
                "name": name,
                "path": path,
                "sha": "95b966ae1c166bd92f8ae7d1c313e738c731dfc3"
            },
            "commit": { "message": "Adding a new file via API" }
        })),
    )
        .into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))).into_response()
}
