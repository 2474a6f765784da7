// src/server/mod.rs
// =============================================================================
// The HTTP entry layer.
//
// Submodules:
// - auth:  the OAuth code exchange endpoint
// - repos: vault / file listing / file creation endpoints
// - error: ApiError, which turns failures into JSON responses
//
// This file wires the handlers into an axum Router and wraps it in the
// middleware every response gets: CORS for the front-end, a handful of
// security headers, and request tracing.
// =============================================================================

mod auth;
mod error;
mod repos;

use anyhow::{Context, Result};
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::http::Method;
use axum::routing::{get, put};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::github::GithubClient;

/// State shared by every handler. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub github: Arc<GithubClient>,
}

/// The four relay routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/getAccessToken", get(auth::get_access_token))
        .route("/getVaultRepository", get(repos::get_vault_repository))
        .route("/getAllFiles", get(repos::get_all_files))
        .route("/addNewFileToVault", put(repos::add_new_file_to_vault))
        .with_state(state)
}

/// Builds the complete application: GitHub client, routes and middleware.
pub fn app(config: &Config) -> Result<Router> {
    let github = GithubClient::new(config).context("Failed to create GitHub client")?;
    let state = AppState {
        github: Arc::new(github),
    };

    let mut router = build_router(state);
    for (name, value) in SECURITY_HEADERS {
        router = router.layer(SetResponseHeaderLayer::if_not_present(
            name,
            HeaderValue::from_static(value),
        ));
    }

    Ok(router
        .layer(cors_layer(config.frontend_url.as_deref())?)
        .layer(TraceLayer::new_for_http()))
}

/// Response headers added to everything we serve.
const SECURITY_HEADERS: [(HeaderName, &str); 6] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
    (header::REFERRER_POLICY, "no-referrer"),
    (header::X_DNS_PREFETCH_CONTROL, "off"),
    (
        header::STRICT_TRANSPORT_SECURITY,
        "max-age=15552000; includeSubDomains",
    ),
    (
        HeaderName::from_static("cross-origin-opener-policy"),
        "same-origin",
    ),
];

/// CORS for the front-end.
///
/// With a configured origin, only that origin is allowed and credentials are
/// permitted. Without one, any origin is allowed but credentials are not
/// (browsers refuse the `*` + credentials combination).
fn cors_layer(frontend_url: Option<&str>) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match frontend_url {
        Some(origin) => {
            let origin = HeaderValue::from_str(origin.trim_end_matches('/'))
                .with_context(|| format!("Invalid FRONTEND_URL: {origin}"))?;
            Ok(layer
                .allow_origin(AllowOrigin::exact(origin))
                .allow_credentials(true))
        }
        None => Ok(layer.allow_origin(AllowOrigin::any())),
    }
}
