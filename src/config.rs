// src/config.rs
// =============================================================================
// This file defines the process-wide configuration using the `clap` crate.
//
// Every option can come from a command-line flag OR an environment variable,
// so the relay runs the same way locally (`--port 5000`) and in a container
// (`PORT=5000`).
//
// The Config struct is built exactly once in main() and then handed to the
// GitHub client and the router. Nothing else reads the environment.
//
// Rust concepts:
// - Derive macros: clap generates the parsing code for us
// - Option<T>: For settings that may be absent (FRONTEND_URL)
// - FromStr: clap parses `Url` and `u16` values through their FromStr impls
// =============================================================================

use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use std::net::{Ipv4Addr, SocketAddr};
use url::Url;

/// Runtime configuration for the relay.
///
/// CLIENT_ID and CLIENT_SECRET are mandatory: if either is missing (or empty)
/// clap prints an error and the process exits before the server binds.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "vault-relay",
    version,
    about = "Relays a front-end's GitHub OAuth and vault-repository calls to the GitHub API"
)]
pub struct Config {
    /// OAuth app client id
    #[arg(long, env = "CLIENT_ID", value_parser = NonEmptyStringValueParser::new())]
    pub client_id: String,

    /// OAuth app client secret
    #[arg(
        long,
        env = "CLIENT_SECRET",
        hide_env_values = true,
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub client_secret: String,

    /// Origin allowed by CORS (the front-end URL)
    #[arg(long, env = "FRONTEND_URL")]
    pub frontend_url: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 4000)]
    pub port: u16,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub github_api_url: Url,

    /// GitHub's OAuth token endpoint
    #[arg(
        long,
        env = "GITHUB_OAUTH_URL",
        default_value = "https://github.com/login/oauth/access_token"
    )]
    pub github_oauth_url: Url,
}

impl Config {
    /// Address the server binds to: every interface on the configured port.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
