use serde::Deserialize;

use restau_auth_types::token::TokenTtl;
use restau_core::config::Config;

/// API service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing JWT access and refresh tokens.
    pub jwt_secret: String,
    /// TCP port to listen on (default 8000). Env var: `API_PORT`.
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    #[serde(default = "default_access_token_expire_minutes")]
    pub access_token_expire_minutes: u64,
    #[serde(default = "default_refresh_token_expire_days")]
    pub refresh_token_expire_days: u64,
    /// Apply pending migrations before serving (default true).
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_api_port() -> u16 {
    8000
}

fn default_access_token_expire_minutes() -> u64 {
    30
}

fn default_refresh_token_expire_days() -> u64 {
    7
}

fn default_run_migrations() -> bool {
    true
}

impl Config for ApiConfig {}

impl ApiConfig {
    pub fn token_ttl(&self) -> TokenTtl {
        TokenTtl::from_config(
            self.access_token_expire_minutes,
            self.refresh_token_expire_days,
        )
    }
}
