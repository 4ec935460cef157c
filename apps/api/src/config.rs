//! Application configuration loading from environment variables.
//!
//! All configuration is read once at startup. A `.env` file in the working
//! directory is honored through `dotenvy` before this module runs.
//!
//! # Environment Variables
//!
//! ## Required Variables
//! - `GEMINI_API_KEY`: API key for the Gemini vision model
//!
//! ## Optional Variables
//! - `RUST_LOG`: Logging level (default: "info,calculator_api=debug,tower_http=debug")
//! - `HOST`: Server bind address (default: "localhost")
//! - `PORT`: Server port (default: 8900)
//! - `ENV`: Deployment environment, `dev` enables permissive CORS (default: "dev")
//! - `ROUTE_PREFIX`: Path the calculator endpoint is mounted on (default: "/calculate")
//! - `SNAPSHOT_PATH`: Where the last normalized drawing is written (default: "final.png")
//! - `MAX_BODY_BYTES`: Largest accepted request body (default: 20 MiB)
//! - `GEMINI_MODEL`: Model used for analysis (default: "gemini-1.5-flash")
//! - `GEMINI_BASE_URL`: Gemini API root (default: "https://generativelanguage.googleapis.com")
//! - `ANALYSIS_TIMEOUT_SECONDS`: Timeout of one analysis request (default: 60)

use serde::Deserialize;
use std::path::PathBuf;

/// Complete server configuration loaded from environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Deployment environment name (`dev`, `prod`, ...)
    pub env: String,

    /// Mount point of the calculator endpoint, normalized to `/name` without
    /// a trailing slash
    pub route_prefix: String,

    /// File overwritten with every normalized drawing
    pub snapshot_path: PathBuf,

    /// Maximum request body size in bytes
    pub max_body_bytes: usize,

    /// Gemini API key
    pub gemini_api_key: String,

    /// Gemini model name
    pub gemini_model: String,

    /// Gemini API base URL
    pub gemini_base_url: String,

    /// Timeout for one analysis call, in seconds
    pub analysis_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing, a value cannot be
    /// parsed, or `ROUTE_PREFIX` does not name a sub-path.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env_or("HOST", "localhost".to_string())?,
            port: env_or("PORT", 8900)?,
            env: env_or("ENV", "dev".to_string())?,
            route_prefix: normalize_route_prefix(&env_or(
                "ROUTE_PREFIX",
                "/calculate".to_string(),
            )?)?,
            snapshot_path: env_or("SNAPSHOT_PATH", PathBuf::from("final.png"))?,
            max_body_bytes: env_or("MAX_BODY_BYTES", 20 * 1024 * 1024)?,
            gemini_api_key: env_required("GEMINI_API_KEY")?,
            gemini_model: env_or("GEMINI_MODEL", "gemini-1.5-flash".to_string())?,
            gemini_base_url: env_or(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com".to_string(),
            )?,
            analysis_timeout_seconds: env_or("ANALYSIS_TIMEOUT_SECONDS", 60)?,
        })
    }

    pub fn is_dev(&self) -> bool {
        self.env.eq_ignore_ascii_case("dev")
    }
}

/// Ensure the prefix starts with `/`, drop trailing slashes, and refuse the
/// root path, which is taken by the health check.
pub fn normalize_route_prefix(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        anyhow::bail!("ROUTE_PREFIX must name a sub-path, got {:?}", raw);
    }
    Ok(format!("/{}", trimmed))
}

/// Load a required environment variable.
///
/// # Errors
///
/// Returns an error if the variable is not set.
fn env_required(key: &str) -> anyhow::Result<String> {
    std::env::var(key).map_err(|_| anyhow::anyhow!("Missing required environment variable: {}", key))
}

/// Load an environment variable with a default value.
///
/// # Errors
///
/// Returns an error if the variable is set but cannot be parsed.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
