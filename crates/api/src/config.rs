//! Application configuration loaded from environment variables.

use std::time::Duration;

/// How long in-flight requests may drain after a shutdown signal before the
/// process is terminated.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Deployment environment. Controls log format and error verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// Parses an environment name. Anything unrecognised is development.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "test" => Environment::Test,
            _ => Environment::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }

    /// Whether 500 responses may carry the underlying error message.
    pub fn exposes_error_details(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Whether logs are emitted as JSON lines.
    pub fn json_logs(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `APP_ENV`, then `NODE_ENV` — deployment environment (default: `development`)
/// - `APP_VERSION` — reported version (default: crate version)
/// - `BUILD_NUMBER` / `GIT_COMMIT` — surfaced verbatim by `/api/info`
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub version: String,
    pub build_number: Option<String>,
    pub git_commit: Option<String>,
    pub log_level: String,
    pub shutdown_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port: non_empty("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            environment: non_empty("APP_ENV")
                .or_else(|| non_empty("NODE_ENV"))
                .map(|e| Environment::parse(&e))
                .unwrap_or(defaults.environment),
            version: non_empty("APP_VERSION").unwrap_or(defaults.version),
            build_number: non_empty("BUILD_NUMBER"),
            git_commit: non_empty("GIT_COMMIT"),
            log_level: non_empty("RUST_LOG").unwrap_or(defaults.log_level),
            shutdown_timeout: SHUTDOWN_TIMEOUT,
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: Environment::Development,
            version: env!("CARGO_PKG_VERSION").to_string(),
            build_number: None,
            git_commit: None,
            log_level: "info".to_string(),
            shutdown_timeout: SHUTDOWN_TIMEOUT,
        }
    }
}
