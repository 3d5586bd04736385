//! Health and build information records.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Overall service state reported by the health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
}

/// Snapshot returned by the health endpoint, rebuilt on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Seconds since process start, with sub-second precision.
    pub uptime: f64,
    pub message: String,
    /// RFC 3339 timestamp with millisecond precision.
    pub timestamp: String,
    pub version: String,
    pub environment: String,
    pub status: HealthState,
}

impl HealthStatus {
    pub fn new(
        uptime: Duration,
        now: DateTime<Utc>,
        version: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            uptime: uptime.as_secs_f64(),
            message: "OK".to_string(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            version: version.into(),
            environment: environment.into(),
            status: HealthState::Healthy,
        }
    }
}

/// Static application metadata, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub build_number: String,
    pub git_commit: String,
}

impl AppInfo {
    pub const DEFAULT_NAME: &'static str = "SIT753 DevOps Pipeline Application";
    pub const DEFAULT_DESCRIPTION: &'static str = "High Distinction Jenkins Pipeline Implementation";
    pub const DEFAULT_BUILD_NUMBER: &'static str = "local";
    pub const DEFAULT_GIT_COMMIT: &'static str = "unknown";

    /// Builds the record with the default name and description.
    ///
    /// `None` for the build number or commit falls back to `"local"` and
    /// `"unknown"` respectively.
    pub fn new(
        version: impl Into<String>,
        author: impl Into<String>,
        build_number: Option<String>,
        git_commit: Option<String>,
    ) -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            version: version.into(),
            description: Self::DEFAULT_DESCRIPTION.to_string(),
            author: author.into(),
            build_number: build_number.unwrap_or_else(|| Self::DEFAULT_BUILD_NUMBER.to_string()),
            git_commit: git_commit.unwrap_or_else(|| Self::DEFAULT_GIT_COMMIT.to_string()),
        }
    }
}
