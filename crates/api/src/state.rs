//! Shared application state.

use std::sync::Arc;

use common::{AppInfo, CredentialTable, UserDirectory};

use crate::config::{Config, Environment};
use crate::error::ErrorPolicy;
use crate::telemetry::HttpMetrics;

/// Read-only state shared by all handlers, plus the metrics handle.
#[derive(Debug, Clone)]
pub struct AppState {
    pub info: AppInfo,
    pub users: UserDirectory,
    pub credentials: CredentialTable,
    pub metrics: HttpMetrics,
    pub environment: Environment,
    pub error_policy: ErrorPolicy,
}

impl AppState {
    /// Builds the state served by the binary: the fixed user list and the two
    /// demo accounts.
    pub fn from_config(config: &Config, metrics: HttpMetrics) -> Arc<Self> {
        Arc::new(Self {
            info: AppInfo::new(
                config.version.clone(),
                env!("CARGO_PKG_AUTHORS"),
                config.build_number.clone(),
                config.git_commit.clone(),
            ),
            users: UserDirectory::demo(),
            credentials: CredentialTable::demo(),
            metrics,
            environment: config.environment,
            error_policy: ErrorPolicy::new(config.environment.exposes_error_details()),
        })
    }

    /// Replaces the credential table.
    pub fn with_credentials(mut self, credentials: CredentialTable) -> Self {
        self.credentials = credentials;
        self
    }
}
