//! Transport-free data model for the demo web service.
//!
//! Everything here is either immutable for the lifetime of the process
//! ([`AppInfo`], [`UserDirectory`], [`CredentialTable`]) or rebuilt on every
//! request ([`HealthStatus`]). Nothing is persisted.

pub mod auth;
pub mod status;
pub mod types;

pub use auth::{Account, AuthError, CredentialTable, Credentials};
pub use status::{AppInfo, HealthState, HealthStatus};
pub use types::{Role, UserDirectory, UserRecord};
