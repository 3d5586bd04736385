//! Hardcoded-credential login.
//!
//! This is a stand-in for real authentication: passwords are compared in
//! plain text against a fixed table and nothing is stored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::types::Role;

/// Errors produced when checking a login attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Username or password absent, null, empty or otherwise falsy.
    #[error("Username and password required")]
    MissingCredentials,

    /// No account matches the supplied pair. Unknown users and wrong
    /// passwords are reported identically.
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// A login attempt as submitted by the client.
///
/// Fields keep whatever JSON type the client sent, so a non-string value is
/// a wrong credential rather than a malformed body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: Option<Value>,
    #[serde(default)]
    pub password: Option<Value>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(Value::String(username.into())),
            password: Some(Value::String(password.into())),
        }
    }
}

/// The identity returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    password: String,
    role: Role,
}

/// Lookup from username to expected password and role.
#[derive(Debug, Clone, Default)]
pub struct CredentialTable {
    entries: HashMap<String, Entry>,
}

impl CredentialTable {
    /// Creates an empty table; every login against it fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// The two fixed accounts of the demo service.
    pub fn demo() -> Self {
        Self::new()
            .with_account("admin", "admin", Role::Admin)
            .with_account("test", "test", Role::User)
    }

    /// Adds (or replaces) an account.
    pub fn with_account(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        self.entries.insert(
            username.into(),
            Entry {
                password: password.into(),
                role,
            },
        );
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks a login attempt.
    ///
    /// Missing fields short-circuit before the table is consulted. Present
    /// values that are not strings never match an account.
    pub fn authenticate(&self, credentials: &Credentials) -> Result<Account, AuthError> {
        let username = present(credentials.username.as_ref());
        let password = present(credentials.password.as_ref());
        let (Some(username), Some(password)) = (username, password) else {
            return Err(AuthError::MissingCredentials);
        };
        let (Some(username), Some(password)) = (username.as_str(), password.as_str()) else {
            return Err(AuthError::InvalidCredentials);
        };

        match self.entries.get(username) {
            Some(entry) if entry.password == password => Ok(Account {
                username: username.to_string(),
                role: entry.role,
            }),
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}

// null, false, 0 and "" count as absent.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}
