use serde::{Deserialize, Serialize};

/// Access level attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Returns the wire representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry of the user listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u32,
    pub username: String,
    pub role: Role,
}

impl UserRecord {
    pub fn new(id: u32, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role,
        }
    }
}

/// Read-only list of users served by the listing endpoint.
///
/// The directory is built once at startup and shared between requests;
/// no endpoint mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    users: Vec<UserRecord>,
}

impl UserDirectory {
    /// Creates a directory from an explicit list of records.
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users }
    }

    /// The fixed three-entry directory exposed by the demo service.
    pub fn demo() -> Self {
        Self::new(vec![
            UserRecord::new(1, "admin", Role::Admin),
            UserRecord::new(2, "user1", Role::User),
            UserRecord::new(3, "user2", Role::User),
        ])
    }

    pub fn all(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }

    #[test]
    fn demo_directory_has_three_users_with_sequential_ids() {
        let directory = UserDirectory::demo();
        assert_eq!(directory.len(), 3);

        let ids: Vec<u32> = directory.all().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(directory.all()[0].role, Role::Admin);
        assert!(directory.all()[1..].iter().all(|u| u.role == Role::User));
    }

    #[test]
    fn user_record_serializes_expected_fields() {
        let record = UserRecord::new(2, "user1", Role::User);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": 2, "username": "user1", "role": "user" })
        );
    }
}
