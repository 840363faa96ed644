//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// User domain entity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub username: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Signup input that has passed field validation.
///
/// `password` is still plain text; the service hashes it before storage.
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub password: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("display_name", &self.display_name)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_never_serializes_password_hash() {
        let user = User {
            id: 1,
            username: "test-user".to_string(),
            display_name: "test-display".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["displayName"], "test-display");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_new_user_debug_hides_password() {
        let new_user = NewUser {
            username: "test-user".to_string(),
            display_name: "test-display".to_string(),
            password: "P4ssword".to_string(),
        };

        assert!(!format!("{:?}", new_user).contains("P4ssword"));
    }
}
