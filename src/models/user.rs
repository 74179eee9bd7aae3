use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user row as stored in the database.
///
/// Deliberately not `Serialize`: the credential hash must never end up in a
/// response body. Handlers convert to [`UserResponse`] before replying.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user, safe to return to clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_public_view_carries_identity_fields() {
        let user = sample_user();
        let view = UserResponse::from(&user);
        assert_eq!(view.id, user.id);
        assert_eq!(view.email, user.email);
        assert_eq!(view.name, user.name);
        assert_eq!(view.created_at, user.created_at);
    }

    #[test]
    fn test_public_view_never_exposes_credential() {
        let user = sample_user();
        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert!(!keys.contains(&"password_hash"));
        assert!(!keys.contains(&"password"));
    }
}
