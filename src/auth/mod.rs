pub mod extractors;
pub mod guard;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::UserResponse;

// Re-export necessary items
pub use extractors::CurrentUser;
pub use guard::ensure_owner;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKeys};

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address.
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// User's password.
    /// Must be at least 6 characters long.
    #[validate(length(min = 6))]
    pub password: String,
}

/// Represents the payload for a new account signup request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Email address for the new account.
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// Password for the new account.
    /// Must be at least 6 characters long.
    #[validate(length(min = 6))]
    pub password: String,
    /// Display name for the new account.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Response structure after successful authentication (login or signup).
///
/// Carries the access token together with the public view of the
/// authenticated user; the credential hash is never part of it.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The JWT (JSON Web Token) for session authentication.
    pub access_token: String,
    /// Always "bearer".
    pub token_type: String,
    /// Public view of the authenticated user.
    pub user: UserResponse,
}

impl TokenResponse {
    pub fn new(access_token: String, user: UserResponse) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user,
        }
    }
}
