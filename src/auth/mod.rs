pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::User;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

/// Rejects values that are empty or contain only whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Password policy: at least 7 characters and must not contain the word
/// "password" in any casing.
pub fn validate_password_strength(value: &str) -> Result<(), ValidationError> {
    if value.len() < 7 {
        return Err(ValidationError::new("password_too_short"));
    }
    if value.to_lowercase().contains("password") {
        return Err(ValidationError::new("password_too_common"));
    }
    Ok(())
}

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address. Must be a valid email format.
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name for the new account. Must not be blank.
    #[validate(custom = "validate_not_blank")]
    pub name: String,
    /// Email address for the new account. Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// Password for the new account. See [`validate_password_strength`].
    #[validate(custom = "validate_password_strength")]
    pub password: String,
}

/// Response structure after successful authentication (login or registration).
/// Contains the bearer token and the public profile of the authenticated user.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The bearer token for session authentication. It stays valid until it
    /// is removed from the user's active sessions (logout, account deletion)
    /// or its embedded expiry passes.
    pub token: String,
    /// The authenticated user's public profile.
    pub user: User,
}
