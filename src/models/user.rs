use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::auth::{validate_not_blank, validate_password_strength};

/// Public representation of a user, as returned by the API.
///
/// The password hash and session tokens never leave the server.
#[derive(Debug, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Full user row, including credentials. Internal use only.
#[derive(Debug, FromRow)]
pub struct UserRecord {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Strips credential material, leaving the public profile.
    pub fn into_profile(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            created_at: self.created_at,
        }
    }
}

/// Partial update payload for `PATCH /users/me`.
///
/// Only `name`, `email`, and `password` may be changed; any other field in
/// the body fails deserialization and the request is rejected with 400.
#[derive(Debug, Deserialize, Validate, Default)]
#[serde(deny_unknown_fields, default)]
pub struct UserUpdate {
    #[validate(custom = "validate_not_blank")]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom = "validate_password_strength")]
    pub password: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none()
    }
}
