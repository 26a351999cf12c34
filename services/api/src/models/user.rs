//! User model and the request payloads that act on it

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(rename = "img")]
    #[sqlx(rename = "img")]
    pub image: String,
    /// bcrypt hash; never leaves the service
    #[serde(skip)]
    pub hashed_password: String,
    pub curator: bool,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated signup data ready to be persisted
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub image: String,
    pub password_hash: String,
}

/// Request for user signup
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default, rename = "img")]
    pub image: String,
    pub password: String,
}

/// Request for user signin
///
/// `email` takes precedence over `username` when both are given.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignInRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Request for a password change
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChangePasswordRequest {
    /// Accepted for compatibility; the account is always the caller's
    pub email: String,
    #[serde(rename = "oldpassword")]
    pub old_password: String,
    #[serde(rename = "newpassword")]
    pub new_password: String,
}

/// Partial profile update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "img")]
    pub image: Option<String>,
}

impl UpdateUserRequest {
    /// Copy every provided field onto `user`
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(image) = self.image {
            user.image = image;
        }
    }
}

/// Response for signup and signin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}
