//! User entity model and DTOs.

use inventra_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full user row from the `users` table.
///
/// Contains the password hash; never serialize it. Use [`UserResponse`]
/// for API output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub fullname: String,
    pub email: String,
    pub password_hash: String,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: DbId,
    pub fullname: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            fullname: u.fullname.clone(),
            email: u.email.clone(),
            avatar_url: u.avatar_url.clone(),
            created_at: u.created_at,
        }
    }
}

/// Registration request body.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100))]
    pub fullname: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Profile update body. Omitted fields keep their current value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 100))]
    pub fullname: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
}

/// Password change body.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
    pub confirm_password: String,
}

/// DTO for inserting a user; the password is already hashed.
#[derive(Debug)]
pub struct CreateUser {
    pub fullname: String,
    pub email: String,
    pub password_hash: String,
}
