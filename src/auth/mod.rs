pub mod bearer;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::User;

// Re-export necessary items
pub use bearer::bearer_token;
pub use extractors::AuthClaims;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenCodec};

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address. Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// User's password. Must be non-empty.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
///
/// The same shape (and rules) applies to the admin-style create-user
/// endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name for the new account. Must be non-empty.
    #[validate(length(min = 1))]
    pub name: String,
    /// Email address for the new account. Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// Password for the new account. Must be at least 8 characters long.
    #[validate(length(min = 8))]
    pub password: String,
}

/// Response structure after successful authentication (login or
/// registration): the public user record plus the issued bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}
