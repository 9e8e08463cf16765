pub mod credentials;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::UserSummary;

// Re-export necessary items
pub use credentials::CredentialStore;
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use token::{Claims, SessionClaim, TokenService};

/// Longest accepted signup avatar string. Must stay below `app::JSON_BODY_LIMIT` so the
/// validator, not the body limit, rejects an oversized avatar.
pub const MAX_AVATAR_LEN: usize = 200_000;

/// Represents the payload for a user login request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address.
    #[validate(length(min = 1, max = 254))]
    pub email: String,
    /// User's password. Any non-empty value is checked against the stored hash.
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Email address for the new account. Must be a valid email format.
    #[validate(email, length(max = 254))]
    pub email: String,
    /// Password for the new account. Must be at least 6 characters long.
    /// bcrypt only looks at the first 72 bytes.
    #[validate(length(min = 6, max = 72))]
    pub password: String,
    /// Optional avatar, usually a URL or data URL. At most `MAX_AVATAR_LEN` characters.
    #[validate(length(max = 200_000))]
    pub image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignupResponse {
    pub message: String,
    pub user_id: Uuid,
}

/// Response structure after a successful login.
/// Contains the JWT access token and the public profile of the user.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    /// The JWT (JSON Web Token) for session authentication.
    pub token: String,
    pub user: UserSummary,
}
