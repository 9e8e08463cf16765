use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The identity a token is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaim {
    pub user_id: Uuid,
    pub email: String,
}

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token, the user's unique identifier.
    pub sub: Uuid,
    /// Email the user logged in with.
    pub email: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Issues and validates HS256 bearer tokens.
///
/// The signing secret is handed in at startup; nothing here reads the environment.
/// Validation is stateless, so a token stays valid until `exp` whatever happens on the
/// server in the meantime.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is absolute
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::days(ttl_days),
        }
    }

    /// Generates a token for `claim` that expires `ttl_days` from now.
    pub fn issue(&self, claim: &SessionClaim) -> Result<String, AppError> {
        self.issue_at(claim, Utc::now())
    }

    /// Generates a token as if it had been issued at `issued_at`.
    pub fn issue_at(
        &self,
        claim: &SessionClaim,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: claim.user_id,
            email: claim.email.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies a token's signature and expiry and returns its claims unchanged.
    pub fn validate(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding_key, &self.validation).map(|data| data.claims)
    }
}
