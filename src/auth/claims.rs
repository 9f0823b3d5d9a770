/// JWT Claims structure
///
/// Registered claims only (RFC 7519): who issued the token, when, until
/// when, and for which user.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// Issuer written into, and required from, every session token
pub const ISSUER: &str = "chirpy";

/// JWT Claims for session tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Subject (user ID as UUID string)
    pub sub: String,
}

impl Claims {
    /// Create claims for `user_id`, valid for `expires_in` from now.
    ///
    /// A negative `expires_in` yields claims that are already expired.
    pub fn new(user_id: Uuid, expires_in: chrono::Duration) -> Self {
        let now = chrono::Utc::now();
        Self {
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            sub: user_id.to_string(),
        }
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// Returns `TokenInvalid` if the subject is not a UUID
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub)
            .map_err(|e| AuthError::TokenInvalid(format!("subject is not a user id: {}", e)))
    }
}
