/// JWT Token Generation and Validation
///
/// Session tokens are HS256-signed and stateless: the signature and `exp`
/// decide validity, nothing is looked up server-side.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::{Claims, ISSUER};
use crate::error::AuthError;

/// Issue a signed session token for `user_id`
///
/// # Arguments
/// * `user_id` - Subject of the token
/// * `secret` - HMAC secret shared by issuer and validator
/// * `expires_in` - Lifetime; may be negative, producing an expired token
///
/// # Errors
/// Returns `TokenInvalid` if encoding fails
pub fn make_jwt(
    user_id: Uuid,
    secret: &str,
    expires_in: chrono::Duration,
) -> Result<String, AuthError> {
    let claims = Claims::new(user_id, expires_in);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenInvalid(format!("token generation failed: {}", e)))
}

/// Validate a session token and return the user it was issued for
///
/// # Errors
/// - `InvalidSignature` if the secret differs or the token was altered
/// - `TokenExpired` once `exp` has passed (no leeway)
/// - `TokenInvalid` for anything malformed, including a non-UUID subject
pub fn validate_jwt(token: &str, secret: &str) -> Result<Uuid, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("JWT validation error: {}", e);
        match e.kind() {
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        }
    })?;

    data.claims.user_id()
}
