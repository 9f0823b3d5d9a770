/// Credential extraction from the `Authorization` header
///
/// Both extractors split on whitespace. The bearer form takes the second
/// field, the API-key form takes the last one so a bare key also works.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};

use crate::error::AuthError;

fn authorization_value(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::MalformedCredentials("header is not valid text".to_string()))?;

    if value.trim().is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    Ok(value)
}

/// Returns the token from `Authorization: Bearer <token>`
///
/// # Errors
/// - `MissingCredentials` if the header is absent or blank
/// - `MalformedCredentials` if there is no second field
pub fn get_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    authorization_value(headers)?
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| AuthError::MalformedCredentials("expected `Bearer <token>`".to_string()))
}

/// Returns the last whitespace-separated field of the `Authorization` header
///
/// # Errors
/// - `MissingCredentials` if the header is absent or blank
pub fn get_api_key(headers: &HeaderMap) -> Result<&str, AuthError> {
    authorization_value(headers)?
        .split_whitespace()
        .last()
        .ok_or_else(|| AuthError::MalformedCredentials("no API key present".to_string()))
}
