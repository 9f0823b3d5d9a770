/// Refresh Token Generation
///
/// Refresh tokens are opaque: 32 bytes from the OS random source, hex-encoded
/// to 64 characters. Persistence and revocation live in
/// `database::refresh_tokens`.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::AuthError;

const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a new refresh token
///
/// # Errors
/// Returns `Hashing` if the OS random source is unavailable
pub fn make_refresh_token() -> Result<String, AuthError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AuthError::Hashing(format!("random source failed: {}", e)))?;

    Ok(hex::encode(bytes))
}
