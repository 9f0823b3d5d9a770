/// Password Hashing and Verification
///
/// bcrypt at the library default cost. Verification failures are reported as
/// a single `InvalidCredentials` whatever the cause.

use bcrypt::{hash, verify, DEFAULT_COST};
use lazy_static::lazy_static;

use crate::error::{AppError, AuthError, ValidationError};

/// bcrypt ignores everything past 72 bytes of input
const MAX_PASSWORD_BYTES: usize = 72;

lazy_static! {
    /// Checked in place of a stored hash when no account matches
    static ref DUMMY_HASH: Option<String> = hash("chirpy-no-such-user", DEFAULT_COST).ok();
}

/// Hash a password using bcrypt
///
/// # Errors
/// - `Validation` if the password is longer than bcrypt can hash
/// - `Auth(Hashing)` if bcrypt itself fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::Validation(ValidationError::TooLong(
            "password".to_string(),
            MAX_PASSWORD_BYTES,
        )));
    }

    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Auth(AuthError::Hashing(e.to_string())))
}

/// Verify `password` against a stored bcrypt `hash`
///
/// # Errors
/// Returns `InvalidCredentials` on mismatch and on an unparseable hash alike
pub fn verify_password(hash: &str, password: &str) -> Result<(), AuthError> {
    match verify(password, hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AuthError::InvalidCredentials),
        Err(e) => {
            tracing::warn!("Stored password hash could not be checked: {}", e);
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Rejects a login for an email with no account.
///
/// Runs one bcrypt verification first so this path costs the same as a
/// wrong password.
pub fn reject_unknown_user(password: &str) -> AuthError {
    if let Some(dummy) = DUMMY_HASH.as_ref() {
        let _ = verify(password, dummy);
    }
    AuthError::InvalidCredentials
}
