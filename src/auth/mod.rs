/// Authentication module
///
/// Password hashing, session JWTs, refresh token generation and
/// `Authorization` header parsing. Nothing here touches the database.

mod claims;
mod credentials;
mod jwt;
mod password;
mod refresh_token;

pub use claims::Claims;
pub use claims::ISSUER;
pub use credentials::get_api_key;
pub use credentials::get_bearer_token;
pub use jwt::make_jwt;
pub use jwt::validate_jwt;
pub use password::hash_password;
pub use password::reject_unknown_user;
pub use password::verify_password;
pub use refresh_token::make_refresh_token;
