/// Authentication Routes
///
/// Login, session refresh and refresh token revocation.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::{
    get_bearer_token, make_jwt, make_refresh_token, reject_unknown_user, verify_password,
};
use crate::configuration::JwtSettings;
use crate::database::{refresh_tokens, users};
use crate::error::{AppError, AuthError};
use crate::routes::users::UserResponse;

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response of `POST /api/refresh`
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/login
///
/// Returns the user with a fresh session token and refresh token.
///
/// # Errors
/// - 401: unknown email or wrong password (same message for both)
pub async fn login(
    form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let LoginRequest { email, password } = form.into_inner();

    let user = match users::get_user_by_email(pool.get_ref(), email.trim()).await? {
        Some(user) => user,
        None => {
            let error = web::block(move || reject_unknown_user(&password)).await?;
            return Err(error.into());
        }
    };

    let hashed_password = user.hashed_password.clone();
    web::block(move || verify_password(&hashed_password, &password)).await??;

    let token = make_jwt(user.id, &jwt_config.secret, jwt_config.access_token_ttl())?;
    let refresh_token = make_refresh_token()?;
    refresh_tokens::create_refresh_token(
        pool.get_ref(),
        &refresh_token,
        user.id,
        jwt_config.refresh_token_ttl(),
    )
    .await?;

    tracing::info!(user_id = %user.id, "User logged in");

    let mut response = UserResponse::from(user);
    response.token = Some(token);
    response.refresh_token = Some(refresh_token);

    Ok(HttpResponse::Ok().json(response))
}

/// POST /api/refresh
///
/// Exchanges `Authorization: Bearer <refresh_token>` for a new session token.
///
/// # Errors
/// - 401: missing header, or a refresh token that is unknown, expired or revoked
pub async fn refresh(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let presented = get_bearer_token(req.headers())?;

    let record = refresh_tokens::get_refresh_token(pool.get_ref(), presented)
        .await?
        .ok_or_else(|| AuthError::RefreshTokenRejected("unknown token".to_string()))?;

    if !record.is_usable(Utc::now()) {
        let reason = if record.revoked_at.is_some() {
            "revoked"
        } else {
            "expired"
        };
        tracing::info!(user_id = %record.user_id, reason, "Refresh token rejected");
        return Err(AuthError::RefreshTokenRejected(reason.to_string()).into());
    }

    let token = make_jwt(record.user_id, &jwt_config.secret, jwt_config.access_token_ttl())?;

    tracing::info!(user_id = %record.user_id, "Session token refreshed");

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// POST /api/revoke
///
/// Revokes the refresh token presented as the bearer credential.
pub async fn revoke(req: HttpRequest, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let presented = get_bearer_token(req.headers())?;

    refresh_tokens::revoke_refresh_token(pool.get_ref(), presented).await?;

    Ok(HttpResponse::NoContent().finish())
}
