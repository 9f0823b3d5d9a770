/// User Routes
///
/// Registration and credential updates.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::hash_password;
use crate::database::{users, UserRecord};
use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::validators::{is_present_password, is_valid_email};

/// Body of `POST /api/users` and `PUT /api/users`
#[derive(Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public view of a user. `token` and `refresh_token` are only set on login.
#[derive(Serialize, Debug)]
pub struct UserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email,
            is_chirpy_red: user.is_chirpy_red,
            token: None,
            refresh_token: None,
        }
    }
}

/// Validates the body and hashes the password off the async workers
async fn validated_credentials(form: CredentialsRequest) -> Result<(String, String), AppError> {
    let email = is_valid_email(&form.email)?;
    is_present_password(&form.password)?;

    let password = form.password;
    let hashed_password = web::block(move || hash_password(&password)).await??;

    Ok((email, hashed_password))
}

/// POST /api/users
///
/// # Errors
/// - 400: missing or invalid email/password
/// - 409: email already registered
pub async fn create_user(
    form: web::Json<CredentialsRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let (email, hashed_password) = validated_credentials(form.into_inner()).await?;

    let user = users::create_user(pool.get_ref(), &email, &hashed_password).await?;

    tracing::info!(user_id = %user.id, "User created");

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// PUT /api/users
///
/// Replaces the caller's email and password. **Requires a session token.**
pub async fn update_user(
    user: web::ReqData<AuthenticatedUser>,
    form: web::Json<CredentialsRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.user_id;
    let (email, hashed_password) = validated_credentials(form.into_inner()).await?;

    let updated =
        users::update_user_credentials(pool.get_ref(), user_id, &email, &hashed_password).await?;

    tracing::info!(user_id = %user_id, "User credentials updated");

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}
