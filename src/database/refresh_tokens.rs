/// Refresh token storage
///
/// Tokens are stored as issued (the 64-char hex string is the primary key).
/// Revocation sets `revoked_at`; rows are only deleted with their user.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    /// A token can be exchanged while it is unexpired and unrevoked
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at && self.revoked_at.is_none()
    }
}

pub async fn create_refresh_token(
    pool: &PgPool,
    token: &str,
    user_id: Uuid,
    expires_in: chrono::Duration,
) -> Result<RefreshTokenRecord, AppError> {
    let now = Utc::now();
    let record = sqlx::query_as::<_, RefreshTokenRecord>(
        r#"
        INSERT INTO refresh_tokens (token, created_at, updated_at, user_id, expires_at, revoked_at)
        VALUES ($1, $2, $3, $4, $5, NULL)
        RETURNING token, created_at, updated_at, user_id, expires_at, revoked_at
        "#,
    )
    .bind(token)
    .bind(now)
    .bind(now)
    .bind(user_id)
    .bind(now + expires_in)
    .fetch_one(pool)
    .await?;

    Ok(record)
}

pub async fn get_refresh_token(
    pool: &PgPool,
    token: &str,
) -> Result<Option<RefreshTokenRecord>, AppError> {
    let record = sqlx::query_as::<_, RefreshTokenRecord>(
        r#"
        SELECT token, created_at, updated_at, user_id, expires_at, revoked_at
        FROM refresh_tokens
        WHERE token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Mark a token revoked. Already-revoked and unknown tokens are left alone.
pub async fn revoke_refresh_token(pool: &PgPool, token: &str) -> Result<(), AppError> {
    let now = Utc::now();
    sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked_at = $1, updated_at = $1
        WHERE token = $2 AND revoked_at IS NULL
        "#,
    )
    .bind(now)
    .bind(token)
    .execute(pool)
    .await?;

    Ok(())
}
