use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, DatabaseError};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub hashed_password: String,
    pub is_chirpy_red: bool,
}

/// Insert a new user. A duplicate email surfaces as `UniqueConstraintViolation`.
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    hashed_password: &str,
) -> Result<UserRecord, AppError> {
    let now = Utc::now();
    let user = sqlx::query_as::<_, UserRecord>(
        r#"
        INSERT INTO users (id, created_at, updated_at, email, hashed_password)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, created_at, updated_at, email, hashed_password, is_chirpy_red
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(now)
    .bind(now)
    .bind(email)
    .bind(hashed_password)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>, AppError> {
    let user = sqlx::query_as::<_, UserRecord>(
        r#"
        SELECT id, created_at, updated_at, email, hashed_password, is_chirpy_red
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Replace a user's email and password hash
pub async fn update_user_credentials(
    pool: &PgPool,
    user_id: Uuid,
    email: &str,
    hashed_password: &str,
) -> Result<UserRecord, AppError> {
    sqlx::query_as::<_, UserRecord>(
        r#"
        UPDATE users
        SET email = $2, hashed_password = $3, updated_at = $4
        WHERE id = $1
        RETURNING id, created_at, updated_at, email, hashed_password, is_chirpy_red
        "#,
    )
    .bind(user_id)
    .bind(email)
    .bind(hashed_password)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::Database(DatabaseError::NotFound("User not found".to_string())))
}

/// Flag a user as a Chirpy Red subscriber
///
/// # Errors
/// Returns `NotFound` if no user has this id
pub async fn upgrade_to_chirpy_red(pool: &PgPool, user_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET is_chirpy_red = TRUE, updated_at = $2
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::Database(DatabaseError::NotFound(
            "User not found".to_string(),
        )));
    }

    Ok(())
}

/// Remove every user. Chirps and refresh tokens go with them (ON DELETE CASCADE).
pub async fn delete_all_users(pool: &PgPool) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM users").execute(pool).await?;
    Ok(result.rows_affected())
}
