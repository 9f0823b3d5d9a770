use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChirpRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

pub async fn create_chirp(pool: &PgPool, user_id: Uuid, body: &str) -> Result<ChirpRecord, AppError> {
    let now = Utc::now();
    let chirp = sqlx::query_as::<_, ChirpRecord>(
        r#"
        INSERT INTO chirps (id, created_at, updated_at, body, user_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, created_at, updated_at, body, user_id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(now)
    .bind(now)
    .bind(body)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(chirp)
}

/// All chirps, oldest first
pub async fn get_all_chirps(pool: &PgPool) -> Result<Vec<ChirpRecord>, AppError> {
    let chirps = sqlx::query_as::<_, ChirpRecord>(
        r#"
        SELECT id, created_at, updated_at, body, user_id
        FROM chirps
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(chirps)
}

pub async fn get_chirp(pool: &PgPool, chirp_id: Uuid) -> Result<Option<ChirpRecord>, AppError> {
    let chirp = sqlx::query_as::<_, ChirpRecord>(
        r#"
        SELECT id, created_at, updated_at, body, user_id
        FROM chirps
        WHERE id = $1
        "#,
    )
    .bind(chirp_id)
    .fetch_optional(pool)
    .await?;

    Ok(chirp)
}

pub async fn delete_chirp(pool: &PgPool, chirp_id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM chirps WHERE id = $1")
        .bind(chirp_id)
        .execute(pool)
        .await?;

    Ok(())
}
