use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{chirps, ChirpRecord};
use crate::error::{AppError, AuthError, DatabaseError, ValidationError};
use crate::middleware::AuthenticatedUser;
use crate::profanity::replace_profane;
use crate::validators::is_valid_chirp_body;

#[derive(Deserialize)]
pub struct CreateChirpRequest {
    #[serde(default)]
    pub body: String,
}

#[derive(Serialize, Debug)]
pub struct ChirpResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

impl From<ChirpRecord> for ChirpResponse {
    fn from(chirp: ChirpRecord) -> Self {
        Self {
            id: chirp.id,
            created_at: chirp.created_at,
            updated_at: chirp.updated_at,
            body: chirp.body,
            user_id: chirp.user_id,
        }
    }
}

fn parse_chirp_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::Validation(ValidationError::InvalidFormat("chirp id".to_string())))
}

fn chirp_not_found() -> AppError {
    AppError::Database(DatabaseError::NotFound("Chirp not found".to_string()))
}

/// POST /api/chirps (session token required)
pub async fn create_chirp(
    user: web::ReqData<AuthenticatedUser>,
    form: web::Json<CreateChirpRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let body = is_valid_chirp_body(&form.body)?;
    let cleaned = replace_profane(body);

    let chirp = chirps::create_chirp(pool.get_ref(), user.user_id, &cleaned).await?;

    tracing::info!(user_id = %user.user_id, chirp_id = %chirp.id, "Chirp created");

    Ok(HttpResponse::Created().json(ChirpResponse::from(chirp)))
}

/// GET /api/chirps
pub async fn list_chirps(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let chirps: Vec<ChirpResponse> = chirps::get_all_chirps(pool.get_ref())
        .await?
        .into_iter()
        .map(ChirpResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(chirps))
}

/// GET /api/chirps/{chirp_id}
pub async fn get_chirp(
    path: web::Path<String>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = parse_chirp_id(&path)?;

    let chirp = chirps::get_chirp(pool.get_ref(), chirp_id)
        .await?
        .ok_or_else(chirp_not_found)?;

    Ok(HttpResponse::Ok().json(ChirpResponse::from(chirp)))
}

/// DELETE /api/chirps/{chirp_id} (session token required, author only)
pub async fn delete_chirp(
    user: web::ReqData<AuthenticatedUser>,
    path: web::Path<String>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = parse_chirp_id(&path)?;

    let chirp = chirps::get_chirp(pool.get_ref(), chirp_id)
        .await?
        .ok_or_else(chirp_not_found)?;

    if chirp.user_id != user.user_id {
        tracing::warn!(
            user_id = %user.user_id,
            chirp_id = %chirp_id,
            "Attempt to delete another user's chirp"
        );
        return Err(AuthError::Forbidden("You can only delete your own chirps".to_string()).into());
    }

    chirps::delete_chirp(pool.get_ref(), chirp_id).await?;

    tracing::info!(user_id = %user.user_id, chirp_id = %chirp_id, "Chirp deleted");

    Ok(HttpResponse::NoContent().finish())
}
