/// Polka payment webhooks
///
/// Authenticated by a shared API key in the `Authorization` header.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::get_api_key;
use crate::configuration::PolkaSettings;
use crate::database::users;
use crate::error::{AppError, AuthError, ValidationError};

const USER_UPGRADED: &str = "user.upgraded";

#[derive(Deserialize)]
pub struct PolkaWebhook {
    pub event: String,
    #[serde(default)]
    pub data: PolkaWebhookData,
}

#[derive(Deserialize, Default)]
pub struct PolkaWebhookData {
    #[serde(default)]
    pub user_id: String,
}

/// POST /api/polka/webhooks
///
/// Upgrades a user to Chirpy Red on `user.upgraded`; any other event is
/// acknowledged with 204 and ignored.
///
/// # Errors
/// - 401: missing or wrong API key, checked before the body is read
/// - 400: body is not a webhook payload
/// - 400: `data.user_id` is not a UUID
/// - 404: no such user
pub async fn polka_webhook(
    req: HttpRequest,
    body: web::Bytes,
    pool: web::Data<PgPool>,
    polka: web::Data<PolkaSettings>,
) -> Result<HttpResponse, AppError> {
    let api_key = get_api_key(req.headers())?;
    if api_key != polka.api_key {
        return Err(AuthError::InvalidApiKey.into());
    }

    // Body is only decoded once the caller is known
    let payload: PolkaWebhook = serde_json::from_slice(&body)
        .map_err(|e| ValidationError::MalformedBody(e.to_string()))?;

    if payload.event != USER_UPGRADED {
        tracing::debug!(event = %payload.event, "Ignoring Polka event");
        return Ok(HttpResponse::NoContent().finish());
    }

    let user_id = Uuid::parse_str(&payload.data.user_id)
        .map_err(|_| ValidationError::InvalidFormat("data.user_id".to_string()))?;

    users::upgrade_to_chirpy_red(pool.get_ref(), user_id).await?;

    tracing::info!(user_id = %user_id, "User upgraded to Chirpy Red");

    Ok(HttpResponse::NoContent().finish())
}
