use actix_web::{http::header::ContentType, web, HttpResponse};
use sqlx::PgPool;

use crate::configuration::ApplicationSettings;
use crate::error::{AppError, AuthError};
use crate::metrics::ApiMetrics;

pub fn metrics_page(hits: i32) -> String {
    format!(
        r#"<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
  </body>
</html>"#,
        hits
    )
}

/// GET /admin/metrics
pub async fn metrics(metrics: web::Data<ApiMetrics>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(metrics_page(metrics.hits()))
}

/// POST /admin/reset
///
/// Zeroes the hit counter and deletes every user. Only on the `dev` platform.
pub async fn reset(
    metrics: web::Data<ApiMetrics>,
    pool: web::Data<PgPool>,
    application: web::Data<ApplicationSettings>,
) -> Result<HttpResponse, AppError> {
    if !application.is_dev() {
        return Err(AuthError::Forbidden(
            "Reset is only allowed in development mode".to_string(),
        )
        .into());
    }

    metrics.reset();
    let deleted = crate::database::users::delete_all_users(pool.get_ref()).await?;

    tracing::warn!(deleted_users = deleted, "Hits counter and user table reset");

    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body("Hits counter and user table reset"))
}
