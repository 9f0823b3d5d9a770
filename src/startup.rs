use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;

use crate::configuration::Settings;
use crate::error::json_error_handler;
use crate::logger::LoggerMiddleware;
use crate::metrics::ApiMetrics;
use crate::middleware::{HitCounter, JwtMiddleware};
use crate::routes::{
    create_chirp, create_user, delete_chirp, get_chirp, health_check, list_chirps, login, metrics,
    polka_webhook, refresh, reset, revoke, update_user,
};

pub fn run(
    listener: TcpListener,
    connection: PgPool,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let api_metrics = web::Data::new(ApiMetrics::new());
    let connection = web::Data::new(connection);
    let jwt_config = web::Data::new(settings.jwt.clone());
    let application = web::Data::new(settings.application.clone());
    let polka = web::Data::new(settings.polka.clone());
    let jwt_secret = settings.jwt.secret.clone();
    let static_dir = settings.application.static_dir.clone();

    let server = HttpServer::new(move || {
        let require_jwt = JwtMiddleware::new(&jwt_secret);

        App::new()
            // Global middleware
            .wrap(Logger::default())
            .wrap(LoggerMiddleware)

            // Shared state
            .app_data(connection.clone())
            .app_data(jwt_config.clone())
            .app_data(application.clone())
            .app_data(polka.clone())
            .app_data(api_metrics.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))

            // Admin
            .route("/admin/metrics", web::get().to(metrics))
            .route("/admin/reset", web::post().to(reset))

            .service(
                web::scope("/api")
                    .route("/healthz", web::get().to(health_check))
                    .service(
                        web::resource("/users")
                            .route(web::post().to(create_user))
                            .route(web::put().to(update_user).wrap(require_jwt.clone())),
                    )
                    .route("/login", web::post().to(login))
                    .route("/refresh", web::post().to(refresh))
                    .route("/revoke", web::post().to(revoke))
                    .service(
                        web::resource("/chirps")
                            .route(web::get().to(list_chirps))
                            .route(web::post().to(create_chirp).wrap(require_jwt.clone())),
                    )
                    .service(
                        web::resource("/chirps/{chirp_id}")
                            .route(web::get().to(get_chirp))
                            .route(web::delete().to(delete_chirp).wrap(require_jwt)),
                    )
                    .route("/polka/webhooks", web::post().to(polka_webhook)),
            )

            // Static files, counted by the hit counter
            .service(
                web::scope("/app")
                    .wrap(HitCounter::new(api_metrics.clone()))
                    .service(fs::Files::new("", &static_dir).index_file("index.html")),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
