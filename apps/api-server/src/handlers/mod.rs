//! HTTP handlers and route configuration.

mod auth;
mod form;
mod health;
mod posts;


use actix_web::{error, web};

use crate::middleware::error::AppError;

/// Request bodies (JSON and urlencoded forms) above this are rejected.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
        .app_data(web::FormConfig::default().limit(MAX_BODY_BYTES))
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            error::Error::from(AppError::BadRequest(format!("Malformed JSON body: {err}")))
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            error::Error::from(AppError::BadRequest(format!("Malformed query string: {err}")))
        }))
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login))
                        .route("/me", web::get().to(auth::me)),
                )
                // Authenticated routes
                .service(
                    web::resource("/posts")
                        .route(web::get().to(posts::index))
                        .route(web::post().to(posts::store)),
                )
                .service(
                    web::resource("/posts/{id}")
                        .route(web::get().to(posts::show))
                        .route(web::put().to(posts::update))
                        .route(web::patch().to(posts::update))
                        .route(web::delete().to(posts::destroy)),
                ),
        );
}
