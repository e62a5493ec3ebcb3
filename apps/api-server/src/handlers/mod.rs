//! HTTP handlers and route configuration.

mod form;
mod health;
mod import;
mod posts;
mod uploads;


use actix_web::{error::JsonPayloadError, web};

pub use uploads::UploadDir;

use crate::middleware::error::AppError;

/// JSON body limit; imported posts may carry inline images.
const JSON_LIMIT: usize = 25 * 1024 * 1024;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT)
            .error_handler(|err, _req| json_error(err).into()),
    )
    .service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/posts", web::get().to(posts::list_posts))
            .route("/posts", web::post().to(posts::create_post))
            .route("/posts/{id}", web::put().to(posts::update_post))
            .route("/posts/{id}", web::delete().to(posts::delete_post))
            .route("/import", web::post().to(import::import_posts)),
    );
}

/// Serve locally stored images under `/uploads`.
pub fn configure_uploads(dir: UploadDir) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(dir))
            .route("/uploads/{file}", web::get().to(uploads::serve_upload));
    }
}

fn json_error(err: JsonPayloadError) -> AppError {
    match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            AppError::PayloadTooLarge(err.to_string())
        }
        other => AppError::BadRequest(other.to_string()),
    }
}
