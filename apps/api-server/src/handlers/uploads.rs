//! Serves images written by the local disk media store.

use std::path::PathBuf;

use actix_web::http::header;
use actix_web::{HttpResponse, web};

use crate::middleware::error::{AppError, AppResult};

/// Directory behind `/uploads`.
#[derive(Debug, Clone)]
pub struct UploadDir(pub PathBuf);

/// GET /uploads/{file}
pub async fn serve_upload(
    dir: web::Data<UploadDir>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let name = path.into_inner();
    if name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(AppError::NotFound);
    }

    let bytes = match tokio::fs::read(dir.0.join(&name)).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(AppError::NotFound),
        Err(e) => return Err(AppError::Internal(e.to_string())),
    };

    // Only images get their own content type; everything else downloads as bytes.
    let mime = mime_guess::from_path(&name)
        .first()
        .filter(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .unwrap_or(mime_guess::mime::APPLICATION_OCTET_STREAM);
    Ok(HttpResponse::Ok()
        .content_type(mime.essence_str())
        .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .body(bytes))
}
