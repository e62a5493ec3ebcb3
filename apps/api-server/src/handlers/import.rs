//! Bulk import of posts kept in a client's local cache.

use actix_web::{HttpResponse, web};
use metalframe_core::domain::NewPost;
use metalframe_shared::dto::{ImportRequest, ImportResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/import
///
/// Append-only: every received post becomes a new record.
pub async fn import_posts(
    state: web::Data<AppState>,
    body: web::Json<ImportRequest<NewPost>>,
) -> AppResult<HttpResponse> {
    let posts = body.into_inner().posts;
    let imported = state.posts.import(posts).await?;
    Ok(HttpResponse::Ok().json(ImportResponse::new(imported)))
}
