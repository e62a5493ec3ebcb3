//! Post endpoints.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use metalframe_core::domain::PostId;
use metalframe_shared::OkResponse;

use super::form::read_post_form;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// POST /api/posts
pub async fn create_post(state: web::Data<AppState>, payload: Multipart) -> AppResult<HttpResponse> {
    let input = read_post_form(payload, state.max_image_bytes).await?;
    let post = state.posts.create(input).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let id = PostId::from(path.into_inner());
    let input = read_post_form(payload, state.max_image_bytes).await?;
    let post = state.posts.update(&id, input).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = PostId::from(path.into_inner());
    state.posts.delete(&id).await?;
    Ok(HttpResponse::Ok().json(OkResponse::ok()))
}
