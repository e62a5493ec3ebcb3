//! Multipart parsing for the create/update post form.

use actix_multipart::{Field, Multipart};
use futures::StreamExt;
use metalframe_core::domain::{ImageUpload, LocalizedText};
use metalframe_core::ports::MediaError;
use metalframe_core::services::PostInput;
use metalframe_shared::dto::fields;

use crate::middleware::error::{AppError, AppResult};

/// Read `title`, `description` and `image` from the form. Unknown fields are skipped.
///
/// Images larger than `max_image_bytes` are rejected while streaming.
pub async fn read_post_form(mut payload: Multipart, max_image_bytes: usize) -> AppResult<PostInput> {
    let mut input = PostInput::default();

    while let Some(field) = payload.next().await {
        let field = field.map_err(|e| AppError::BadRequest(e.to_string()))?;
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            fields::TITLE => input.title = Some(read_text(field).await?),
            fields::DESCRIPTION => input.description = Some(read_text(field).await?),
            fields::IMAGE => input.image = read_image(field, max_image_bytes).await?,
            other => {
                tracing::debug!(field = other, "Skipping unknown form field");
                read_bytes(field, usize::MAX).await?;
            }
        }
    }

    Ok(input)
}

async fn read_text(field: Field) -> AppResult<LocalizedText> {
    let bytes = read_bytes(field, usize::MAX).await?;
    let raw = String::from_utf8(bytes).map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(LocalizedText::from_form_value(&raw))
}

async fn read_image(field: Field, max_bytes: usize) -> AppResult<Option<ImageUpload>> {
    let file_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .unwrap_or("image")
        .to_string();
    let content_type = field.content_type().map(|m| m.to_string());

    let bytes = read_bytes(field, max_bytes).await?;
    if bytes.is_empty() {
        return Ok(None);
    }

    let mut image = ImageUpload::new(file_name, bytes);
    if let Some(content_type) = content_type {
        image = image.with_content_type(content_type);
    }
    Ok(Some(image))
}

async fn read_bytes(mut field: Field, limit: usize) -> AppResult<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
        if bytes.len() + chunk.len() > limit {
            return Err(MediaError::TooLarge {
                size: bytes.len() + chunk.len(),
                limit,
            }
            .into());
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}
