//! Post use cases behind the HTTP API.

use std::sync::Arc;

use crate::domain::{ImageUpload, LocalizedText, NewPost, Post, PostChanges, PostId};
use crate::error::{DomainError, RepoError};
use crate::ports::{MediaStore, PostRepository};

/// Fields submitted for a create or update. Blank text counts as absent.
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub title: Option<LocalizedText>,
    pub description: Option<LocalizedText>,
    pub image: Option<ImageUpload>,
}

impl PostInput {
    fn into_parts(
        self,
    ) -> (
        Option<LocalizedText>,
        Option<LocalizedText>,
        Option<ImageUpload>,
    ) {
        (
            self.title.filter(|t| !t.is_blank()),
            self.description.filter(|d| !d.is_blank()),
            self.image.filter(|i| !i.is_empty()),
        )
    }
}

/// Post service: keeps the repository and the media store consistent.
pub struct PostService {
    repo: Arc<dyn PostRepository>,
    media: Arc<dyn MediaStore>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>, media: Arc<dyn MediaStore>) -> Self {
        Self { repo, media }
    }

    /// All posts, newest first.
    pub async fn list(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.repo.list().await?)
    }

    /// Upload the image and insert the post. The image is mandatory.
    pub async fn create(&self, input: PostInput) -> Result<Post, DomainError> {
        let (title, description, image) = input.into_parts();
        let image =
            image.ok_or_else(|| DomainError::Validation("Image is required".to_string()))?;
        let title =
            title.ok_or_else(|| DomainError::Validation("Title is required".to_string()))?;
        let description = description
            .ok_or_else(|| DomainError::Validation("Description is required".to_string()))?;

        let image_url = self.media.upload(image).await?;
        tracing::debug!(image_url = %image_url, "Image uploaded");

        let post = match self
            .repo
            .insert(NewPost::new(title, description, image_url.clone()))
            .await
        {
            Ok(post) => post,
            Err(e) => {
                self.discard_image(&image_url).await;
                return Err(e.into());
            }
        };

        tracing::info!(post_id = %post.id, title = %post.title.display_title(), "Post created");
        Ok(post)
    }

    /// Update the post with `id`. Absent fields keep their stored values.
    ///
    /// A new image replaces the old one; the old file is removed only after
    /// the record points at the new one.
    pub async fn update(&self, id: &PostId, input: PostInput) -> Result<Post, DomainError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        let (title, description, image) = input.into_parts();
        let new_image_url = match image {
            Some(image) => Some(self.media.upload(image).await?),
            None => None,
        };

        let changes = PostChanges {
            title,
            description,
            image_url: new_image_url.clone(),
        };
        let post = match self.repo.update(id, changes).await {
            Ok(post) => post,
            Err(e) => {
                if let Some(url) = &new_image_url {
                    self.discard_image(url).await;
                }
                return Err(match e {
                    RepoError::NotFound => not_found(id),
                    other => other.into(),
                });
            }
        };

        if new_image_url.is_some() && existing.has_image() {
            self.discard_image(&existing.image_url).await;
        }

        tracing::info!(post_id = %post.id, title = %post.title.display_title(), "Post updated");
        Ok(post)
    }

    /// Delete the post and, best-effort, its image.
    pub async fn delete(&self, id: &PostId) -> Result<(), DomainError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        self.repo.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => not_found(id),
            other => other.into(),
        })?;

        tracing::info!(post_id = %id, title = %existing.title.display_title(), "Post deleted");

        if existing.has_image() {
            self.discard_image(&existing.image_url).await;
        }
        Ok(())
    }

    /// Bulk insert posts exported from a client's local cache.
    pub async fn import(&self, posts: Vec<NewPost>) -> Result<usize, DomainError> {
        let imported = self.repo.insert_many(posts).await?;
        tracing::info!(imported, "Posts imported");
        Ok(imported)
    }

    async fn discard_image(&self, url: &str) {
        if let Err(e) = self.media.delete_by_url(url).await {
            tracing::warn!(image_url = %url, error = %e, "Failed to delete image");
        }
    }
}

fn not_found(id: &PostId) -> DomainError {
    DomainError::NotFound {
        entity_type: "Post",
        id: id.to_string(),
    }
}
