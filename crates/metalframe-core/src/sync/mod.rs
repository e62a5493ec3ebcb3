//! Posts synchronization - the client-side data layer.
//!
//! Every read probes the API. When it answers, the session runs in
//! [`StorageMode::Api`] and writes go to the backend; when it does not, the
//! session drops to [`StorageMode::Local`] and reads and writes use the
//! local post cache instead. The two stores are never merged: a mode switch
//! changes which one is authoritative, nothing more. [`PostsSync::import_local`]
//! is the only bridge, and it is explicit.

mod local;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::domain::{ImageUpload, NewPost, Post, PostChanges, PostForm, PostId, ValidatedPost};
use crate::error::{
    DELETE_FAILED, FormField, IDS_EXHAUSTED, IMPORT_FAILED, NOT_FOUND_LOCALLY, SUBMIT_FAILED,
    SyncError, ValidationError,
};
use crate::ports::{LocalStore, PostPayload, PostsApi};

pub use local::{LOCAL_POSTS_SLOT, LocalPostCache};

pub const STATUS_CREATED: &str = "Post created.";
pub const STATUS_UPDATED: &str = "Post updated.";
pub const STATUS_CREATED_LOCAL: &str = "Post created (local).";
pub const STATUS_UPDATED_LOCAL: &str = "Post updated (local).";

/// Which store is authoritative for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    #[default]
    Api,
    Local,
}

/// Per-client state threaded through every call.
#[derive(Debug, Default)]
pub struct Session {
    mode: StorageMode,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    fn set_mode(&mut self, mode: StorageMode) {
        if self.mode != mode {
            tracing::info!(from = ?self.mode, to = ?mode, "Storage mode changed");
        }
        self.mode = mode;
    }
}

/// Result of a write: a status line for the user and the reloaded list.
#[derive(Debug, Clone)]
pub struct WriteOutcome {
    pub status: Option<&'static str>,
    pub posts: Vec<Post>,
}

/// Data access for the admin surface and the gallery.
#[derive(Clone)]
pub struct PostsSync {
    api: Arc<dyn PostsApi>,
    cache: LocalPostCache,
}

impl PostsSync {
    pub fn new(api: Arc<dyn PostsApi>, store: Arc<dyn LocalStore>) -> Self {
        Self {
            api,
            cache: LocalPostCache::new(store),
        }
    }

    /// Load posts from the API, or from the local cache if the API fails.
    ///
    /// Updates the session mode accordingly. Never fails.
    pub async fn fetch_posts(&self, session: &mut Session) -> Vec<Post> {
        match self.api.list().await {
            Ok(posts) => {
                session.set_mode(StorageMode::Api);
                posts
            }
            Err(e) => {
                tracing::warn!(error = %e, "Posts API unavailable, reading local cache");
                session.set_mode(StorageMode::Local);
                self.cache.load().await
            }
        }
    }

    /// Look up one post for editing. Re-probes the mode like any read.
    pub async fn find_post(&self, session: &mut Session, id: &PostId) -> Option<Post> {
        self.fetch_posts(session)
            .await
            .into_iter()
            .find(|post| post.id == *id)
    }

    /// Create (no `existing_id`) or update a post from the admin form.
    ///
    /// Validation runs before anything else; a failure leaves both stores
    /// untouched. Creating is not idempotent: submitting the same form twice
    /// creates two posts.
    pub async fn submit_post(
        &self,
        session: &mut Session,
        form: PostForm,
        existing_id: Option<&PostId>,
    ) -> Result<WriteOutcome, SyncError> {
        let creating = existing_id.is_none();
        let valid = form.validate(creating)?;

        let status = match session.mode() {
            StorageMode::Api => {
                self.submit_remote(valid, existing_id).await?;
                if creating { STATUS_CREATED } else { STATUS_UPDATED }
            }
            StorageMode::Local => {
                self.submit_local(valid, existing_id).await?;
                if creating {
                    STATUS_CREATED_LOCAL
                } else {
                    STATUS_UPDATED_LOCAL
                }
            }
        };

        let posts = self.fetch_posts(session).await;
        Ok(WriteOutcome {
            status: Some(status),
            posts,
        })
    }

    /// Delete a post from the authoritative store.
    ///
    /// In local mode an unknown id is a no-op.
    pub async fn delete_post(
        &self,
        session: &mut Session,
        id: &PostId,
    ) -> Result<WriteOutcome, SyncError> {
        match session.mode() {
            StorageMode::Api => {
                self.api
                    .delete(id)
                    .await
                    .map_err(|e| SyncError::from_api(e, DELETE_FAILED))?;
                tracing::info!(post_id = %id, "Post deleted");
            }
            StorageMode::Local => {
                let mut posts = self.cache.load().await;
                if let Some(idx) = posts.iter().position(|post| post.id == *id) {
                    posts.remove(idx);
                    self.cache
                        .save(&posts)
                        .await
                        .map_err(|e| SyncError::Storage(e.to_string()))?;
                    tracing::info!(post_id = %id, "Post deleted (local)");
                }
            }
        }

        let posts = self.fetch_posts(session).await;
        Ok(WriteOutcome {
            status: None,
            posts,
        })
    }

    /// Push the whole local cache to the API for bulk insertion.
    ///
    /// Append-only: posts already on the server are duplicated, and the
    /// local cache is left as it is.
    pub async fn import_local(&self) -> Result<usize, SyncError> {
        let posts = self.cache.load().await;
        let imported = self
            .api
            .import(posts)
            .await
            .map_err(|e| SyncError::from_api(e, IMPORT_FAILED))?;
        tracing::info!(imported, "Local posts imported");
        Ok(imported)
    }

    async fn submit_remote(
        &self,
        valid: ValidatedPost,
        existing_id: Option<&PostId>,
    ) -> Result<Post, SyncError> {
        let payload = PostPayload {
            title: valid.title,
            description: valid.description,
            image: valid.image,
        };
        let result = match existing_id {
            Some(id) => self.api.update(id, payload).await,
            None => self.api.create(payload).await,
        };
        let post = result.map_err(|e| SyncError::from_api(e, SUBMIT_FAILED))?;
        tracing::info!(post_id = %post.id, title = %post.title.display_title(), "Post saved");
        Ok(post)
    }

    async fn submit_local(
        &self,
        valid: ValidatedPost,
        existing_id: Option<&PostId>,
    ) -> Result<(), SyncError> {
        let mut posts = self.cache.load().await;

        match existing_id {
            Some(id) => {
                let post = posts
                    .iter_mut()
                    .find(|post| post.id == *id)
                    .ok_or_else(|| SyncError::NotFound(NOT_FOUND_LOCALLY.to_string()))?;
                PostChanges {
                    title: Some(valid.title),
                    description: Some(valid.description),
                    image_url: valid.image.as_ref().map(ImageUpload::to_data_url),
                }
                .apply_to(post);
            }
            None => {
                let image = valid
                    .image
                    .ok_or_else(|| ValidationError::new(FormField::Image))?;
                let id = PostId::next_after(posts.iter().map(|post| &post.id))
                    .ok_or_else(|| SyncError::Storage(IDS_EXHAUSTED.to_string()))?;
                let post = NewPost::new(valid.title, valid.description, image.to_data_url())
                    .into_post(id);
                posts.insert(0, post);
            }
        }

        self.cache
            .save(&posts)
            .await
            .map_err(|e| SyncError::Storage(e.to_string()))
    }
}
