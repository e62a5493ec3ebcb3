use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostChanges, PostId};
use crate::error::RepoError;

/// Durable storage of post records.
///
/// Implementations decide the id format; callers treat ids as opaque.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts, newest first.
    async fn list(&self) -> Result<Vec<Post>, RepoError>;

    /// Find a post by its id.
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, RepoError>;

    /// Insert a new post and return it with its assigned id.
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Apply `changes` to the post with `id`. Unknown ids yield `RepoError::NotFound`.
    async fn update(&self, id: &PostId, changes: PostChanges) -> Result<Post, RepoError>;

    /// Delete the post with `id`. Unknown ids yield `RepoError::NotFound`.
    async fn delete(&self, id: &PostId) -> Result<(), RepoError>;

    /// Append every post in order. No deduplication.
    async fn insert_many(&self, posts: Vec<NewPost>) -> Result<usize, RepoError> {
        let mut inserted = 0;
        for post in posts {
            self.insert(post).await?;
            inserted += 1;
        }
        Ok(inserted)
    }
}
