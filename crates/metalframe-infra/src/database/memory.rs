//! In-memory post repository - used when no database is configured or reachable.

use async_trait::async_trait;
use tokio::sync::RwLock;

use metalframe_core::domain::{NewPost, Post, PostChanges, PostId};
use metalframe_core::error::RepoError;
use metalframe_core::ports::PostRepository;

use super::{allocate_id, newest_first};

#[derive(Default)]
struct State {
    posts: Vec<Post>,
    last_id: i64,
}

/// Posts held in a `Vec` behind an async RwLock, newest first.
///
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryPostRepository {
    state: RwLock<State>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let mut posts = self.state.read().await.posts.clone();
        newest_first(&mut posts);
        Ok(posts)
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, RepoError> {
        let state = self.state.read().await;
        Ok(state.posts.iter().find(|p| p.id == *id).cloned())
    }

    async fn insert(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let mut state = self.state.write().await;
        let State { posts, last_id } = &mut *state;
        let post = new_post.into_post(allocate_id(last_id, posts)?);
        posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, id: &PostId, changes: PostChanges) -> Result<Post, RepoError> {
        let mut state = self.state.write().await;
        let post = state
            .posts
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or(RepoError::NotFound)?;
        changes.apply_to(post);
        Ok(post.clone())
    }

    async fn delete(&self, id: &PostId) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        let before = state.posts.len();
        state.posts.retain(|p| p.id != *id);
        if state.posts.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
