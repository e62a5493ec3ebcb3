//! Post repositories and database connection management.

mod connections;
mod json_file;
mod memory;

#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

pub use connections::DatabaseConfig;
pub use json_file::JsonFilePostRepository;
pub use memory::InMemoryPostRepository;

#[cfg(feature = "postgres")]
pub use connections::connect;
#[cfg(feature = "postgres")]
pub use postgres_repo::PostgresPostRepository;

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;

use metalframe_core::domain::{Post, PostId};
use metalframe_core::error::{IDS_EXHAUSTED, RepoError};

/// Newest `created_at` first, higher numeric id first on ties.
fn newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.as_number().cmp(&a.id.as_number()))
    });
}

/// Hand out the id after both `last_id` and every stored numeric id, then
/// raise `last_id` to it. Deleting the newest post never frees its id.
fn allocate_id(last_id: &mut i64, posts: &[Post]) -> Result<PostId, RepoError> {
    let floor = posts
        .iter()
        .filter_map(|p| p.id.as_number())
        .fold(*last_id, i64::max);
    let next = floor
        .checked_add(1)
        .ok_or_else(|| RepoError::Query(IDS_EXHAUSTED.to_string()))?;
    *last_id = next;
    Ok(PostId::from(next.to_string()))
}
