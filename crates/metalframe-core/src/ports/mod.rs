//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod media;
mod posts_api;
mod repository;
mod store;

pub use media::{MediaError, MediaStore};
pub use posts_api::{ApiError, PostPayload, PostsApi};
pub use repository::PostRepository;
pub use store::{LocalStore, StoreError};
