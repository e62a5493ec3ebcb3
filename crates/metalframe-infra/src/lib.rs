//! # MetalFrame Infrastructure
//!
//! Concrete implementations of the ports defined in `metalframe-core`.
//! This crate contains the post repositories, media stores, local stores
//! and the HTTP client for the posts API.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, JSON file and in-memory only
//! - `postgres` - PostgreSQL post repository via SeaORM
//! - `cloudinary` - Cloudinary media store
//! - `http-client` - reqwest client for the posts API

pub mod database;
pub mod media;
pub mod store;

#[cfg(feature = "http-client")]
pub mod api_client;

// Re-exports - always available
pub use database::{DatabaseConfig, InMemoryPostRepository, JsonFilePostRepository};
pub use media::LocalDiskMediaStore;
pub use store::{FileStore, InMemoryStore};

#[cfg(feature = "postgres")]
pub use database::PostgresPostRepository;

#[cfg(feature = "cloudinary")]
pub use media::{CloudinaryConfig, CloudinaryMediaStore};

#[cfg(feature = "http-client")]
pub use api_client::HttpPostsApi;
