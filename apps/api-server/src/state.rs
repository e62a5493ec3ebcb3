//! Application state - shared across all handlers.

use std::sync::Arc;

use metalframe_core::ports::{MediaStore, PostRepository};
use metalframe_core::services::PostService;
use metalframe_infra::database::{InMemoryPostRepository, JsonFilePostRepository};
use metalframe_infra::media::LocalDiskMediaStore;

use crate::config::{AppConfig, MediaBackend, PostsBackend};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub max_image_bytes: usize,
}

impl AppState {
    pub fn with_service(posts: Arc<PostService>, max_image_bytes: usize) -> Self {
        Self {
            posts,
            max_image_bytes,
        }
    }

    /// Build the application state with the configured backends.
    pub async fn new(config: &AppConfig) -> Self {
        let repo = build_repository(&config.posts).await;
        let media = build_media(config);

        tracing::info!("Application state initialized");

        Self::with_service(
            Arc::new(PostService::new(repo, media)),
            config.max_image_bytes,
        )
    }
}

async fn build_repository(backend: &PostsBackend) -> Arc<dyn PostRepository> {
    match backend {
        PostsBackend::Memory => {
            tracing::warn!("Using in-memory posts store, data is lost on restart");
            Arc::new(InMemoryPostRepository::new())
        }
        PostsBackend::JsonFile(path) => {
            tracing::info!(file = %path.display(), "Using JSON file posts store");
            Arc::new(JsonFilePostRepository::new(path.clone()))
        }
        #[cfg(feature = "postgres")]
        PostsBackend::Postgres(db_config) => {
            use migration::{Migrator, MigratorTrait};
            use metalframe_infra::database::{PostgresPostRepository, connect};

            let db = match connect(db_config).await {
                Ok(db) => db,
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    return Arc::new(InMemoryPostRepository::new());
                }
            };
            if let Err(e) = Migrator::up(&db, None).await {
                tracing::error!("Failed to apply migrations: {}", e);
            }
            Arc::new(PostgresPostRepository::new(db))
        }
        #[cfg(not(feature = "postgres"))]
        PostsBackend::Postgres(_) => {
            tracing::warn!("Built without postgres feature - using in-memory posts store");
            Arc::new(InMemoryPostRepository::new())
        }
    }
}

fn build_media(config: &AppConfig) -> Arc<dyn MediaStore> {
    match &config.media {
        MediaBackend::LocalDisk(dir) => Arc::new(LocalDiskMediaStore::new(dir.clone())),
        #[cfg(feature = "cloudinary")]
        MediaBackend::Cloudinary => {
            use metalframe_infra::media::{CloudinaryConfig, CloudinaryMediaStore};

            match CloudinaryConfig::from_env() {
                Some(cloud) => Arc::new(CloudinaryMediaStore::new(cloud)),
                None => {
                    tracing::warn!("Cloudinary credentials incomplete. Storing images on disk.");
                    Arc::new(LocalDiskMediaStore::new(config.upload_dir.clone()))
                }
            }
        }
        #[cfg(not(feature = "cloudinary"))]
        MediaBackend::Cloudinary => {
            tracing::warn!("Built without cloudinary feature - storing images on disk");
            Arc::new(LocalDiskMediaStore::new(config.upload_dir.clone()))
        }
    }
}
