//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use metalframe_infra::database::DatabaseConfig;

/// Default upload limit per image.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Where posts are stored.
#[derive(Debug, Clone)]
pub enum PostsBackend {
    Postgres(DatabaseConfig),
    JsonFile(PathBuf),
    Memory,
}

/// Where uploaded images are stored.
#[derive(Debug, Clone)]
pub enum MediaBackend {
    Cloudinary,
    LocalDisk(PathBuf),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub posts: PostsBackend,
    pub media: MediaBackend,
    pub upload_dir: PathBuf,
    pub max_image_bytes: usize,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL").ok().filter(|u| !u.is_empty());
        let posts_file = env::var("POSTS_FILE").unwrap_or_else(|_| "data/posts.json".to_string());

        let posts = match (
            env::var("POSTS_BACKEND").ok().map(|b| b.to_lowercase()).as_deref(),
            database_url,
        ) {
            (Some("memory"), _) => PostsBackend::Memory,
            (Some("json"), _) | (None, None) => PostsBackend::JsonFile(posts_file.into()),
            (_, Some(url)) => PostsBackend::Postgres(DatabaseConfig {
                url,
                max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(10),
                min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(1),
            }),
            (Some(other), None) => {
                tracing::warn!(backend = other, "POSTS_BACKEND needs DATABASE_URL, using JSON file");
                PostsBackend::JsonFile(posts_file.into())
            }
        };

        let upload_dir: PathBuf = env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "uploads".to_string())
            .into();
        let has_cloud = env::var("CLOUDINARY_CLOUD_NAME").is_ok_and(|n| !n.is_empty());
        let media = match env::var("MEDIA_BACKEND").ok().map(|b| b.to_lowercase()).as_deref() {
            Some("local") => MediaBackend::LocalDisk(upload_dir.clone()),
            Some("cloudinary") => MediaBackend::Cloudinary,
            _ if has_cloud => MediaBackend::Cloudinary,
            _ => MediaBackend::LocalDisk(upload_dir.clone()),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(3000),
            posts,
            media,
            upload_dir,
            max_image_bytes: parse_var("MAX_IMAGE_BYTES").unwrap_or(DEFAULT_MAX_IMAGE_BYTES),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
