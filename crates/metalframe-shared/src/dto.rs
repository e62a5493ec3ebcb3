//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/import`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest<T> {
    #[serde(default = "Vec::new")]
    pub posts: Vec<T>,
}

/// Response of `POST /api/import`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub ok: bool,
    pub imported: usize,
}

impl ImportResponse {
    pub fn new(imported: usize) -> Self {
        Self { ok: true, imported }
    }
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Multipart field names of the create/update form.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const IMAGE: &str = "image";
}
