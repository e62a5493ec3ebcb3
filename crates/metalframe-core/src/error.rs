//! Domain-level error types.

use std::fmt;

use thiserror::Error;

use crate::ports::{ApiError, MediaError};

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Media store error: {0}")]
    Media(#[from] MediaError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Storage I/O failed: {0}")]
    Io(String),
}

/// Admin form fields that can carry an inline error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Image,
    Title,
    Description,
}

impl FormField {
    pub fn name(self) -> &'static str {
        match self {
            FormField::Image => "image",
            FormField::Title => "title",
            FormField::Description => "description",
        }
    }

    fn message(self) -> &'static str {
        match self {
            FormField::Image => "Please choose an image",
            FormField::Title => "Please enter a title",
            FormField::Description => "Please enter a description",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A required form field is missing. Reported next to `field`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: FormField,
    pub message: &'static str,
}

impl ValidationError {
    pub fn new(field: FormField) -> Self {
        Self {
            field,
            message: field.message(),
        }
    }
}

pub const SUBMIT_FAILED: &str = "Failed to submit. Ensure the server is running.";
pub const DELETE_FAILED: &str = "Failed to delete.";
pub const IMPORT_FAILED: &str = "Failed to import local posts.";
pub const NOT_FOUND_LOCALLY: &str = "Post not found locally";
pub const IDS_EXHAUSTED: &str = "No post ids left";

/// Failures of the posts synchronization layer, as shown to the user.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Missing field; nothing was mutated.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The target id is unknown to the authoritative store.
    #[error("{0}")]
    NotFound(String),

    /// The backend could not be reached.
    #[error("{0}")]
    Transport(String),

    /// The backend answered but rejected the operation.
    #[error("{0}")]
    Backend(String),

    /// The local cache could not be written.
    #[error("Local storage error: {0}")]
    Storage(String),
}

impl SyncError {
    /// Map an API failure, falling back to `generic` when the backend gave no text.
    pub(crate) fn from_api(err: ApiError, generic: &str) -> Self {
        match err {
            ApiError::Transport(detail) => {
                tracing::warn!(error = %detail, "API unreachable");
                SyncError::Transport(generic.to_string())
            }
            ApiError::Rejected { status, message } => {
                let message = message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| generic.to_string());
                if status == 404 {
                    SyncError::NotFound(message)
                } else {
                    SyncError::Backend(message)
                }
            }
        }
    }

    /// Message for the status line of the admin surface.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
