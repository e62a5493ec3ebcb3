//! Response bodies shared by the server and its clients.

use serde::{Deserialize, Serialize};

/// `{ "ok": true }` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Error body of every failing API call: `{ "error": "..." }`.
///
/// Clients show `error` to the user verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new("Not found")
    }

    pub fn internal_error() -> Self {
        Self::new("Internal Server Error")
    }
}
