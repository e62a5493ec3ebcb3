use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::LocalizedText;

/// Opaque post identifier. Repositories assign it; it never changes afterwards.
///
/// Serialized as a string. Numeric ids (as emitted by older payloads) are
/// accepted on input and normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the id, when it has one.
    pub fn as_number(&self) -> Option<i64> {
        self.0.trim().parse().ok()
    }

    /// Next integer id after the largest numeric id in `ids`, as a string.
    /// Non-numeric ids are ignored. `None` once the largest id is `i64::MAX`.
    pub fn next_after<'a>(ids: impl IntoIterator<Item = &'a PostId>) -> Option<Self> {
        let max = ids
            .into_iter()
            .filter_map(PostId::as_number)
            .fold(0, i64::max);
        max.checked_add(1).map(|next| Self(next.to_string()))
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PostId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i32> for PostId {
    fn from(id: i32) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Self(text),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

/// Post entity - a gallery item with localized copy and an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub image_url: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }
}

/// A post that has not been assigned an id yet.
///
/// Also the element type of the bulk import payload, hence the lenient
/// decoding: a missing `createdAt` means "now".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl NewPost {
    pub fn new(title: LocalizedText, description: LocalizedText, image_url: String) -> Self {
        Self {
            title,
            description,
            image_url,
            created_at: None,
        }
    }

    /// Materialize with an id, stamping `created_at` if it was not given.
    pub fn into_post(self, id: PostId) -> Post {
        Post {
            id,
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            updated_at: None,
        }
    }
}

impl From<Post> for NewPost {
    fn from(post: Post) -> Self {
        Self {
            title: post.title,
            description: post.description,
            image_url: post.image_url,
            created_at: Some(post.created_at),
        }
    }
}

/// Field changes applied by update-by-id. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostChanges {
    pub title: Option<LocalizedText>,
    pub description: Option<LocalizedText>,
    pub image_url: Option<String>,
}

impl PostChanges {
    /// Apply to a stored post and stamp `updated_at`.
    pub fn apply_to(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(description) = self.description {
            post.description = description;
        }
        if let Some(image_url) = self.image_url {
            post.image_url = image_url;
        }
        post.updated_at = Some(Utc::now());
    }
}
