//! Cloudinary media store - signed uploads and deletes over the upload API.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};

use metalframe_core::domain::ImageUpload;
use metalframe_core::ports::{MediaError, MediaStore};

/// Cloudinary account configuration.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Folder uploaded images are placed in.
    pub folder: String,
    /// Incoming transformation applied on upload.
    pub transformation: String,
    pub api_base: String,
}

impl CloudinaryConfig {
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            folder: "posts".to_string(),
            transformation: "c_limit,h_800,w_1200/q_auto".to_string(),
            api_base: "https://api.cloudinary.com/v1_1".to_string(),
        }
    }

    /// Load configuration from environment variables.
    /// Returns `None` unless all three credentials are set.
    pub fn from_env() -> Option<Self> {
        let cloud_name = std::env::var("CLOUDINARY_CLOUD_NAME").ok()?;
        let api_key = std::env::var("CLOUDINARY_API_KEY").ok()?;
        let api_secret = std::env::var("CLOUDINARY_API_SECRET").ok()?;
        Some(Self::new(cloud_name, api_key, api_secret))
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{}", self.api_base, self.cloud_name, action)
    }

    /// Request signature: sorted `key=value` pairs joined by `&`, then the secret, SHA-1 hex.
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut sorted = params.to_vec();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        let joined = sorted
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha1::new();
        hasher.update(joined.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorBody {
    error: CloudinaryErrorDetail,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorDetail {
    message: String,
}

/// Extract the Cloudinary public id from a delivery URL.
///
/// `https://res.cloudinary.com/demo/image/upload/v1234567890/posts/frame.jpg`
/// yields `posts/frame`. URLs from other hosts yield `None`.
pub fn public_id_from_url(url: &str) -> Option<String> {
    if !url.contains("cloudinary.com") {
        return None;
    }
    let (_, path) = url.split_once("/upload/")?;

    let joined = path
        .split('/')
        .filter(|segment| !is_version_segment(segment))
        .collect::<Vec<_>>()
        .join("/");

    let public_id = match joined.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !ext.contains('/') => stem.to_string(),
        _ => joined,
    };

    (!public_id.is_empty()).then_some(public_id)
}

fn is_version_segment(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
}

/// Cloudinary-backed media store.
pub struct CloudinaryMediaStore {
    config: CloudinaryConfig,
    client: reqwest::Client,
}

impl CloudinaryMediaStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        tracing::info!(cloud = %config.cloud_name, folder = %config.folder, "Using Cloudinary media store");
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<CloudinaryErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => format!("Cloudinary responded with {status}"),
        }
    }
}

#[async_trait]
impl MediaStore for CloudinaryMediaStore {
    async fn upload(&self, image: ImageUpload) -> Result<String, MediaError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.config.sign(&[
            ("folder", self.config.folder.as_str()),
            ("timestamp", timestamp.as_str()),
            ("transformation", self.config.transformation.as_str()),
        ]);

        let mime = image.mime_type();
        let file = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&mime)
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        let form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.config.folder.clone())
            .text("transformation", self.config.transformation.clone())
            .text("signature", signature);

        tracing::debug!("Uploading image to Cloudinary");
        let response = self
            .client
            .post(self.config.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MediaError::Upload(Self::error_message(response).await));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;
        tracing::info!(image_url = %body.secure_url, "Uploaded image to Cloudinary");
        Ok(body.secure_url)
    }

    async fn delete_by_url(&self, url: &str) -> Result<(), MediaError> {
        let Some(public_id) = public_id_from_url(url) else {
            tracing::debug!(image_url = %url, "Not a Cloudinary URL, nothing to delete");
            return Ok(());
        };

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self
            .config
            .sign(&[("public_id", public_id.as_str()), ("timestamp", timestamp.as_str())]);

        tracing::debug!(public_id = %public_id, "Deleting image from Cloudinary");
        let response = self
            .client
            .post(self.config.endpoint("destroy"))
            .form(&[
                ("public_id", public_id.as_str()),
                ("timestamp", timestamp.as_str()),
                ("api_key", self.config.api_key.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()
            .await
            .map_err(|e| MediaError::Delete(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MediaError::Delete(Self::error_message(response).await));
        }

        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Delete(e.to_string()))?;
        match body.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(MediaError::Delete(format!("unexpected result: {other}"))),
        }
    }
}
