//! HTTP client for the posts API.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::de::DeserializeOwned;

use metalframe_core::domain::{LocalizedText, Post, PostId};
use metalframe_core::ports::{ApiError, PostPayload, PostsApi};
use metalframe_shared::ErrorResponse;
use metalframe_shared::dto::{ImportRequest, ImportResponse, fields};

/// [`PostsApi`] over HTTP against a MetalFrame server.
///
/// Requests carry no timeout; a hung server hangs the call.
pub struct HttpPostsApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPostsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn form(payload: PostPayload) -> Result<Form, ApiError> {
        let mut form = Form::new()
            .text(fields::TITLE, form_value(&payload.title))
            .text(fields::DESCRIPTION, form_value(&payload.description));

        if let Some(image) = payload.image {
            let mime = image.mime_type();
            let part = Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&mime)
                .map_err(transport)?;
            form = form.part(fields::IMAGE, part);
        }
        Ok(form)
    }

    /// Turn a non-2xx response into `Rejected`, keeping the `{error}` text.
    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .map(|body| body.error);
        tracing::debug!(status = status.as_u16(), ?message, "Posts API rejected request");
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        Self::check(response).await?.json().await.map_err(transport)
    }
}

/// Localized values travel as a JSON object string; plain text as is.
fn form_value(text: &LocalizedText) -> String {
    match text {
        LocalizedText::Plain(s) => s.clone(),
        LocalizedText::Localized(_) => text.to_json_value().to_string(),
    }
}

fn transport(e: reqwest::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

#[async_trait]
impl PostsApi for HttpPostsApi {
    async fn list(&self) -> Result<Vec<Post>, ApiError> {
        let response = self
            .client
            .get(self.url("/posts"))
            .send()
            .await
            .map_err(transport)?;
        Self::decode(response).await
    }

    async fn create(&self, payload: PostPayload) -> Result<Post, ApiError> {
        let response = self
            .client
            .post(self.url("/posts"))
            .multipart(Self::form(payload)?)
            .send()
            .await
            .map_err(transport)?;
        Self::decode(response).await
    }

    async fn update(&self, id: &PostId, payload: PostPayload) -> Result<Post, ApiError> {
        let response = self
            .client
            .put(self.url(&format!("/posts/{id}")))
            .multipart(Self::form(payload)?)
            .send()
            .await
            .map_err(transport)?;
        Self::decode(response).await
    }

    async fn delete(&self, id: &PostId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/posts/{id}")))
            .send()
            .await
            .map_err(transport)?;
        Self::check(response).await?;
        Ok(())
    }

    async fn import(&self, posts: Vec<Post>) -> Result<usize, ApiError> {
        let response = self
            .client
            .post(self.url("/import"))
            .json(&ImportRequest { posts })
            .send()
            .await
            .map_err(transport)?;
        let body: ImportResponse = Self::decode(response).await?;
        Ok(body.imported)
    }
}
