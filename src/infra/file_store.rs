//! Client for the external file-upload service.
//!
//! License documents are posted as multipart form data; the service answers
//! with JSON carrying a `path` that is stored on the doctor profile as an
//! opaque reference.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::config::FILE_STORE_FIELD_NAME;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Describes an uploaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub file_name: String,
    pub content_type: Option<String>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Upload `bytes` and return the reference to persist
    async fn upload(&self, bytes: Vec<u8>, metadata: FileMetadata) -> AppResult<String>;
}

#[derive(Debug, Deserialize)]
struct UploadReply {
    path: String,
}

/// HTTP implementation of [`FileStore`].
///
/// Without a configured URL every upload fails, so profiles can still be
/// submitted as long as they carry no file.
pub struct HttpFileStore {
    client: reqwest::Client,
    url: Option<String>,
}

impl HttpFileStore {
    pub fn new(url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl FileStore for HttpFileStore {
    async fn upload(&self, bytes: Vec<u8>, metadata: FileMetadata) -> AppResult<String> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| AppError::internal("FILE_STORE_URL is not configured"))?;

        let size = bytes.len();
        let mut part = Part::bytes(bytes).file_name(metadata.file_name.clone());
        if let Some(content_type) = metadata.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|e| AppError::validation(format!("Invalid content type: {}", e)))?;
        }
        let form = Form::new().part(FILE_STORE_FIELD_NAME, part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("File upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::internal(format!(
                "File store answered {}",
                response.status()
            )));
        }

        let reply: UploadReply = response
            .json()
            .await
            .map_err(|e| AppError::internal(format!("Unreadable file store reply: {}", e)))?;

        tracing::info!(file = %metadata.file_name, size, path = %reply.path, "License document uploaded");
        Ok(reply.path)
    }
}
