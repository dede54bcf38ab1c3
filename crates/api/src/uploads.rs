//! Forwarding of validated images to the configured hosting endpoint.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};

use crate::config::ImageUploadConfig;

#[async_trait]
pub trait ImageHost: Send + Sync {
    fn is_enabled(&self) -> bool;

    /// Stores the image and returns its public URL.
    async fn upload(&self, content_type: String, bytes: Vec<u8>) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    upload_preset: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct UploadReply {
    secure_url: Option<String>,
    url: Option<String>,
}

/// Posts images as base64 data URIs to an unsigned upload endpoint.
#[derive(Debug, Clone)]
pub struct HttpImageHost {
    client: reqwest::Client,
    config: Option<ImageUploadConfig>,
}

impl HttpImageHost {
    pub fn new(config: Option<ImageUploadConfig>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

fn data_uri(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(bytes))
}

#[async_trait]
impl ImageHost for HttpImageHost {
    fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    async fn upload(&self, content_type: String, bytes: Vec<u8>) -> Result<String> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| eyre!("Image uploads are not configured"))?;

        let request = UploadRequest {
            file: data_uri(&content_type, &bytes),
            upload_preset: config.preset.as_deref(),
        };

        let response = self
            .client
            .post(&config.url)
            .json(&request)
            .send()
            .await
            .wrap_err("Failed to reach image host")?;

        let status = response.status();
        if !status.is_success() {
            return Err(eyre!("Image host responded with {}", status));
        }

        let reply: UploadReply = response
            .json()
            .await
            .wrap_err("Image host returned an unexpected body")?;

        reply
            .secure_url
            .or(reply.url)
            .ok_or_else(|| eyre!("Image host reply did not include a URL"))
    }
}
