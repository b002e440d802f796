// ABOUTME: HTTP client for the image hosting endpoint
// ABOUTME: Posts files as multipart form data and reads the hosted URL from the JSON reply

use anyhow::{Context, Result};
use reqwest::{multipart, Client as HttpClient};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::ImageError;

/// Reply from the upload endpoint, e.g. `{"success": true, "result": ["https://..."]}`
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub result: Vec<String>,
    /// Only a literal `false` counts as failure
    #[serde(default)]
    pub success: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl UploadResponse {
    /// First hosted URL, or why there is none
    pub fn into_url(self) -> Result<String, ImageError> {
        if self.success == Some(serde_json::Value::Bool(false)) {
            return Err(ImageError::InvalidResponse(
                self.message
                    .unwrap_or_else(|| "endpoint reported failure".to_string()),
            ));
        }

        self.result
            .into_iter()
            .next()
            .filter(|url| !url.is_empty())
            .ok_or(ImageError::EmptyResult)
    }
}

pub struct UploadClient {
    http_client: HttpClient,
    endpoint: String,
}

impl UploadClient {
    pub fn new(endpoint: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    /// Shared connection pool, also used for downloads
    pub fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Upload a local image and return its hosted URL
    pub async fn upload(&self, file_path: &Path) -> Result<String, ImageError> {
        if !file_path.exists() {
            return Err(ImageError::MissingFile(file_path.to_path_buf()));
        }

        let filename = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        let mime_type = mime_guess::from_path(file_path).first_or_octet_stream();

        let file_bytes = tokio::fs::read(file_path)
            .await
            .map_err(|e| ImageError::io(format!("cannot read {}", file_path.display()), e))?;

        let part = multipart::Part::bytes(file_bytes)
            .file_name(filename)
            .mime_str(mime_type.as_ref())
            .map_err(ImageError::Upload)?;

        let form = multipart::Form::new().part("file", part);

        let response = self
            .http_client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(ImageError::Upload)?;

        if !response.status().is_success() {
            return Err(ImageError::UploadStatus(response.status()));
        }

        let body = response.text().await.map_err(ImageError::Upload)?;
        let reply: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| ImageError::InvalidResponse(e.to_string()))?;

        reply.into_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> UploadResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_first_result_is_the_url() {
        let reply = parse(r#"{"success": true, "result": ["http://cdn/a.png", "http://cdn/b.png"]}"#);
        assert_eq!(reply.into_url().unwrap(), "http://cdn/a.png");
    }

    #[test]
    fn test_non_boolean_success_is_ignored() {
        let reply = parse(r#"{"success": "true", "result": ["http://cdn/a.png"]}"#);
        assert_eq!(reply.into_url().unwrap(), "http://cdn/a.png");

        let reply = parse(r#"{"success": 1, "result": ["http://cdn/b.png"]}"#);
        assert_eq!(reply.into_url().unwrap(), "http://cdn/b.png");
    }

    #[test]
    fn test_missing_result_is_empty() {
        let reply = parse(r#"{"status": "ok"}"#);
        assert!(matches!(reply.into_url(), Err(ImageError::EmptyResult)));
    }

    #[test]
    fn test_empty_result_list() {
        let reply = parse(r#"{"result": []}"#);
        assert!(matches!(reply.into_url(), Err(ImageError::EmptyResult)));
    }

    #[test]
    fn test_reported_failure_carries_message() {
        let reply = parse(r#"{"success": false, "message": "no uploader configured"}"#);
        match reply.into_url() {
            Err(ImageError::InvalidResponse(msg)) => assert_eq!(msg, "no uploader configured"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
