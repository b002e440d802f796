// ABOUTME: Failure reasons for a single image reference
// ABOUTME: Fetch and upload return these as values; the run loop never propagates them

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("file does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("not a local file: {0}")]
    NotLocal(String),

    #[error("download failed: {0}")]
    Download(#[source] reqwest::Error),

    #[error("download failed: HTTP {0}")]
    DownloadStatus(reqwest::StatusCode),

    #[error("upload failed: {0}")]
    Upload(#[source] reqwest::Error),

    #[error("upload failed: HTTP {0}")]
    UploadStatus(reqwest::StatusCode),

    #[error("upload endpoint returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error("upload endpoint returned no url")]
    EmptyResult,

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ImageError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
