// ABOUTME: Resolves image references to bytes on local disk
// ABOUTME: Normalizes local paths and downloads remote images into owned temp files

use reqwest::Client as HttpClient;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;
use url::Url;

use crate::error::ImageError;
use crate::links::basename;

/// Check if a reference is an http(s) URL
pub fn is_remote_url(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}

/// Resolve an image target against the directory of the document that
/// references it, producing an absolute path with `.` and `..` removed.
pub fn resolve_path(target: &str, base_dir: &Path) -> PathBuf {
    let joined = if let Some(rest) = target.strip_prefix("~/") {
        match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => base_dir.join(target),
        }
    } else {
        // Absolute targets replace base_dir entirely
        base_dir.join(target)
    };

    let absolute = if joined.is_absolute() {
        joined
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&joined))
            .unwrap_or(joined)
    };

    normalize(&absolute)
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// A downloaded image. The file is deleted when this value is dropped.
#[derive(Debug)]
pub struct TempDownload {
    path: PathBuf,
}

impl TempDownload {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDownload {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed temp download"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => debug!(path = %self.path.display(), error = %e, "could not remove temp download"),
        }
    }
}

/// File name a download of `image_url` is stored under
pub fn temp_file_name(image_url: &str) -> String {
    let from_url = Url::parse(image_url).ok().and_then(|url| {
        url.path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_string))
    });

    let name = from_url.unwrap_or_else(|| basename(image_url).to_string());
    if name.is_empty() {
        "download".to_string()
    } else {
        name
    }
}

/// Download a remote image into `temp_dir`, streaming the body to disk
pub async fn download_image(
    client: &HttpClient,
    image_url: &str,
    temp_dir: &Path,
) -> Result<TempDownload, ImageError> {
    let mut response = client
        .get(image_url)
        .send()
        .await
        .map_err(ImageError::Download)?;

    if !response.status().is_success() {
        return Err(ImageError::DownloadStatus(response.status()));
    }

    let path = temp_dir.join(temp_file_name(image_url));
    let mut file = tokio::fs::File::create(&path)
        .await
        .map_err(|e| ImageError::io(format!("cannot create {}", path.display()), e))?;

    // From here on the guard cleans up a partial file on any early return
    let download = TempDownload { path };

    while let Some(chunk) = response.chunk().await.map_err(ImageError::Download)? {
        file.write_all(&chunk)
            .await
            .map_err(|e| ImageError::io(format!("cannot write {}", download.path.display()), e))?;
    }
    file.flush()
        .await
        .map_err(|e| ImageError::io(format!("cannot write {}", download.path.display()), e))?;

    debug!(url = image_url, path = %download.path.display(), "downloaded image");
    Ok(download)
}
