// ABOUTME: End-to-end image rehosting over a directory of markdown notes
// ABOUTME: Collects references, uploads each one, then rewrites links from the finished map

use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::{Config, FetchMode};
use crate::document::{document_stem, find_documents, read_document, write_document};
use crate::error::ImageError;
use crate::fetch::{download_image, is_remote_url, resolve_path};
use crate::links::{basename, extract_image_targets, normalize_embeds, rewrite_links};
use crate::upload::UploadClient;

pub use crate::links::ConversionMap;

/// An image reference after resolution against its document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Local(PathBuf),
    Remote(String),
}

impl ImageSource {
    /// Key this image is recorded under in the conversion map
    pub fn key(&self) -> String {
        match self {
            ImageSource::Local(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            ImageSource::Remote(url) => basename(url).to_string(),
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Local(path) => write!(f, "{}", path.display()),
            ImageSource::Remote(url) => f.write_str(url),
        }
    }
}

#[derive(Debug)]
pub enum ImageOutcome {
    Uploaded { url: String },
    Failed { reason: ImageError },
}

impl ImageOutcome {
    pub fn is_uploaded(&self) -> bool {
        matches!(self, ImageOutcome::Uploaded { .. })
    }
}

/// What a full run did
#[derive(Debug, Default)]
pub struct RunReport {
    pub mapping: ConversionMap,
    pub outcomes: Vec<(ImageSource, ImageOutcome)>,
    pub documents_rewritten: usize,
}

impl RunReport {
    pub fn uploaded(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_uploaded()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.uploaded()
    }
}

/// Walk the markdown tree and collect every image reference, in document
/// order. When `obs2md` is set, embeds are normalized and written back first.
pub fn process_directory(config: &Config) -> Result<Vec<ImageSource>> {
    collect_references(config, true)
}

/// Same references `process_directory` would return, without touching any file
pub fn scan_directory(config: &Config) -> Result<Vec<ImageSource>> {
    collect_references(config, false)
}

fn collect_references(config: &Config, persist: bool) -> Result<Vec<ImageSource>> {
    let mode = config.fetch_mode();
    let mut sources = Vec::new();

    for doc_path in find_documents(&config.markdown_dir)? {
        let mut content = read_document(&doc_path)?;

        if config.obs2md {
            let normalized = normalize_embeds(&content, &document_stem(&doc_path));
            if normalized != content {
                if persist {
                    write_document(&doc_path, &normalized)?;
                }
                debug!(doc = %doc_path.display(), "normalized embeds");
            }
            content = normalized;
        }

        let base_dir = doc_path.parent().unwrap_or(Path::new("."));
        for target in extract_image_targets(&content) {
            sources.push(match mode {
                FetchMode::Local if is_remote_url(&target) => ImageSource::Remote(target),
                FetchMode::Local => ImageSource::Local(resolve_path(&target, base_dir)),
                FetchMode::Remote => ImageSource::Remote(target),
            });
        }
    }

    Ok(sources)
}

/// Fetch and upload one image. Never fails the run; failures come back as values.
pub async fn upload_source(
    client: &UploadClient,
    source: &ImageSource,
    mode: FetchMode,
    temp_dir: &Path,
) -> ImageOutcome {
    let result = match source {
        // URLs found while reading local files are reported, not downloaded
        ImageSource::Remote(url) if mode == FetchMode::Local => {
            Err(ImageError::NotLocal(url.clone()))
        }
        ImageSource::Local(path) => {
            if path.exists() {
                client.upload(path).await
            } else {
                Err(ImageError::MissingFile(path.clone()))
            }
        }
        ImageSource::Remote(url) => {
            match download_image(client.http_client(), url, temp_dir).await {
                // `download` drops at the end of this arm, removing the temp file
                Ok(download) => client.upload(download.path()).await,
                Err(e) => Err(e),
            }
        }
    };

    match result {
        Ok(url) => ImageOutcome::Uploaded { url },
        Err(reason) => ImageOutcome::Failed { reason },
    }
}

/// Upload every reference in order and build the conversion map.
/// The map is complete when this returns; nothing is rewritten here.
pub async fn upload_references(
    client: &UploadClient,
    sources: Vec<ImageSource>,
    mode: FetchMode,
    temp_dir: &Path,
) -> (ConversionMap, Vec<(ImageSource, ImageOutcome)>) {
    let mut mapping = ConversionMap::new();
    let mut outcomes = Vec::with_capacity(sources.len());

    for source in sources {
        let outcome = upload_source(client, &source, mode, temp_dir).await;
        match &outcome {
            ImageOutcome::Uploaded { url } => {
                info!(source = %source, url = %url, "image uploaded");
                let key = source.key();
                if key.is_empty() {
                    // An empty key would match every link with an empty or trailing-slash target
                    warn!(source = %source, "uploaded image has no file name, links left as-is");
                } else {
                    mapping.insert(key, url.clone());
                }
            }
            ImageOutcome::Failed { reason } => {
                warn!(source = %source, "skipping image: {}", reason);
            }
        }
        outcomes.push((source, outcome));
    }

    (mapping, outcomes)
}

/// Rewrite mapped image links in every document under `root`.
/// Returns how many documents changed.
pub fn update_markdown_files(root: &Path, mapping: &ConversionMap) -> Result<usize> {
    let mut changed = 0;

    for doc_path in find_documents(root)? {
        let content = read_document(&doc_path)?;
        let updated = rewrite_links(&content, mapping);
        if updated != content {
            write_document(&doc_path, &updated)?;
            debug!(doc = %doc_path.display(), "rewrote image links");
            changed += 1;
        }
    }

    Ok(changed)
}

/// Collect, upload, then rewrite
pub async fn run(config: &Config) -> Result<RunReport> {
    let client = UploadClient::new(config.upload_url.clone(), config.timeout())?;

    let sources = process_directory(config)?;
    info!(count = sources.len(), "collected image references");

    let (mapping, outcomes) =
        upload_references(&client, sources, config.fetch_mode(), &config.temp_dir()).await;

    let documents_rewritten = update_markdown_files(&config.markdown_dir, &mapping)?;

    Ok(RunReport {
        mapping,
        outcomes,
        documents_rewritten,
    })
}
