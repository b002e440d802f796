// ABOUTME: Run configuration for mdimg
// ABOUTME: Loads config.toml from the XDG config directory and supplies defaults

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_UPLOAD_URL: &str = "http://127.0.0.1:36677/upload";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Get the XDG config directory for mdimg
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join("mdimg");

    Ok(config_dir)
}

/// Path of the config file used when `--config` is not given
pub fn default_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.toml"))
}

/// Where image bytes come from before they are uploaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Targets are files relative to the referencing document
    Local,
    /// Targets are http(s) URLs downloaded to a temp file first
    Remote,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub upload_url: String,
    pub markdown_dir: PathBuf,
    /// Rewrite `![[name]]` embeds to `![note](name)` before collecting
    pub obs2md: bool,
    #[serde(alias = "localupload")]
    pub local_upload: bool,
    /// Request timeout; `None` waits forever
    pub timeout_secs: Option<u64>,
    /// Directory for downloaded images; the OS temp dir when unset
    pub temp_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            markdown_dir: PathBuf::from("./"),
            obs2md: true,
            local_upload: false,
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            temp_dir: None,
        }
    }
}

impl Config {
    /// Load config from the default location, or defaults if there is no file
    pub fn load() -> Result<Self> {
        Self::load_from(&default_config_path()?)
    }

    /// Load config from `path`, or defaults if the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).context("Failed to write config file")?;
        Ok(())
    }

    pub fn fetch_mode(&self) -> FetchMode {
        if self.local_upload {
            FetchMode::Local
        } else {
            FetchMode::Remote
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            Some(0) | None => None,
            Some(secs) => Some(Duration::from_secs(secs)),
        }
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
