use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::provider::ProviderKind;
use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per title fetch (including the first).
    pub max_attempts: u32,
    /// Base delay in milliseconds for exponential backoff.
    pub base_delay_ms: u64,
    /// Maximum backoff delay in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let p = RetryPolicy::default();
        Self {
            max_attempts: p.max_attempts,
            base_delay_ms: p.base_delay.as_millis() as u64,
            max_delay_ms: p.max_delay.as_millis() as u64,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(c: &RetryConfig) -> Self {
        RetryPolicy {
            max_attempts: c.max_attempts.max(1),
            base_delay: Duration::from_millis(c.base_delay_ms),
            max_delay: Duration::from_millis(c.max_delay_ms),
        }
    }
}

/// Global configuration loaded from `~/.config/titlecache/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitlecacheConfig {
    /// Title provider used by `titles` unless overridden on the command line.
    pub provider: ProviderKind,
    /// Timeout in seconds for the HTML title request.
    pub http_timeout_secs: u64,
    /// Path or name of the yt-dlp executable.
    pub ytdlp_path: String,
    /// Browser to read cookies from for yt-dlp (None = no browser cookies).
    #[serde(default)]
    pub cookies_from_browser: Option<String>,
    /// Netscape cookies.txt passed to yt-dlp. Takes precedence over browser cookies.
    #[serde(default)]
    pub cookiefile: Option<PathBuf>,
    /// Title cache database; defaults to the XDG state dir.
    #[serde(default)]
    pub cache_path: Option<PathBuf>,
    /// Download output directory; defaults to `~/youtube-downloader-output/yt-dlp`.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for TitlecacheConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            http_timeout_secs: 5,
            ytdlp_path: "yt-dlp".to_string(),
            cookies_from_browser: Some("chrome".to_string()),
            cookiefile: None,
            cache_path: None,
            output_dir: None,
            retry: None,
        }
    }
}

impl TitlecacheConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryPolicy::from)
            .unwrap_or_default()
    }

    /// Cache database path: configured value or `~/.local/state/titlecache/titles.db`.
    pub fn resolved_cache_path(&self) -> Result<PathBuf> {
        match &self.cache_path {
            Some(p) => Ok(p.clone()),
            None => Ok(crate::cache::default_cache_path()?),
        }
    }

    /// Download directory: configured value or `~/youtube-downloader-output/yt-dlp`.
    pub fn resolved_output_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.output_dir {
            return Ok(dir.clone());
        }
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow::anyhow!("HOME is not set; pass an output directory"))?;
        Ok(home.join("youtube-downloader-output").join("yt-dlp"))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("titlecache")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TitlecacheConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Like [`load_or_init`] for an explicit path (`--config`).
pub fn load_or_init_at(path: &Path) -> Result<TitlecacheConfig> {
    if !path.exists() {
        let default_cfg = TitlecacheConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: TitlecacheConfig = toml::from_str(&data)?;
    Ok(cfg)
}
