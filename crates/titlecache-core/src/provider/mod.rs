//! Title providers: turn a URL into a page/video title.
//!
//! The resolution service only depends on [`TitleProvider`] and does not know
//! whether titles come from yt-dlp metadata or from scraping HTML. The variant
//! is picked once, when the provider is built.

mod html;
mod ytdlp;

pub use html::{title_from_html, HtmlProvider};
pub use ytdlp::{title_from_metadata, YtDlpProvider};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::TitlecacheConfig;
use crate::ytdlp::CookieOptions;

/// A source of titles.
///
/// `fetch` never fails: network and tool errors are logged inside the
/// provider and reported as `None`. It may block; async callers run it on the
/// blocking pool.
pub trait TitleProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Title for `url`, or `None` if it could not be determined.
    fn fetch(&self, url: &str) -> Option<String>;
}

/// Which provider to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Structured metadata from `yt-dlp` (works for video sites).
    #[default]
    #[serde(rename = "yt-dlp")]
    YtDlp,
    /// `<title>` of the page's HTML.
    #[serde(rename = "html")]
    Html,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::YtDlp => "yt-dlp",
            ProviderKind::Html => "html",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yt-dlp" | "ytdlp" => Ok(ProviderKind::YtDlp),
            "html" | "beautifulsoup" => Ok(ProviderKind::Html),
            other => Err(format!("unknown title provider '{other}' (expected yt-dlp or html)")),
        }
    }
}

/// Build the provider for `kind` from configuration.
pub fn build_provider(
    kind: ProviderKind,
    cfg: &TitlecacheConfig,
    cookies: CookieOptions,
) -> Arc<dyn TitleProvider> {
    match kind {
        ProviderKind::YtDlp => Arc::new(YtDlpProvider::new(&cfg.ytdlp_path, cookies)),
        ProviderKind::Html => Arc::new(
            HtmlProvider::new(cfg.http_timeout()).with_retry_policy(cfg.retry_policy()),
        ),
    }
}
