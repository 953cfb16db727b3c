//! Structured-metadata provider: ask `yt-dlp` for the video's metadata.

use serde::Deserialize;
use std::process::{Command, Stdio};

use super::TitleProvider;
use crate::retry::FetchError;
use crate::ytdlp::{metadata_args, CookieOptions};

/// The part of yt-dlp's info JSON we care about.
#[derive(Debug, Deserialize)]
struct InfoDict {
    #[serde(default)]
    title: Option<String>,
}

/// Runs `yt-dlp --skip-download --dump-single-json` and reads `title`.
#[derive(Debug, Clone)]
pub struct YtDlpProvider {
    program: String,
    cookies: CookieOptions,
}

impl YtDlpProvider {
    pub fn new(program: impl Into<String>, cookies: CookieOptions) -> Self {
        Self {
            program: program.into(),
            cookies,
        }
    }

    fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        let output = Command::new(&self.program)
            .args(metadata_args(url, &self.cookies))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| FetchError::Tool(format!("could not run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("");
            return Err(FetchError::Tool(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                reason.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        title_from_metadata(&stdout)?.ok_or(FetchError::MissingTitle)
    }
}

impl TitleProvider for YtDlpProvider {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    fn fetch(&self, url: &str) -> Option<String> {
        match self.fetch_once(url) {
            Ok(title) => Some(title),
            Err(FetchError::MissingTitle) => {
                tracing::warn!(url, "yt-dlp metadata has no title");
                None
            }
            Err(e) => {
                tracing::error!(url, "failed to get title via yt-dlp: {}", e);
                None
            }
        }
    }
}

/// Reads the `title` field from a yt-dlp info JSON document.
///
/// With `--dump-single-json` there is one document; if a tool prints several
/// lines anyway, the last non-empty line is used.
pub fn title_from_metadata(stdout: &str) -> Result<Option<String>, FetchError> {
    let doc = stdout
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("");
    let info: InfoDict = serde_json::from_str(doc).map_err(FetchError::Metadata)?;
    Ok(info.title)
}
