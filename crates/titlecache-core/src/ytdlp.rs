//! Argument building for the external `yt-dlp` tool.
//!
//! Both the metadata provider and the download glue run `yt-dlp`; this module
//! owns the flags so the two stay consistent about cookies.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::TitlecacheConfig;

/// Where yt-dlp should take cookies from. An explicit file wins over a browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieOptions {
    pub cookiefile: Option<PathBuf>,
    pub browser: Option<String>,
}

impl CookieOptions {
    /// Cookie settings from config, with the command-line switches applied.
    pub fn from_config(
        cfg: &TitlecacheConfig,
        cookiefile: Option<PathBuf>,
        no_browser_cookies: bool,
    ) -> Self {
        Self {
            cookiefile: cookiefile.or_else(|| cfg.cookiefile.clone()),
            browser: if no_browser_cookies {
                None
            } else {
                cfg.cookies_from_browser.clone()
            },
        }
    }

    fn push_args(&self, args: &mut Vec<OsString>) {
        if let Some(file) = &self.cookiefile {
            args.push("--cookies".into());
            args.push(file.into());
        } else if let Some(browser) = &self.browser {
            args.push("--cookies-from-browser".into());
            args.push(browser.into());
        }
    }
}

/// What to fetch when downloading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadMode {
    /// Best mp4 video + m4a audio, re-encoded to mp4/H.264.
    #[default]
    Video,
    /// Best audio only, converted to 192 kbps mp3.
    Audio,
}

/// Flags for metadata-only extraction: nothing is downloaded, one JSON document on stdout.
pub fn metadata_args(url: &str, cookies: &CookieOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--skip-download".into(),
        "--dump-single-json".into(),
        "--no-warnings".into(),
        "--ignore-no-formats-error".into(),
        "--no-playlist".into(),
    ];
    cookies.push_args(&mut args);
    args.push("--".into());
    args.push(url.into());
    args
}

/// Flags for downloading `url` (playlists expanded) into `output_dir`.
pub fn download_args(
    url: &str,
    output_dir: &Path,
    mode: DownloadMode,
    cookies: &CookieOptions,
) -> Vec<OsString> {
    let template = output_dir.join("%(playlist_title)s").join("%(title)s.%(ext)s");
    let mut args: Vec<OsString> = vec![
        "--output".into(),
        template.into(),
        "--ignore-errors".into(),
        "--yes-playlist".into(),
        "--continue".into(),
        "--no-overwrites".into(),
        "--retries".into(),
        "10".into(),
        "--concurrent-fragments".into(),
        "5".into(),
    ];
    match mode {
        DownloadMode::Video => {
            args.extend([
                "--format".into(),
                "bestvideo[ext=mp4]+bestaudio[ext=m4a]/mp4".into(),
                "--merge-output-format".into(),
                "mp4".into(),
                "--recode-video".into(),
                "mp4".into(),
            ]);
        }
        DownloadMode::Audio => {
            args.extend([
                "--format".into(),
                "bestaudio/best".into(),
                "--extract-audio".into(),
                "--audio-format".into(),
                "mp3".into(),
                "--audio-quality".into(),
                "192K".into(),
            ]);
        }
    }
    cookies.push_args(&mut args);
    args.push("--".into());
    args.push(url.into());
    args
}
