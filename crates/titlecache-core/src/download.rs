//! Bulk download glue: hand each URL to `yt-dlp`.
//!
//! Runs in the calling thread and blocks on each `yt-dlp` process; call from
//! `spawn_blocking` when used from async code.

use anyhow::{Context, Result};
use std::fmt::Display;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Mutex;

use crate::url_model::extract_url;
use crate::ytdlp::{download_args, CookieOptions, DownloadMode};

/// Serializes lines written to the terminal.
///
/// `yt-dlp` inherits stdout/stderr, so our own banner lines go through this
/// lock to avoid interleaving with other writers in the process.
#[derive(Debug, Default)]
pub struct Console {
    lock: Mutex<()>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print one line to stdout.
    pub fn line(&self, msg: impl Display) {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        println!("{msg}");
    }

    /// Print one line to stderr.
    pub fn error_line(&self, msg: impl Display) {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        eprintln!("{msg}");
    }
}

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub ytdlp_path: String,
    pub output_dir: PathBuf,
    pub mode: DownloadMode,
    pub cookies: CookieOptions,
}

/// Per-batch download counts.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DownloadSummary {
    pub succeeded: usize,
    /// URLs whose `yt-dlp` run failed.
    pub failed: Vec<String>,
    /// Input lines without a URL.
    pub skipped: usize,
}

/// Download every URL in `lines`, one after the other.
///
/// A failing URL is reported and the batch moves on. Only failing to create
/// the output directory aborts.
pub fn run_downloads(
    lines: &[String],
    opts: &DownloadOptions,
    console: &Console,
) -> Result<DownloadSummary> {
    std::fs::create_dir_all(&opts.output_dir)
        .with_context(|| format!("create output directory {}", opts.output_dir.display()))?;

    let mut summary = DownloadSummary::default();
    let total = lines.len();
    for (idx, raw) in lines.iter().enumerate() {
        let Some(url) = extract_url(raw) else {
            tracing::warn!("no URL found in line, skipping: {}", raw);
            summary.skipped += 1;
            continue;
        };

        console.line(format_args!("=== Downloading {}/{}: {} ===", idx + 1, total, url));
        match download_one(&url, opts) {
            Ok(()) => {
                tracing::info!(url = %url, "download finished");
                summary.succeeded += 1;
            }
            Err(e) => {
                tracing::error!(url = %url, "download failed: {:#}", e);
                console.error_line(format_args!("Error downloading {}: {:#}", url, e));
                summary.failed.push(url);
            }
        }
    }

    tracing::info!(
        "downloads done: {} ok, {} failed, {} skipped",
        summary.succeeded,
        summary.failed.len(),
        summary.skipped
    );
    Ok(summary)
}

fn download_one(url: &str, opts: &DownloadOptions) -> Result<()> {
    let status = Command::new(&opts.ytdlp_path)
        .args(download_args(url, &opts.output_dir, opts.mode, &opts.cookies))
        .stdin(Stdio::null())
        .status()
        .with_context(|| format!("could not run {}", opts.ytdlp_path))?;
    check_status(&opts.ytdlp_path, status)
}

fn check_status(program: &str, status: ExitStatus) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        anyhow::bail!("{} exited with {}", program, status)
    }
}
