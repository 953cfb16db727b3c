//! `titlecache download <urls_file> [output_dir]` – bulk download via yt-dlp.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use titlecache_core::config::TitlecacheConfig;
use titlecache_core::download::{run_downloads, Console, DownloadOptions};
use titlecache_core::url_model::load_urls;
use titlecache_core::ytdlp::{CookieOptions, DownloadMode};

use crate::cli::CookieArgs;

pub async fn run_download(
    cfg: &TitlecacheConfig,
    urls_file: &Path,
    output_dir: Option<PathBuf>,
    audio: bool,
    cookies: CookieArgs,
) -> Result<()> {
    let lines = load_urls(urls_file)?;
    if lines.is_empty() {
        println!("No URLs found in {}", urls_file.display());
        return Ok(());
    }

    let output_dir = match output_dir {
        Some(dir) => dir,
        None => cfg.resolved_output_dir()?,
    };
    let opts = DownloadOptions {
        ytdlp_path: cfg.ytdlp_path.clone(),
        output_dir,
        mode: if audio {
            DownloadMode::Audio
        } else {
            DownloadMode::Video
        },
        cookies: CookieOptions::from_config(cfg, cookies.cookiefile, cookies.no_browser_cookies),
    };
    println!("Saving to {}", opts.output_dir.display());

    let total = lines.len();
    let summary = tokio::task::spawn_blocking(move || {
        let console = Console::new();
        run_downloads(&lines, &opts, &console)
    })
    .await
    .context("download worker panicked")??;

    println!(
        "Downloaded {} of {} URLs ({} failed, {} skipped).",
        summary.succeeded,
        total,
        summary.failed.len(),
        summary.skipped
    );
    for url in &summary.failed {
        println!("  failed: {url}");
    }
    Ok(())
}
