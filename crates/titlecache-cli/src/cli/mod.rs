//! CLI for titlecache.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use titlecache_core::batch::TitlesOptions;
use titlecache_core::config;
use titlecache_core::provider::ProviderKind;

use commands::{run_cache, run_download, run_titles};

/// Top-level CLI for titlecache.
#[derive(Debug, Parser)]
#[command(name = "titlecache")]
#[command(about = "Resolve URL titles through a persistent cache; bulk download with yt-dlp", long_about = None)]
pub struct Cli {
    /// Log at debug level.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Config file to use instead of ~/.config/titlecache/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Cookie switches for the yt-dlp collaborators.
#[derive(Debug, Clone, Default, Args)]
pub struct CookieArgs {
    /// Netscape cookies.txt for yt-dlp (overrides browser cookies).
    #[arg(long, value_name = "PATH")]
    pub cookiefile: Option<PathBuf>,

    /// Do not pass --cookies-from-browser to yt-dlp.
    #[arg(long)]
    pub no_browser_cookies: bool,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve a title for each URL in a file and print `url<TAB>title`.
    Titles {
        /// Text file with one URL per line (# starts a comment).
        urls_file: PathBuf,

        /// Ignore cached titles and fetch every URL again.
        #[arg(long)]
        force_download: bool,

        /// Title provider: yt-dlp or html (default from config).
        #[arg(long, value_name = "NAME")]
        provider: Option<ProviderKind>,

        /// Title cache database (default ~/.local/state/titlecache/titles.db).
        #[arg(long, value_name = "PATH")]
        cache: Option<PathBuf>,

        #[command(flatten)]
        cookies: CookieArgs,
    },

    /// Download every URL in a file with yt-dlp.
    Download {
        /// Text file with one URL per line (# starts a comment).
        urls_file: PathBuf,

        /// Where to save files (default ~/youtube-downloader-output/yt-dlp).
        output_dir: Option<PathBuf>,

        /// Audio only, as mp3.
        #[arg(long)]
        audio: bool,

        #[command(flatten)]
        cookies: CookieArgs,
    },

    /// Show the cached titles.
    Cache {
        /// Title cache database (default ~/.local/state/titlecache/titles.db).
        #[arg(long, value_name = "PATH")]
        cache: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let cfg = match &self.config {
            Some(path) => config::load_or_init_at(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match self.command {
            CliCommand::Titles {
                urls_file,
                force_download,
                provider,
                cache,
                cookies,
            } => {
                let opts = TitlesOptions {
                    urls_file,
                    force_download,
                    provider,
                    cache_path: cache,
                    cookiefile: cookies.cookiefile,
                    no_browser_cookies: cookies.no_browser_cookies,
                };
                run_titles(&cfg, &opts).await?;
            }
            CliCommand::Download {
                urls_file,
                output_dir,
                audio,
                cookies,
            } => run_download(&cfg, &urls_file, output_dir, audio, cookies).await?,
            CliCommand::Cache { cache } => run_cache(&cfg, cache).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
