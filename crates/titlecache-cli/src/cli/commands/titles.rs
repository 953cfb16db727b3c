//! `titlecache titles <urls_file>` – resolve and print titles.

use anyhow::Result;
use titlecache_core::batch::{self, TitlesOptions};
use titlecache_core::config::TitlecacheConfig;

pub async fn run_titles(cfg: &TitlecacheConfig, opts: &TitlesOptions) -> Result<()> {
    let outcome = batch::run_titles(cfg, opts).await?;
    if outcome.lines == 0 {
        println!("No URLs found in {}", opts.urls_file.display());
        return Ok(());
    }
    for (url, title) in outcome.sorted() {
        println!("{url}\t{title}");
    }
    let missing = outcome.stats.skipped + outcome.stats.failed;
    if missing > 0 {
        eprintln!("{missing} line(s) without a title; see the log for details.");
    }
    Ok(())
}
