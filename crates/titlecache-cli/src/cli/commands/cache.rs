//! `titlecache cache` – list cached titles.

use anyhow::Result;
use std::path::PathBuf;
use titlecache_core::batch::cache_entries;
use titlecache_core::config::TitlecacheConfig;

pub async fn run_cache(cfg: &TitlecacheConfig, cache: Option<PathBuf>) -> Result<()> {
    let path = match cache {
        Some(p) => p,
        None => cfg.resolved_cache_path()?,
    };
    let entries = cache_entries(&path).await?;
    if entries.is_empty() {
        println!("No cached titles in {}.", path.display());
        return Ok(());
    }
    println!("{} cached titles in {}", entries.len(), path.display());
    for (url, title) in &entries {
        println!("{url}\t{title}");
    }
    Ok(())
}
