//! Batch driver: URL list in, titles out, cache flushed.

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::cache::TitleCache;
use crate::config::TitlecacheConfig;
use crate::provider::{build_provider, ProviderKind};
use crate::service::{ResolveStats, TitleMap, TitleService};
use crate::url_model::load_urls;
use crate::ytdlp::CookieOptions;

/// Per-run options for `titles`; `None` fields fall back to config.
#[derive(Debug, Clone, Default)]
pub struct TitlesOptions {
    pub urls_file: PathBuf,
    pub force_download: bool,
    pub provider: Option<ProviderKind>,
    pub cache_path: Option<PathBuf>,
    pub cookiefile: Option<PathBuf>,
    pub no_browser_cookies: bool,
}

/// What a batch produced.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Number of URL lines read from the file.
    pub lines: usize,
    pub titles: TitleMap,
    pub stats: ResolveStats,
}

impl BatchOutcome {
    /// Resolved pairs sorted by URL.
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .titles
            .iter()
            .map(|(u, t)| (u.as_str(), t.as_str()))
            .collect();
        pairs.sort_unstable();
        pairs
    }
}

/// Resolve every URL in `opts.urls_file`.
///
/// The URL file is read before anything else, so a missing file never creates
/// a cache. An empty list returns an empty outcome without opening the cache.
pub async fn run_titles(cfg: &TitlecacheConfig, opts: &TitlesOptions) -> Result<BatchOutcome> {
    let urls = load_urls(&opts.urls_file)?;
    if urls.is_empty() {
        tracing::info!("no URLs found in {}", opts.urls_file.display());
        return Ok(BatchOutcome::default());
    }
    let lines = urls.len();

    let kind = opts.provider.unwrap_or(cfg.provider);
    let cookies = CookieOptions::from_config(cfg, opts.cookiefile.clone(), opts.no_browser_cookies);
    let service = TitleService::new(build_provider(kind, cfg, cookies))
        .with_force_download(opts.force_download);
    let cache_path = match &opts.cache_path {
        Some(p) => p.clone(),
        None => cfg.resolved_cache_path()?,
    };

    tracing::info!(
        provider = %kind,
        cache = %cache_path.display(),
        force_download = opts.force_download,
        "resolving titles for {} urls",
        lines
    );

    let resolution = TitleCache::scoped(&cache_path, move |cache| {
        Box::pin(async move {
            let resolution = service.resolve(cache, &urls).await?;
            Ok::<_, anyhow::Error>(resolution)
        })
    })
    .await?;

    let outcome = BatchOutcome {
        lines,
        titles: resolution.titles,
        stats: resolution.stats,
    };
    for (url, title) in outcome.sorted() {
        tracing::info!("URL: {}, title: {}", url, title);
    }
    let s = &outcome.stats;
    tracing::info!(
        "resolved {} of {} urls ({} cached, {} fetched, {} migrated, {} skipped, {} failed)",
        outcome.titles.len(),
        lines,
        s.cache_hits,
        s.fetched,
        s.migrated,
        s.skipped,
        s.failed
    );
    Ok(outcome)
}

/// All cache entries at `path`, sorted by URL.
pub async fn cache_entries(path: &Path) -> Result<BTreeMap<String, String>> {
    let entries = TitleCache::scoped(path, |cache| {
        Box::pin(async move { Ok::<_, anyhow::Error>(cache.entries().await?) })
    })
    .await?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TitleError;

    fn opts(dir: &Path, urls_file: PathBuf) -> TitlesOptions {
        TitlesOptions {
            urls_file,
            provider: Some(ProviderKind::Html),
            cache_path: Some(dir.join("state").join("titles.db")),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn missing_url_file_fails_before_cache_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let o = opts(dir.path(), dir.path().join("nope.txt"));

        let err = run_titles(&TitlecacheConfig::default(), &o).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<TitleError>(),
            Some(TitleError::UrlsFileNotFound { .. })
        ));
        assert!(!dir.path().join("state").exists());
    }

    #[tokio::test]
    async fn empty_url_file_is_zero_work() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("urls.txt");
        std::fs::write(&file, "\n# nothing yet\n   \n").unwrap();

        let out = run_titles(&TitlecacheConfig::default(), &opts(dir.path(), file))
            .await
            .unwrap();

        assert!(out.titles.is_empty());
        assert_eq!(out.lines, 0);
        assert!(!dir.path().join("state").exists());
    }

    #[tokio::test]
    async fn unusable_lines_still_open_and_flush_cache() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("urls.txt");
        std::fs::write(&file, "not a url\nftp://files.test/x\n").unwrap();
        let o = opts(dir.path(), file);

        let out = run_titles(&TitlecacheConfig::default(), &o).await.unwrap();

        assert!(out.titles.is_empty());
        assert_eq!(out.stats.skipped, 2);
        assert!(o.cache_path.as_ref().unwrap().exists());
        assert!(cache_entries(o.cache_path.as_ref().unwrap())
            .await
            .unwrap()
            .is_empty());
    }

    #[test]
    fn sorted_orders_by_url() {
        let mut out = BatchOutcome::default();
        out.titles.insert("https://b.test".into(), "B".into());
        out.titles.insert("https://a.test".into(), "A".into());
        assert_eq!(
            out.sorted(),
            vec![("https://a.test", "A"), ("https://b.test", "B")]
        );
    }
}
