//! Title resolution: cache first, provider on miss, normalize everything.
//!
//! For each input line the service extracts a URL, consults the cache, calls
//! the provider on a miss (or always, with force-download), normalizes the
//! title and writes it back. Cached values are normalized on read as well, and
//! rewritten when that changes them, so entries stored by older versions heal
//! themselves. Per-URL failures are logged and leave the URL out of the
//! result; only cache storage errors stop the batch.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::TitleCache;
use crate::error::Result;
use crate::normalize::normalize_fetched;
use crate::provider::TitleProvider;
use crate::url_model::extract_url;

/// URL → title for every URL that resolved.
pub type TitleMap = HashMap<String, String>;

/// Counters for one batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolveStats {
    /// Titles served from the cache.
    pub cache_hits: usize,
    /// Titles obtained from the provider.
    pub fetched: usize,
    /// Cache hits whose stored value had to be rewritten in normalized form.
    pub migrated: usize,
    /// Input lines with no usable URL.
    pub skipped: usize,
    /// URLs the provider returned nothing for.
    pub failed: usize,
}

/// Result of resolving a batch.
#[derive(Debug, Default, Clone)]
pub struct Resolution {
    pub titles: TitleMap,
    pub stats: ResolveStats,
}

/// Resolves URLs to titles through a cache and a provider.
pub struct TitleService {
    provider: Arc<dyn TitleProvider>,
    force_download: bool,
}

impl TitleService {
    pub fn new(provider: Arc<dyn TitleProvider>) -> Self {
        Self {
            provider,
            force_download: false,
        }
    }

    /// Ignore cached titles for this service's batches. Entries are not
    /// deleted; fresh results overwrite them.
    pub fn with_force_download(mut self, force_download: bool) -> Self {
        self.force_download = force_download;
        self
    }

    pub fn force_download(&self) -> bool {
        self.force_download
    }

    /// Resolve every line of `urls` in order and save the cache once at the end.
    pub async fn resolve(&self, cache: &mut TitleCache, urls: &[String]) -> Result<Resolution> {
        let mut out = Resolution::default();
        let total = urls.len();

        for (idx, raw) in urls.iter().enumerate() {
            tracing::info!("[{} / {}] Fetching title for url: {}", idx + 1, total, raw);
            if let Some((url, title)) = self.resolve_line(cache, raw, &mut out.stats).await? {
                out.titles.insert(url, title);
            }
        }

        cache.save().await?;
        Ok(out)
    }

    /// Resolve one raw input line. `Ok(None)` means the line produced no title.
    async fn resolve_line(
        &self,
        cache: &mut TitleCache,
        raw: &str,
        stats: &mut ResolveStats,
    ) -> Result<Option<(String, String)>> {
        let Some(url) = extract_url(raw) else {
            tracing::warn!("no URL found in line, skipping: {}", raw);
            stats.skipped += 1;
            return Ok(None);
        };

        let cached = if self.force_download {
            None
        } else {
            cache.get(&url).await?
        };

        // A blank stored title is no title: fetch again.
        let hit = cached.and_then(|stored| match normalize_fetched(&stored) {
            Some(normalized) => Some((stored, normalized)),
            None => {
                tracing::debug!(url = %url, "cached title is blank, fetching again");
                None
            }
        });

        let title = match hit {
            Some((stored, normalized)) => {
                stats.cache_hits += 1;
                if normalized != stored {
                    tracing::debug!(url = %url, "rewriting cached title in normalized form");
                    cache.put(&url, &normalized);
                    stats.migrated += 1;
                }
                Some(normalized)
            }
            None => match self.fetch(&url).await.as_deref().and_then(normalize_fetched) {
                Some(fresh) => {
                    cache.put(&url, &fresh);
                    stats.fetched += 1;
                    Some(fresh)
                }
                None => {
                    stats.failed += 1;
                    None
                }
            },
        };

        Ok(title.map(|t| (url, t)))
    }

    /// Call the provider on the blocking pool. A panicking provider counts as no title.
    async fn fetch(&self, url: &str) -> Option<String> {
        let provider = Arc::clone(&self.provider);
        let owned = url.to_string();
        match tokio::task::spawn_blocking(move || provider.fetch(&owned)).await {
            Ok(title) => title,
            Err(e) => {
                tracing::error!(
                    url,
                    "title provider {} failed unexpectedly: {}",
                    self.provider.name(),
                    e
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TitleCache;
    use crate::normalize::normalize_title;
    use std::sync::Mutex;

    /// Provider answering from a fixed table and recording every call.
    #[derive(Default)]
    struct StubProvider {
        titles: HashMap<String, String>,
        calls: Mutex<Vec<String>>,
    }

    impl StubProvider {
        fn with(entries: &[(&str, &str)]) -> Arc<Self> {
            Arc::new(Self {
                titles: entries
                    .iter()
                    .map(|(u, t)| (u.to_string(), t.to_string()))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl TitleProvider for StubProvider {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn fetch(&self, url: &str) -> Option<String> {
            self.calls.lock().unwrap().push(url.to_string());
            self.titles.get(url).cloned()
        }
    }

    struct PanickingProvider;

    impl TitleProvider for PanickingProvider {
        fn name(&self) -> &'static str {
            "panics"
        }

        fn fetch(&self, _url: &str) -> Option<String> {
            panic!("provider blew up");
        }
    }

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    async fn memory_cache() -> TitleCache {
        crate::cache::open_memory().await.unwrap()
    }

    #[tokio::test]
    async fn miss_fetches_normalizes_and_caches() {
        let provider = StubProvider::with(&[("https://a.test/x", "Fresh\n\tTitle  Here")]);
        let service = TitleService::new(provider.clone());
        let mut cache = memory_cache().await;

        let r = service
            .resolve(&mut cache, &lines(&["https://a.test/x"]))
            .await
            .unwrap();

        assert_eq!(r.titles["https://a.test/x"], "Fresh Title Here");
        assert_eq!(
            cache.get("https://a.test/x").await.unwrap().as_deref(),
            Some("Fresh Title Here")
        );
        assert_eq!(cache.unsaved(), 0, "resolve saves the cache");
        assert_eq!(r.stats.fetched, 1);
        assert_eq!(provider.calls(), vec!["https://a.test/x"]);
    }

    #[tokio::test]
    async fn cache_hit_never_calls_provider() {
        let provider = StubProvider::with(&[("https://a.test/x", "From provider")]);
        let service = TitleService::new(provider.clone());
        let mut cache = memory_cache().await;
        cache.put("https://a.test/x", "From cache");
        cache.save().await.unwrap();

        let r = service
            .resolve(&mut cache, &lines(&["https://a.test/x"]))
            .await
            .unwrap();

        assert_eq!(r.titles["https://a.test/x"], "From cache");
        assert!(provider.calls().is_empty());
        assert_eq!(r.stats.cache_hits, 1);
    }

    #[tokio::test]
    async fn force_download_refetches_and_overwrites() {
        let provider = StubProvider::with(&[("https://a.test/x", "New  title")]);
        let service = TitleService::new(provider.clone()).with_force_download(true);
        let mut cache = memory_cache().await;
        cache.put("https://a.test/x", "Old title");
        cache.save().await.unwrap();

        let r = service
            .resolve(&mut cache, &lines(&["https://a.test/x"]))
            .await
            .unwrap();

        assert_eq!(provider.calls().len(), 1);
        assert_eq!(r.titles["https://a.test/x"], "New title");
        assert_eq!(
            cache.get("https://a.test/x").await.unwrap().as_deref(),
            Some("New title")
        );
    }

    #[tokio::test]
    async fn force_download_failure_keeps_old_entry() {
        let provider = StubProvider::with(&[]);
        let service = TitleService::new(provider.clone()).with_force_download(true);
        let mut cache = memory_cache().await;
        cache.put("https://a.test/x", "Old title");
        cache.save().await.unwrap();

        let r = service
            .resolve(&mut cache, &lines(&["https://a.test/x"]))
            .await
            .unwrap();

        assert!(r.titles.is_empty());
        assert_eq!(
            cache.get("https://a.test/x").await.unwrap().as_deref(),
            Some("Old title")
        );
    }

    #[tokio::test]
    async fn stale_cache_entry_is_migrated() {
        let provider = StubProvider::with(&[]);
        let service = TitleService::new(provider.clone());
        let mut cache = memory_cache().await;
        cache.put("https://b.test", "Bad   Title\nLine");
        cache.save().await.unwrap();

        let r = service
            .resolve(&mut cache, &lines(&["https://b.test"]))
            .await
            .unwrap();

        assert_eq!(r.titles.len(), 1);
        assert_eq!(r.titles["https://b.test"], "Bad Title Line");
        assert_eq!(
            cache.get("https://b.test").await.unwrap().as_deref(),
            Some("Bad Title Line")
        );
        assert_eq!(r.stats.migrated, 1);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn repeated_url_second_is_cache_hit() {
        let provider = StubProvider::with(&[("https://a.test/x", "X")]);
        let service = TitleService::new(provider.clone());
        let mut cache = memory_cache().await;
        let input = crate::url_model::parse_url_lines("https://a.test/x\n\n# comment\nhttps://a.test/x\n");

        let r = service.resolve(&mut cache, &input).await.unwrap();

        assert_eq!(r.titles.len(), 1);
        assert_eq!(provider.calls().len(), 1);
        assert_eq!(r.stats.fetched, 1);
        assert_eq!(r.stats.cache_hits, 1);
    }

    #[tokio::test]
    async fn provider_miss_is_omitted_and_batch_continues() {
        let provider = StubProvider::with(&[("https://a.test/ok", "Ok")]);
        let service = TitleService::new(provider.clone());
        let mut cache = memory_cache().await;

        let r = service
            .resolve(
                &mut cache,
                &lines(&["https://a.test/missing", "garbage line", "https://a.test/ok"]),
            )
            .await
            .unwrap();

        assert_eq!(r.titles.len(), 1);
        assert_eq!(r.titles["https://a.test/ok"], "Ok");
        assert!(!r.titles.contains_key("https://a.test/missing"));
        assert_eq!(r.stats.failed, 1);
        assert_eq!(r.stats.skipped, 1);
        assert_eq!(provider.calls(), vec!["https://a.test/missing", "https://a.test/ok"]);
        assert!(cache.get("https://a.test/missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn extracted_url_is_the_key() {
        let provider = StubProvider::with(&[("https://a.test/x", "X")]);
        let service = TitleService::new(provider.clone());
        let mut cache = memory_cache().await;

        let r = service
            .resolve(&mut cache, &lines(&["- <https://a.test/x>, watch later"]))
            .await
            .unwrap();

        assert_eq!(r.titles.keys().collect::<Vec<_>>(), vec!["https://a.test/x"]);
        assert!(cache.contains("https://a.test/x").await.unwrap());
    }

    #[tokio::test]
    async fn blank_provider_title_is_absent() {
        let provider = StubProvider::with(&[("https://a.test/x", " \n ")]);
        let service = TitleService::new(provider.clone());
        let mut cache = memory_cache().await;

        let r = service
            .resolve(&mut cache, &lines(&["https://a.test/x"]))
            .await
            .unwrap();

        assert!(r.titles.is_empty());
        assert!(cache.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn read_path_roundtrip_equals_normalized() {
        let provider = StubProvider::with(&[]);
        let service = TitleService::new(provider);
        let mut cache = memory_cache().await;
        let raw = "Tabs\tand  spaces\r\n";
        cache.put("https://c.test/1", raw);

        service
            .resolve(&mut cache, &lines(&["https://c.test/1"]))
            .await
            .unwrap();

        assert_eq!(
            cache.get("https://c.test/1").await.unwrap(),
            Some(normalize_title(raw))
        );
    }

    #[tokio::test]
    async fn panicking_provider_counts_as_failure() {
        let service = TitleService::new(Arc::new(PanickingProvider));
        let mut cache = memory_cache().await;

        let r = service
            .resolve(&mut cache, &lines(&["https://a.test/x", "https://a.test/y"]))
            .await
            .unwrap();

        assert!(r.titles.is_empty());
        assert_eq!(r.stats.failed, 2);
    }

    #[tokio::test]
    async fn blank_cached_title_is_fetched_again() {
        let provider = StubProvider::with(&[
            ("https://e.test", "Fresh"),
            ("https://w.test", "Fresh"),
        ]);
        let service = TitleService::new(provider.clone());
        let mut cache = memory_cache().await;
        cache.put("https://e.test", "");
        cache.put("https://w.test", "   ");
        cache.save().await.unwrap();

        let r = service
            .resolve(&mut cache, &lines(&["https://e.test", "https://w.test"]))
            .await
            .unwrap();

        assert_eq!(provider.calls(), vec!["https://e.test", "https://w.test"]);
        assert_eq!(r.titles["https://e.test"], "Fresh");
        assert_eq!(r.titles["https://w.test"], "Fresh");
        assert!(r.titles.values().all(|t| !t.trim().is_empty()));
        assert_eq!(r.stats.cache_hits, 0);
        assert_eq!(r.stats.fetched, 2);
        assert_eq!(
            cache.get("https://w.test").await.unwrap().as_deref(),
            Some("Fresh")
        );
    }

    #[tokio::test]
    async fn blank_cached_title_with_failing_provider_is_absent() {
        let provider = StubProvider::with(&[]);
        let service = TitleService::new(provider.clone());
        let mut cache = memory_cache().await;
        cache.put("https://e.test", " \n ");
        cache.save().await.unwrap();

        let r = service
            .resolve(&mut cache, &lines(&["https://e.test"]))
            .await
            .unwrap();

        assert!(r.titles.is_empty());
        assert_eq!(provider.calls().len(), 1);
        assert_eq!(r.stats.failed, 1);
    }

    #[tokio::test]
    async fn empty_batch_is_noop() {
        let provider = StubProvider::with(&[]);
        let service = TitleService::new(provider.clone());
        let mut cache = memory_cache().await;

        let r = service.resolve(&mut cache, &[]).await.unwrap();

        assert!(r.titles.is_empty());
        assert_eq!(r.stats, ResolveStats::default());
    }
}
