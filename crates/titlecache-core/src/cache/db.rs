//! SQLite-backed title cache: connection, migration and lifecycle.
//!
//! Reads and writes live in `ops`.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Result, TitleError};

/// Future returned by the body of [`TitleCache::scoped`].
pub type ScopeFuture<'c, T> = Pin<Box<dyn Future<Output = T> + 'c>>;

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// Handle to the title cache.
///
/// Open once per run, mutate freely, flush with [`save`](Self::save), release
/// with [`close`](Self::close).
pub struct TitleCache {
    pub(crate) pool: Pool<Sqlite>,
    /// Upserts not yet written to the store.
    pub(crate) pending: HashMap<String, String>,
    path: PathBuf,
}

impl TitleCache {
    /// Open (or create) the cache at `path`. Creates parent dirs if needed.
    ///
    /// Any failure here is [`TitleError::StorageUnavailable`].
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let unavailable = |source: sqlx::Error| TitleError::StorageUnavailable {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| unavailable(sqlx::Error::Io(e)))?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        // One connection: the cache has a single writer.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&uri)
            .await
            .map_err(unavailable)?;

        let cache = TitleCache {
            pool,
            pending: HashMap::new(),
            path: path.to_path_buf(),
        };
        cache.migrate().await.map_err(unavailable)?;
        tracing::debug!(path = %path.display(), "title cache opened");
        Ok(cache)
    }

    /// Open the cache at its default XDG location.
    pub async fn open_default() -> Result<Self> {
        Self::open_at(super::default_cache_path()?).await
    }

    /// Open the cache at `path`, run `body` with it, and close it afterwards.
    ///
    /// The cache is closed whether `body` succeeds or fails. An error from
    /// `body` wins over an error from closing.
    pub async fn scoped<T, E, F>(path: impl AsRef<Path>, body: F) -> std::result::Result<T, E>
    where
        E: From<TitleError>,
        F: for<'c> FnOnce(&'c mut TitleCache) -> ScopeFuture<'c, std::result::Result<T, E>>,
    {
        let mut cache = TitleCache::open_at(path).await?;
        let outcome = body(&mut cache).await;
        let closed = cache.close().await;
        let value = outcome?;
        closed?;
        Ok(value)
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush pending writes and release the connection pool.
    pub async fn close(mut self) -> Result<()> {
        let flushed = self.save().await;
        self.pool.close().await;
        tracing::debug!(path = %self.path.display(), "title cache closed");
        flushed.map(|_| ())
    }

    pub(crate) async fn migrate(&self) -> std::result::Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS titles (
                url TEXT PRIMARY KEY NOT NULL,
                title TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl Drop for TitleCache {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            tracing::warn!(
                path = %self.path.display(),
                "title cache dropped with {} unsaved entries",
                self.pending.len()
            );
        }
    }
}

/// Current time as Unix seconds (for DB timestamps).
pub(crate) fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
/// Open an in-memory cache for tests (no disk I/O).
pub(crate) async fn open_memory() -> Result<TitleCache> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    let cache = TitleCache {
        pool,
        pending: HashMap::new(),
        path: PathBuf::from(":memory:"),
    };
    cache.migrate().await?;
    Ok(cache)
}
