//! Cache reads and writes: get, put, save, inspection.

use sqlx::Row;
use std::collections::BTreeMap;

use super::db::{unix_timestamp, TitleCache};
use crate::error::Result;

impl TitleCache {
    /// Look up the stored title for `url`. Pending writes are visible.
    pub async fn get(&self, url: &str) -> Result<Option<String>> {
        if let Some(title) = self.pending.get(url) {
            return Ok(Some(title.clone()));
        }
        let row = sqlx::query(
            r#"
            SELECT title FROM titles
            WHERE url = ?1
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.get("title")))
    }

    /// Insert or replace the title for `url`. Written to disk on [`save`](Self::save).
    pub fn put(&mut self, url: &str, title: &str) {
        self.pending.insert(url.to_string(), title.to_string());
    }

    /// Whether a title is stored for `url`.
    pub async fn contains(&self, url: &str) -> Result<bool> {
        Ok(self.get(url).await?.is_some())
    }

    /// Number of pending writes not yet saved.
    pub fn unsaved(&self) -> usize {
        self.pending.len()
    }

    /// Persist all pending writes in one transaction.
    ///
    /// Returns the number of entries written. With nothing pending this is a
    /// no-op that does not touch the store.
    pub async fn save(&mut self) -> Result<usize> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        let now = unix_timestamp();
        let mut tx = self.pool.begin().await?;
        for (url, title) in &self.pending {
            sqlx::query(
                r#"
                INSERT INTO titles (url, title, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(url) DO UPDATE SET
                    title = excluded.title,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(url)
            .bind(title)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        let written = self.pending.len();
        self.pending.clear();
        tracing::debug!("saved {} title(s) to cache", written);
        Ok(written)
    }

    /// All entries, stored and pending, ordered by URL.
    pub async fn entries(&self) -> Result<BTreeMap<String, String>> {
        let rows = sqlx::query(
            r#"
            SELECT url, title FROM titles
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut out = BTreeMap::new();
        for row in rows {
            let url: String = row.get("url");
            let title: String = row.get("title");
            out.insert(url, title);
        }
        for (url, title) in &self.pending {
            out.insert(url.clone(), title.clone());
        }
        Ok(out)
    }

    /// Number of distinct URLs in the cache, including pending writes.
    pub async fn len(&self) -> Result<usize> {
        Ok(self.entries().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}
