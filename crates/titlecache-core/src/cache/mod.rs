//! Persistent URL → title cache (SQLite via sqlx).
//!
//! Writes are buffered in memory and flushed by [`TitleCache::save`], so a
//! batch costs one transaction no matter how many titles change. The store
//! assumes a single writer: two processes must not open the same file at once.

mod db;
mod ops;

pub use db::{ScopeFuture, TitleCache};

#[cfg(test)]
pub(crate) use db::open_memory;

use std::io;
use std::path::PathBuf;

use crate::error::{Result, TitleError};

/// Shown in errors when the default location itself cannot be determined.
const DEFAULT_CACHE_LOCATION: &str = "$XDG_STATE_HOME/titlecache/titles.db";

/// Default cache location: `~/.local/state/titlecache/titles.db` on Debian.
///
/// Failing to resolve or create the state directory is
/// [`TitleError::StorageUnavailable`], like any other cache open failure.
pub fn default_cache_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("titlecache")
        .map_err(|e| state_dir_unavailable(io::Error::other(e.to_string())))?;
    xdg_dirs
        .place_state_file("titles.db")
        .map_err(state_dir_unavailable)
}

fn state_dir_unavailable(source: io::Error) -> TitleError {
    TitleError::StorageUnavailable {
        path: PathBuf::from(DEFAULT_CACHE_LOCATION),
        source: sqlx::Error::Io(source),
    }
}
