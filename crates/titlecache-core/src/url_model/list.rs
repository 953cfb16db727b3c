//! URL list file loading.

use std::path::Path;

use crate::error::{Result, TitleError};

/// Loads the URL list: one entry per line, trimmed.
///
/// Lines that are empty after trimming or that start with `#` are dropped.
/// A missing file is reported as [`TitleError::UrlsFileNotFound`].
pub fn load_urls(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(TitleError::UrlsFileNotFound {
            path: path.to_path_buf(),
        });
    }
    let data = std::fs::read_to_string(path).map_err(|source| TitleError::UrlsFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_url_lines(&data))
}

/// Filters raw file content down to URL lines.
pub fn parse_url_lines(data: &str) -> Vec<String> {
    data.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}
