//! Fatal errors of the title pipeline.
//!
//! Per-URL failures never show up here; they are logged and the URL is left
//! out of the result. Only conditions that must stop a run are represented.

use std::path::PathBuf;

/// Errors that abort a title run.
#[derive(Debug, thiserror::Error)]
pub enum TitleError {
    /// The URL list file does not exist.
    #[error("URLs file not found: {}", path.display())]
    UrlsFileNotFound { path: PathBuf },

    /// The URL list file exists but could not be read as UTF-8 text.
    #[error("could not read URLs file {}", path.display())]
    UrlsFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The cache store could not be opened or created.
    #[error("title cache unavailable at {}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },

    /// The cache store failed after it was opened.
    #[error("title cache storage failure")]
    Storage(#[from] sqlx::Error),
}

impl TitleError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            TitleError::UrlsFileNotFound { .. } => 2,
            TitleError::UrlsFileRead { .. } => 1,
            TitleError::StorageUnavailable { .. } | TitleError::Storage(_) => 3,
        }
    }
}

pub type Result<T, E = TitleError> = std::result::Result<T, E>;
