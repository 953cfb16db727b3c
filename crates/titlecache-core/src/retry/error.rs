//! Title fetch error type for retry classification.

use std::fmt;

/// Why a single title fetch attempt failed.
///
/// Providers convert these into absence; the type exists so failures can be
/// classified and logged before that happens.
#[derive(Debug)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// The response or metadata carried no title.
    MissingTitle,
    /// The metadata tool could not be run or exited unsuccessfully.
    Tool(String),
    /// The metadata tool printed something that is not a metadata document.
    Metadata(serde_json::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Curl(e) => write!(f, "{}", e),
            FetchError::Http(code) => write!(f, "HTTP {}", code),
            FetchError::MissingTitle => write!(f, "no title found"),
            FetchError::Tool(msg) => write!(f, "{}", msg),
            FetchError::Metadata(e) => write!(f, "invalid metadata: {}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Curl(e) => Some(e),
            FetchError::Metadata(e) => Some(e),
            FetchError::Http(_) | FetchError::MissingTitle | FetchError::Tool(_) => None,
        }
    }
}

impl From<curl::Error> for FetchError {
    fn from(e: curl::Error) -> Self {
        FetchError::Curl(e)
    }
}
