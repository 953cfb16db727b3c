//! Which title-fetch failures are worth another attempt.
//!
//! Only conditions that may clear up on their own are transient: slow or
//! unreachable servers and servers that are overloaded. A page that answers
//! with a client error, or answers without a `<title>`, will answer the same
//! way next time.

use super::error::FetchError;
use super::policy::ErrorKind;

/// Kind of an HTTP status returned for a page.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        408 => ErrorKind::Timeout,
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Kind of a libcurl transfer failure.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        ErrorKind::Timeout
    } else if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        ErrorKind::Connection
    } else {
        ErrorKind::Other
    }
}

/// Kind of any provider failure. Tool and metadata failures are final.
pub fn classify(e: &FetchError) -> ErrorKind {
    match e {
        FetchError::Curl(ce) => classify_curl_error(ce),
        FetchError::Http(code) => classify_http_status(*code),
        FetchError::MissingTitle | FetchError::Tool(_) | FetchError::Metadata(_) => {
            ErrorKind::Other
        }
    }
}
