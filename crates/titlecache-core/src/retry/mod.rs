//! Retry and backoff policy for title fetches.
//!
//! Providers classify their failures (timeouts, throttling, connection
//! errors) and share one bounded backoff policy. Anything not classified as
//! transient is given up on after the first attempt.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
