//! HTML title provider: GET the page with libcurl, read `<title>`.

use scraper::{Html, Selector};
use std::time::Duration;

use super::TitleProvider;
use crate::retry::{run_with_retry, FetchError, RetryPolicy};

/// Default request timeout (connect and total).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Only the head of the document matters; stop keeping bytes after this.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

const USER_AGENT: &str = concat!("titlecache/", env!("CARGO_PKG_VERSION"));

/// Scrapes the `<title>` element of a web page.
#[derive(Debug, Clone)]
pub struct HtmlProvider {
    timeout: Duration,
    retry: RetryPolicy,
}

impl Default for HtmlProvider {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl HtmlProvider {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        let body = get_body(url, self.timeout)?;
        title_from_html(&body).ok_or(FetchError::MissingTitle)
    }
}

impl TitleProvider for HtmlProvider {
    fn name(&self) -> &'static str {
        "html"
    }

    fn fetch(&self, url: &str) -> Option<String> {
        tracing::debug!("getting webpage title for URL: {}", url);
        match run_with_retry(&self.retry, || self.fetch_once(url)) {
            Ok(title) => {
                tracing::debug!("found webpage title: {}", title);
                Some(title)
            }
            Err(FetchError::MissingTitle) => {
                tracing::warn!(url, "page has no title element");
                None
            }
            Err(e) => {
                tracing::error!(url, "failed to get page title: {}", e);
                None
            }
        }
    }
}

/// Text of the first `<title>` element, if any.
pub fn title_from_html(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|t| t.text().collect::<String>())
}

/// GET `url` and return the (capped) body as text.
///
/// Follows redirects. Runs in the current thread; call from `spawn_blocking`
/// if used from async code.
fn get_body(url: &str, timeout: Duration) -> Result<String, FetchError> {
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(timeout)?;
    easy.timeout(timeout)?;
    easy.useragent(USER_AGENT)?;
    // Empty string: accept every encoding curl can decode.
    easy.accept_encoding("")?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            let room = MAX_BODY_BYTES.saturating_sub(body.len());
            body.extend_from_slice(&data[..data.len().min(room)]);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}
