//! Title normalization.
//!
//! Applied to every title before it is stored or returned: runs of `\n`,
//! `\t` and `\r` become one space, then runs of two or more spaces collapse to
//! one. The transform is idempotent.

use regex::Regex;
use std::sync::LazyLock;

static LINE_BREAKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\n\t\r]+").unwrap());
static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Normalizes a title.
///
/// # Examples
///
/// - `"Bad   Title\nLine"` → `"Bad Title Line"`
/// - `"a\r\n\tb"` → `"a b"`
pub fn normalize_title(title: &str) -> String {
    let spaced = LINE_BREAKS.replace_all(title, " ");
    SPACE_RUNS.replace_all(&spaced, " ").into_owned()
}

/// Normalizes a provider title, treating blank results as absent.
pub fn normalize_fetched(title: &str) -> Option<String> {
    let normalized = normalize_title(title);
    if normalized.trim().is_empty() {
        None
    } else {
        Some(normalized)
    }
}
