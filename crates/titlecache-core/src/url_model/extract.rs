//! Best-effort URL extraction from a raw input line.

/// Characters that never end a URL pasted into prose.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '"', '\'', '>'];

/// Extracts the first http(s) URL from a line of text.
///
/// The line may carry extra text around the URL (list bullets, markdown
/// brackets, trailing punctuation). The returned string is the exact
/// substring of the input, so it is stable as a cache key. Returns `None` when
/// no token parses as an absolute http(s) URL with a host.
///
/// # Examples
///
/// - `"- https://a.test/x, see this"` → `"https://a.test/x"`
/// - `"[video](https://youtu.be/abc)"` → `"https://youtu.be/abc"`
pub fn extract_url(raw: &str) -> Option<String> {
    raw.split_whitespace().find_map(candidate_from_token)
}

fn candidate_from_token(token: &str) -> Option<String> {
    let lower = token.to_ascii_lowercase();
    let start = match (lower.find("https://"), lower.find("http://")) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) | (None, Some(a)) => a,
        (None, None) => return None,
    };
    let candidate = trim_url_tail(&token[start..]);

    let parsed = url::Url::parse(candidate).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
        return None;
    }
    Some(candidate.to_string())
}

/// Strips trailing punctuation and closing brackets that have no opening partner.
fn trim_url_tail(mut s: &str) -> &str {
    loop {
        let Some(last) = s.chars().last() else {
            return s;
        };
        let strip = if TRAILING_PUNCTUATION.contains(&last) {
            true
        } else {
            match last {
                ')' => unbalanced(s, '(', ')'),
                ']' => unbalanced(s, '[', ']'),
                '}' => unbalanced(s, '{', '}'),
                _ => false,
            }
        };
        if !strip {
            return s;
        }
        s = &s[..s.len() - last.len_utf8()];
    }
}

fn unbalanced(s: &str, open: char, close: char) -> bool {
    s.matches(close).count() > s.matches(open).count()
}
