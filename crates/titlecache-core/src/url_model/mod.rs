//! URL list loading and URL extraction.
//!
//! Raw input lines may carry text around the URL; extraction turns a line
//! into the canonical string used as the cache key.

mod extract;
mod list;

pub use extract::extract_url;
pub use list::{load_urls, parse_url_lines};
