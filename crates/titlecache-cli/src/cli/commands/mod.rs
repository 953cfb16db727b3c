//! CLI command handlers, one file per command.

mod cache;
mod download;
mod titles;

pub use cache::run_cache;
pub use download::run_download;
pub use titles::run_titles;
