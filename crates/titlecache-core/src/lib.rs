pub mod config;
pub mod logging;

pub mod batch;
pub mod cache;
pub mod download;
pub mod error;
pub mod normalize;
pub mod provider;
pub mod retry;
pub mod service;
pub mod url_model;
pub mod ytdlp;
