//! albumgrab-core: turn a video or playlist URL into a folder of MP3 files

pub mod config;
pub mod downloader;
pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod sanitize;
pub mod search_path;

#[cfg(all(test, unix))]
mod test_support;

pub use config::Config;
pub use error::{AlbumGrabError, Result};
