//! Title lookup through yt-dlp's metadata-only mode

use crate::error::DownloadError;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Title used when the metadata lookup yields nothing
pub const UNKNOWN_TITLE: &str = "Unknown Playlist";

#[derive(Debug, Clone, Deserialize)]
pub struct MediaInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// `"playlist"` for playlists, `"video"` (or absent) for single items
    #[serde(default, rename = "_type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub entries: Vec<PlaylistEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl MediaInfo {
    pub fn is_playlist(&self) -> bool {
        self.kind.as_deref() == Some("playlist")
    }
}

/// Where a resolved title came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleSource {
    Metadata,
    /// The lookup failed or had no title; holds the reason.
    Fallback(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTitle {
    pub title: String,
    pub source: TitleSource,
}

impl ResolvedTitle {
    fn fallback(reason: impl Into<String>) -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            source: TitleSource::Fallback(reason.into()),
        }
    }
}

#[derive(Debug)]
pub struct MetadataFetcher {
    yt_dlp_path: PathBuf,
}

impl MetadataFetcher {
    pub fn new(yt_dlp_path: PathBuf) -> Self {
        Self { yt_dlp_path }
    }

    /// Fetch top-level metadata without downloading anything
    pub async fn fetch(&self, url: &str) -> Result<MediaInfo, DownloadError> {
        debug!("Fetching metadata for: {}", url);

        let output = Command::new(&self.yt_dlp_path)
            .args([
                // Playlist entries are listed, not resolved
                "--flat-playlist",
                "--dump-single-json",
                "--quiet",
                "--no-warnings",
                url,
            ])
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => DownloadError::YtDlpNotFound,
                _ => DownloadError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            return Err(DownloadError::YtDlpFailed {
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| DownloadError::MetadataParse(e.to_string()))
    }

    /// Title of the video or playlist, or [`UNKNOWN_TITLE`] if it cannot be found
    pub async fn resolve_title(&self, url: &str) -> ResolvedTitle {
        match self.fetch(url).await {
            Ok(info) => title_from_info(info),
            Err(e) => {
                debug!("Error fetching playlist info: {}", e);
                ResolvedTitle::fallback(e.to_string())
            }
        }
    }
}

fn title_from_info(info: MediaInfo) -> ResolvedTitle {
    if info.is_playlist() {
        info!("Playlist with {} entries", info.entries.len());
    }

    match info.title {
        Some(title) => ResolvedTitle {
            title,
            source: TitleSource::Metadata,
        },
        None => {
            warn!("Metadata has no title field");
            ResolvedTitle::fallback("metadata has no title")
        }
    }
}
