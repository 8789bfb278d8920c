//! Audio download and MP3 conversion using yt-dlp

use crate::config::DownloadConfig;
use crate::error::DownloadError;
use regex::Regex;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// yt-dlp settings for one album download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadProfile {
    pub format: String,
    pub filename_template: String,
    pub audio_format: String,
    pub audio_quality: String,
    pub ignore_errors: bool,
}

impl Default for DownloadProfile {
    fn default() -> Self {
        Self::from(&DownloadConfig::default())
    }
}

impl From<&DownloadConfig> for DownloadProfile {
    fn from(config: &DownloadConfig) -> Self {
        Self {
            format: config.format.clone(),
            filename_template: config.filename_template.clone(),
            audio_format: config.audio_format.clone(),
            audio_quality: config.audio_quality.clone(),
            ignore_errors: config.ignore_errors,
        }
    }
}

impl DownloadProfile {
    /// yt-dlp command line for `url`, writing into `folder` and listing results in `manifest`
    pub fn args(&self, url: &str, folder: &Path, manifest: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-f".into(),
            self.format.as_str().into(),
            "-o".into(),
            folder.join(&self.filename_template).into_os_string(),
            // FFmpeg post-processing
            "--extract-audio".into(),
            "--audio-format".into(),
            self.audio_format.as_str().into(),
            "--audio-quality".into(),
            self.audio_quality.as_str().into(),
        ];

        if self.ignore_errors {
            args.push("--ignore-errors".into());
        }

        args.extend([
            // Single videos and playlists alike
            OsString::from("--yes-playlist"),
            OsString::from("--newline"),
            OsString::from("--print-to-file"),
            OsString::from("after_move:filepath"),
            manifest.as_os_str().to_os_string(),
            OsString::from(url),
        ]);

        args
    }
}

/// A playlist item yt-dlp reported as failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub extractor: Option<String>,
    pub id: Option<String>,
    pub message: String,
}

impl ItemFailure {
    /// Parse an `ERROR: [extractor] id: message` line
    pub fn parse(line: &str) -> Option<Self> {
        static ERROR_LINE: OnceLock<Option<Regex>> = OnceLock::new();
        let re = ERROR_LINE
            .get_or_init(|| {
                Regex::new(r"^ERROR: (?:\[(?P<extractor>[^\]]+)\] (?:(?P<id>[^\s:]+): )?)?(?P<message>.+)$")
                    .ok()
            })
            .as_ref()?;

        let caps = re.captures(line.trim_end())?;
        Some(Self {
            extractor: caps.name("extractor").map(|m| m.as_str().to_string()),
            id: caps.name("id").map(|m| m.as_str().to_string()),
            message: caps["message"].to_string(),
        })
    }
}

/// What a finished yt-dlp run left behind
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub files: Vec<PathBuf>,
    pub failures: Vec<ItemFailure>,
}

/// Result of one album download
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Every item was converted
    Complete { files: Vec<PathBuf> },
    /// Some items were converted, others failed
    Partial {
        files: Vec<PathBuf>,
        failures: Vec<ItemFailure>,
    },
    /// Nothing was converted
    Failed { reason: String },
}

impl DownloadOutcome {
    pub fn classify(transcript: Transcript) -> Self {
        let Transcript {
            success,
            exit_code,
            files,
            failures,
        } = transcript;

        if success && failures.is_empty() {
            DownloadOutcome::Complete { files }
        } else if !files.is_empty() {
            DownloadOutcome::Partial { files, failures }
        } else {
            let reason = match failures.last() {
                Some(failure) => failure.message.clone(),
                None => format!("yt-dlp failed with exit code: {:?}", exit_code),
            };
            DownloadOutcome::Failed { reason }
        }
    }
}

#[derive(Debug)]
pub struct AudioDownloader {
    yt_dlp_path: PathBuf,
    profile: DownloadProfile,
}

impl AudioDownloader {
    pub fn new(yt_dlp_path: PathBuf, profile: DownloadProfile) -> Self {
        Self { yt_dlp_path, profile }
    }

    /// Download `url` as audio into `folder`, creating the folder if needed.
    ///
    /// Errors are folded into [`DownloadOutcome::Failed`].
    pub async fn download(&self, url: &str, folder: &Path) -> DownloadOutcome {
        match self.run(url, folder).await {
            Ok(transcript) => {
                let outcome = DownloadOutcome::classify(transcript);
                debug!("Download outcome: {:?}", outcome);
                outcome
            }
            Err(e) => {
                warn!("An error occurred while downloading the playlist: {}", e);
                DownloadOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn run(&self, url: &str, folder: &Path) -> Result<Transcript, DownloadError> {
        tokio::fs::create_dir_all(folder).await?;

        let manifest = tempfile::Builder::new()
            .prefix("albumgrab-")
            .suffix(".txt")
            .tempfile()?;

        info!("Downloading audio from: {}", url);

        let mut child = Command::new(&self.yt_dlp_path)
            .args(self.profile.args(url, folder, manifest.path()))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => DownloadError::YtDlpNotFound,
                _ => DownloadError::Io(e),
            })?;

        let mut failures = Vec::new();
        if let Some(stderr) = child.stderr.take() {
            // yt-dlp echoes titles in whatever encoding they came in
            let mut lines = BufReader::new(stderr).split(b'\n');
            loop {
                match lines.next_segment().await {
                    Ok(Some(raw)) => {
                        let line = String::from_utf8_lossy(&raw);
                        let line = line.trim_end_matches('\r');
                        eprintln!("{}", line);
                        if let Some(failure) = ItemFailure::parse(line) {
                            failures.push(failure);
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Stopped reading yt-dlp output: {}", e);
                        break;
                    }
                }
            }
        }

        let status = child.wait().await?;

        let manifest_bytes = tokio::fs::read(manifest.path()).await?;
        let files = parse_manifest(&manifest_bytes);

        Ok(Transcript {
            success: status.success(),
            exit_code: status.code(),
            files,
            failures,
        })
    }
}

/// One path per line, as written by `--print-to-file`
fn parse_manifest(bytes: &[u8]) -> Vec<PathBuf> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}
