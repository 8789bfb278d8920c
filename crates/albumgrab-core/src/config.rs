//! Configuration management for albumgrab

use crate::error::ConfigError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub output: OutputConfig,
    pub download: DownloadConfig,
    pub mirror: MirrorConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to yt-dlp binary (auto-detected if not set)
    pub yt_dlp: Option<PathBuf>,
    /// Directory holding the FFmpeg binaries (`<exe dir>/ffmpeg/bin` if not set)
    pub ffmpeg_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Parent of the album folders (current directory if not set)
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// yt-dlp format selector
    pub format: String,
    /// File name template inside the album folder
    pub filename_template: String,
    /// Codec the FFmpeg post-processor converts to
    pub audio_format: String,
    /// Target quality handed to `--audio-quality`
    pub audio_quality: String,
    /// Skip unavailable playlist entries instead of aborting
    pub ignore_errors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Copy program used for mirroring
    pub program: PathBuf,
    /// Mirror every finished album here (disabled if not set)
    pub destination: Option<PathBuf>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            format: "bestaudio/best".to_string(),
            filename_template: "%(title)s.%(ext)s".to_string(),
            audio_format: "mp3".to_string(),
            audio_quality: "320K".to_string(),
            ignore_errors: true,
        }
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("xcopy"),
            destination: None,
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Load from default config directory
        if let Some(path) = Self::default_file() {
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
            }
        }

        // Load from specified config file
        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::LoadError(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        // ALBUMGRAB_PATHS__YT_DLP -> paths.yt_dlp
        figment = figment.merge(Env::prefixed("ALBUMGRAB_").split("__"));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::LoadError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/albumgrab/config.toml`
    pub fn default_file() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("albumgrab").join("config.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.download.format.trim().is_empty() {
            return Err(ConfigError::InvalidValue("download.format is empty".to_string()));
        }
        if self.download.audio_format.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "download.audio_format is empty".to_string(),
            ));
        }
        let template = Path::new(&self.download.filename_template);
        if template.is_absolute() || template.components().count() != 1 {
            return Err(ConfigError::InvalidValue(format!(
                "download.filename_template must be a bare file name, got {:?}",
                self.download.filename_template
            )));
        }
        Ok(())
    }

    /// Get yt-dlp path, auto-detecting if not configured
    pub fn yt_dlp_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.yt_dlp {
            Ok(path.clone())
        } else {
            which::which("yt-dlp")
                .map_err(|_| ConfigError::InvalidValue("yt-dlp not found in PATH".to_string()))
        }
    }

    /// Directory appended to the search path for FFmpeg
    pub fn ffmpeg_dir(&self) -> Result<PathBuf, ConfigError> {
        match self.paths.ffmpeg_dir {
            Some(ref dir) => Ok(dir.clone()),
            None => Ok(crate::search_path::default_tool_dir()?),
        }
    }

    /// Root under which album folders are created
    pub fn output_root(&self) -> Result<PathBuf, ConfigError> {
        let cwd = std::env::current_dir()?;
        Ok(match self.output.directory {
            Some(ref dir) => cwd.join(dir),
            None => cwd,
        })
    }
}
