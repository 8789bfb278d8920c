//! Executable search path setup so yt-dlp can find a bundled FFmpeg

use std::env::{self, JoinPathsError};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const SEARCH_PATH_VAR: &str = "PATH";

/// `ffmpeg/bin` next to the running executable
pub fn default_tool_dir() -> std::io::Result<PathBuf> {
    let exe = env::current_exe()?;
    let base = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(base.join("ffmpeg").join("bin"))
}

/// Return `current` with `dir` appended, unless it is already one of its entries.
pub fn append_tool_dir(current: Option<&OsStr>, dir: &Path) -> Result<OsString, JoinPathsError> {
    let current = match current {
        Some(value) if !value.is_empty() => value,
        _ => return Ok(dir.as_os_str().to_os_string()),
    };

    let mut entries: Vec<PathBuf> = env::split_paths(current).collect();
    if entries.iter().any(|entry| entry == dir) {
        return Ok(current.to_os_string());
    }

    entries.push(dir.to_path_buf());
    env::join_paths(entries)
}

/// Append `dir` to the process search path. Returns the resulting value.
pub fn configure(dir: &Path) -> Result<OsString, JoinPathsError> {
    let current = env::var_os(SEARCH_PATH_VAR);
    let updated = append_tool_dir(current.as_deref(), dir)?;

    if current.as_deref() != Some(updated.as_os_str()) {
        env::set_var(SEARCH_PATH_VAR, &updated);
        debug!("{} is now {:?}", SEARCH_PATH_VAR, updated);
    }

    info!("FFmpeg path set to: {}", dir.display());
    Ok(updated)
}
