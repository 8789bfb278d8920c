//! Stand-in yt-dlp executables for tests

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Shell snippet that sets `$manifest` from `--print-to-file WHEN FILE`
pub const FIND_MANIFEST: &str = r#"manifest=""
while [ $# -gt 0 ]; do
  case "$1" in
    --print-to-file) manifest="$3"; shift 3 ;;
    *) shift ;;
  esac
done"#;

/// Write an executable `yt-dlp` script with `body` into `dir`
pub fn fake_yt_dlp(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("yt-dlp");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}
