//! End-to-end runs of the albumgrab binary with an isolated environment.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn albumgrab(cwd: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_albumgrab"));
    cmd.current_dir(cwd)
        // Keep user config files out of the run
        .env("HOME", cwd)
        .env("XDG_CONFIG_HOME", cwd.join(".config"))
        .env("ALBUMGRAB_PATHS__YT_DLP", cwd.join("no-such-yt-dlp"))
        .env("ALBUMGRAB_PATHS__FFMPEG_DIR", cwd.join("ffmpeg").join("bin"))
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

fn run_with_stdin(mut cmd: Command, input: &str) -> Output {
    let mut child = cmd.stdin(Stdio::piped()).spawn().unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn entries(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn empty_input_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_with_stdin(albumgrab(dir.path()), "   \n");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No URL provided. Exiting."));
    assert!(entries(dir.path()).is_empty());
}

#[test]
fn closed_stdin_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();

    let output = albumgrab(dir.path()).stdin(Stdio::null()).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(entries(dir.path()).is_empty());
}

#[test]
fn blank_url_argument_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();

    let output = albumgrab(dir.path())
        .arg("  ")
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn failed_lookup_and_download_still_exit_zero() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_with_stdin(albumgrab(dir.path()), "https://www.youtube.com/playlist?list=PL1\n");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Error fetching playlist info: yt-dlp not found"));
    assert!(stdout.contains("Downloading: Unknown Playlist"));
    assert!(stdout.contains("An error occurred while downloading the playlist"));
    assert!(stdout.contains("Done! Exiting..."));
    assert!(dir.path().join("Unknown Playlist").is_dir());
}

#[test]
fn invalid_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join(".config").join("albumgrab");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "[download\nformat = ").unwrap();

    let output = albumgrab(dir.path())
        .arg("https://youtu.be/dQw4w9WgXcQ")
        .env("ALBUMGRAB_DOWNLOAD__IGNORE_ERRORS", "maybe")
        // Defaults look yt-dlp up on PATH, so keep the real one out of reach
        .env("PATH", dir.path().join("bin"))
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("using default settings"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Downloading: Unknown Playlist"));
    assert!(stdout.contains("Done! Exiting..."));
    assert!(dir.path().join("Unknown Playlist").is_dir());
}

#[test]
fn output_option_moves_album_folder() {
    let dir = tempfile::tempdir().unwrap();

    let output = albumgrab(dir.path())
        .args(["https://youtu.be/dQw4w9WgXcQ", "--output", "music"])
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert!(dir.path().join("music").join("Unknown Playlist").is_dir());
}

#[test]
fn mirror_of_missing_folder_reports_error() {
    let dir = tempfile::tempdir().unwrap();

    let output = albumgrab(dir.path())
        .args(["mirror", "absent", "dest"])
        .env("ALBUMGRAB_MIRROR__PROGRAM", dir.path().join("no-such-xcopy"))
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Error: Source folder absent does not exist."));
    assert!(!dir.path().join("dest").exists());
}
