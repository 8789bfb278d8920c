use anyhow::Result;
use std::path::Path;
use std::process::{Command, ExitCode};
use which::which;

use albumgrab_core::config::Config;
use albumgrab_mirror::{DirectoryCopier, XcopyCopier};

pub async fn run(config: &Config) -> Result<ExitCode> {
    println!("albumgrab dependency check\n");

    let mut all_ok = true;

    // Check yt-dlp
    print!("yt-dlp:        ");
    match config.yt_dlp_path() {
        Ok(path) => match tool_version(&path, "--version") {
            Some(v) => println!("OK ({})", v),
            None => {
                println!("FOUND but failed to get version ({})", path.display());
                all_ok = false;
            }
        },
        Err(_) => {
            println!("NOT FOUND");
            println!("               Install yt-dlp or set paths.yt_dlp");
            all_ok = false;
        }
    }

    // Check FFmpeg (the bundled directory is already on PATH)
    print!("ffmpeg:        ");
    match which("ffmpeg") {
        Ok(path) => match tool_version(&path, "-version") {
            Some(first_line) => {
                // Extract just version number
                let version_part = first_line.split_whitespace().nth(2).unwrap_or("unknown");
                println!("OK ({})", version_part);
            }
            None => {
                println!("FOUND but failed to get version");
                all_ok = false;
            }
        },
        Err(_) => {
            println!("NOT FOUND");
            println!("               MP3 conversion needs ffmpeg on PATH");
            all_ok = false;
        }
    }

    print!("ffmpeg dir:    ");
    match config.ffmpeg_dir() {
        Ok(dir) if dir.is_dir() => println!("OK ({})", dir.display()),
        Ok(dir) => println!("ABSENT ({}, system ffmpeg is used)", dir.display()),
        Err(e) => println!("UNKNOWN ({})", e),
    }

    // Mirroring is optional, so a missing copy program is only reported
    let copier = XcopyCopier::new(config.mirror.program.clone());
    print!("{:<15}", format!("{}:", copier.name()));
    match which(copier.program()) {
        Ok(path) => println!("OK ({})", path.display()),
        Err(_) => {
            println!("NOT FOUND ({})", copier.program().display());
            println!("               Only needed for `albumgrab mirror` and --mirror");
        }
    }

    println!();
    if all_ok {
        println!("All dependencies OK!");
    } else {
        println!("Some dependencies are missing. See above for installation instructions.");
    }

    Ok(ExitCode::SUCCESS)
}

/// First line of `<tool> <flag>` output
fn tool_version(path: &Path, flag: &str) -> Option<String> {
    let out = Command::new(path).arg(flag).output().ok()?;
    if !out.status.success() {
        return None;
    }
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_string())
}
