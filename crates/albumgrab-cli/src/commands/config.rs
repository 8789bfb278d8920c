use anyhow::{Context, Result};
use std::path::Path;
use std::process::ExitCode;

use albumgrab_core::config::Config;

pub async fn run(config: &Config, config_path: Option<&Path>) -> Result<ExitCode> {
    println!("albumgrab configuration\n");

    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    println!("{}", rendered.trim_end());

    if config.paths.yt_dlp.is_none() {
        println!("\n# paths.yt_dlp unset: found via PATH");
    }
    if config.paths.ffmpeg_dir.is_none() {
        println!("# paths.ffmpeg_dir unset: <executable dir>/ffmpeg/bin");
    }
    if config.output.directory.is_none() {
        println!("# output.directory unset: current directory");
    }

    // Show config file locations
    println!("\nConfig file locations (in priority order):");
    if let Some(p) = config_path {
        println!("  1. {} (specified)", p.display());
    }
    if let Some(default_file) = Config::default_file() {
        println!("  2. {}", default_file.display());
    }
    println!("  3. Environment variables (ALBUMGRAB_*, nested keys joined with __)");

    Ok(ExitCode::SUCCESS)
}
