mod args;
mod commands;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use albumgrab_core::{search_path, Config};
use args::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let filter = match cli.verbose {
        0 => "albumgrab=info",
        1 => "albumgrab=debug",
        2 => "albumgrab=trace",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    // A broken config must not change the exit code of a download
    let config = Config::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!("{}; using default settings", e);
        Config::default()
    });

    // FFmpeg must be on PATH before yt-dlp is located or started
    match config.ffmpeg_dir() {
        Ok(dir) => {
            if let Err(e) = search_path::configure(&dir) {
                warn!("Could not add {} to PATH: {}", dir.display(), e);
            }
        }
        Err(e) => warn!("Could not determine FFmpeg directory: {}", e),
    }

    match cli.command {
        Some(Commands::Mirror {
            source,
            destination,
        }) => commands::mirror::run(&config, &source, &destination).await,
        Some(Commands::Doctor) => commands::doctor::run(&config).await,
        Some(Commands::Config) => commands::config::run(&config, cli.config.as_deref()).await,
        None => {
            let options = commands::download::DownloadOptions {
                url: cli.url,
                output: cli.output,
                mirror: cli.mirror,
            };
            commands::download::run(&config, options).await
        }
    }
}
