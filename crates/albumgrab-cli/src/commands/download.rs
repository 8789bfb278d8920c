use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

use albumgrab_core::{
    config::Config,
    downloader::DownloadOutcome,
    metadata::TitleSource,
    pipeline::{Pipeline, PipelineConfig},
};

use super::mirror::report_mirror;

pub struct DownloadOptions {
    pub url: Option<String>,
    pub output: Option<PathBuf>,
    pub mirror: Option<PathBuf>,
}

pub async fn run(config: &Config, options: DownloadOptions) -> Result<ExitCode> {
    println!("albumgrab audio downloader");
    println!("--------------------------");

    let url = match options.url {
        Some(url) => url.trim().to_string(),
        None => {
            print!("Enter the video/playlist URL: ");
            io::stdout().flush()?;
            read_url(&mut io::stdin().lock()).context("Failed to read URL from stdin")?
        }
    };

    if url.is_empty() {
        println!("No URL provided. Exiting.");
        return Ok(ExitCode::FAILURE);
    }

    let mut config = config.clone();
    if let Some(dir) = options.output {
        config.output.directory = Some(dir);
    }

    // A missing yt-dlp surfaces as a failed lookup and download below
    let yt_dlp = config.yt_dlp_path().unwrap_or_else(|e| {
        warn!("{}", e);
        PathBuf::from("yt-dlp")
    });

    let pipeline = match PipelineConfig::from_config(&config, yt_dlp) {
        Ok(pipeline_config) => Pipeline::new(pipeline_config),
        Err(e) => {
            println!("An error occurred while downloading the playlist: {}", e);
            println!("\nDone! Exiting...");
            return Ok(ExitCode::SUCCESS);
        }
    };

    let pb = super::spinner("Fetching metadata...")?;
    let plan = pipeline.plan(&url).await;
    pb.finish_and_clear();

    if let TitleSource::Fallback(ref reason) = plan.title.source {
        println!("Error fetching playlist info: {}", reason);
    }
    println!("\nDownloading: {}", plan.title.title);
    println!("Saving to: {}\n", plan.output_folder.display());

    let outcome = pipeline.download(&plan).await;
    println!("\n{}", describe(&outcome));

    let destination = options.mirror.or_else(|| config.mirror.destination.clone());
    if let Some(destination) = destination {
        if matches!(outcome, DownloadOutcome::Failed { .. }) {
            println!("Skipping copy to {}: nothing was downloaded", destination.display());
        } else {
            let pb = super::spinner(format!("Copying to {}...", destination.display()))?;
            let result = pipeline.mirror(&plan, &destination).await;
            pb.finish_and_clear();
            report_mirror(&result, &destination);
        }
    }

    println!("\nDone! Exiting...");
    Ok(ExitCode::SUCCESS)
}

/// Read one line and trim it; end of input gives an empty string
fn read_url(input: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn describe(outcome: &DownloadOutcome) -> String {
    match outcome {
        DownloadOutcome::Complete { files } => {
            format!("Saved {} file(s).", files.len())
        }
        DownloadOutcome::Partial { files, failures } => {
            let mut text = format!(
                "Saved {} file(s); {} item(s) failed:",
                files.len(),
                failures.len()
            );
            for failure in failures {
                match failure.id {
                    Some(ref id) => text.push_str(&format!("\n  {}: {}", id, failure.message)),
                    None => text.push_str(&format!("\n  {}", failure.message)),
                }
            }
            text
        }
        DownloadOutcome::Failed { reason } => {
            format!("An error occurred while downloading the playlist: {}", reason)
        }
    }
}
