use anyhow::Result;
use std::path::Path;
use std::process::ExitCode;

use albumgrab_core::config::Config;
use albumgrab_mirror::{mirror_folder, MirrorError, XcopyCopier};

pub async fn run(config: &Config, source: &Path, destination: &Path) -> Result<ExitCode> {
    let copier = XcopyCopier::new(config.mirror.program.clone());

    let pb = super::spinner(format!("Copying to {}...", destination.display()))?;
    let result = mirror_folder(&copier, source, destination).await;
    pb.finish_and_clear();

    report_mirror(&result, destination);
    Ok(ExitCode::SUCCESS)
}

pub(crate) fn report_mirror(result: &std::result::Result<(), MirrorError>, destination: &Path) {
    match result {
        Ok(()) => println!("Folder successfully copied to {}", destination.display()),
        Err(MirrorError::SourceMissing(source)) => {
            println!("Error: Source folder {} does not exist.", source.display())
        }
        Err(MirrorError::CopyFailed { stderr, .. }) if !stderr.is_empty() => {
            println!("Error copying folder: {}", stderr)
        }
        Err(e) => println!("An error occurred while copying the folder: {}", e),
    }
}
