//! Directory copy through the Windows `xcopy` utility

use crate::{DirectoryCopier, MirrorError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Recursive copy (`/E`), create destination (`/I`), overwrite without prompting (`/Y`).
const XCOPY_FLAGS: [&str; 3] = ["/E", "/I", "/Y"];

/// Copier that shells out to `xcopy`
#[derive(Debug, Clone)]
pub struct XcopyCopier {
    program: PathBuf,
}

impl XcopyCopier {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl DirectoryCopier for XcopyCopier {
    fn name(&self) -> &str {
        "xcopy"
    }

    async fn copy_directory(&self, source: &Path, destination: &Path) -> Result<(), MirrorError> {
        debug!(
            "Running {} {} {} {}",
            self.program.display(),
            source.display(),
            destination.display(),
            XCOPY_FLAGS.join(" ")
        );

        // Arguments go straight to the process, so paths with spaces need no quoting.
        let output = Command::new(&self.program)
            .arg(source)
            .arg(destination)
            .args(XCOPY_FLAGS)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => MirrorError::ProgramNotFound(self.program.clone()),
                _ => MirrorError::Io(e),
            })?;

        if !output.status.success() {
            return Err(MirrorError::CopyFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
