//! Folder mirroring for albumgrab
//!
//! Copies a finished album folder to another location (typically a network share).
//! The copy itself is delegated to a [`DirectoryCopier`]; the only implementation
//! shipped here is [`XcopyCopier`], which drives the Windows `xcopy` utility.

mod error;
mod xcopy;

pub use error::MirrorError;
pub use xcopy::XcopyCopier;

use async_trait::async_trait;
use std::path::Path;
use tracing::info;

pub type Result<T> = std::result::Result<T, MirrorError>;

/// Something that can copy a directory tree to a destination
#[async_trait]
pub trait DirectoryCopier: Send + Sync {
    /// Short name used in log messages
    fn name(&self) -> &str;

    /// Recursively copy `source` into `destination`, creating it if absent and
    /// overwriting existing files.
    async fn copy_directory(&self, source: &Path, destination: &Path) -> Result<()>;
}

/// Mirror `source` to `destination` with the given copier.
///
/// A missing source folder is reported without invoking the copier.
pub async fn mirror_folder(
    copier: &dyn DirectoryCopier,
    source: &Path,
    destination: &Path,
) -> Result<()> {
    if !source.is_dir() {
        return Err(MirrorError::SourceMissing(source.to_path_buf()));
    }

    info!(
        "Mirroring {} to {} with {}",
        source.display(),
        destination.display(),
        copier.name()
    );

    copier.copy_directory(source, destination).await?;

    info!("Folder successfully copied to {}", destination.display());
    Ok(())
}
