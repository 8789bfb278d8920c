//! Error types for folder mirroring

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Source folder {0} does not exist")]
    SourceMissing(PathBuf),

    #[error("Copy program not found: {0}")]
    ProgramNotFound(PathBuf),

    #[error("Copy failed with exit code {code:?}: {stderr}")]
    CopyFailed { code: Option<i32>, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
