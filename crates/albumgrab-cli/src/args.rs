use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "albumgrab")]
#[command(author, version, about = "Download a video or playlist as an MP3 album folder")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Video or playlist URL (prompted for if omitted)
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Directory the album folder is created in (default: current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Copy the finished album folder to this destination
    #[arg(long, value_name = "DEST")]
    pub mirror: Option<PathBuf>,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy a folder to a network destination
    Mirror {
        /// Folder to copy
        source: PathBuf,

        /// Destination path, created if absent
        destination: PathBuf,
    },

    /// Check external tools
    Doctor,

    /// Show configuration
    Config,
}
