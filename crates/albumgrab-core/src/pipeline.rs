//! Pipeline orchestration: title lookup, folder naming, download, mirroring

use crate::config::Config;
use crate::downloader::{AudioDownloader, DownloadOutcome, DownloadProfile};
use crate::error::Result;
use crate::metadata::{MetadataFetcher, ResolvedTitle, UNKNOWN_TITLE};
use crate::sanitize::sanitize_folder_name;

use albumgrab_mirror::{mirror_folder, DirectoryCopier, MirrorError, XcopyCopier};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Pipeline configuration
#[derive(Clone)]
pub struct PipelineConfig {
    pub yt_dlp: PathBuf,
    pub output_root: PathBuf,
    pub profile: DownloadProfile,
    pub copier: Arc<dyn DirectoryCopier>,
}

impl PipelineConfig {
    /// Build from loaded configuration with an already located yt-dlp
    pub fn from_config(config: &Config, yt_dlp: PathBuf) -> Result<Self> {
        Ok(Self {
            yt_dlp,
            output_root: config.output_root()?,
            profile: DownloadProfile::from(&config.download),
            copier: Arc::new(XcopyCopier::new(config.mirror.program.clone())),
        })
    }
}

/// Where an album will be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistPlan {
    pub url: String,
    pub title: ResolvedTitle,
    pub folder_name: String,
    pub output_folder: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistReport {
    pub plan: PlaylistPlan,
    pub outcome: DownloadOutcome,
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Resolve the title and derive the output folder
    pub async fn plan(&self, url: &str) -> PlaylistPlan {
        let fetcher = MetadataFetcher::new(self.config.yt_dlp.clone());
        let title = fetcher.resolve_title(url).await;

        let mut folder_name = sanitize_folder_name(&title.title);
        // These would resolve to the root itself or its parent
        if matches!(folder_name.as_str(), "" | "." | "..") {
            debug!("Unusable folder name {:?}, using {}", folder_name, UNKNOWN_TITLE);
            folder_name = UNKNOWN_TITLE.to_string();
        }

        let output_folder = self.config.output_root.join(&folder_name);
        info!("Album \"{}\" -> {}", title.title, output_folder.display());

        PlaylistPlan {
            url: url.to_string(),
            title,
            folder_name,
            output_folder,
        }
    }

    /// Download the planned album as MP3 files
    pub async fn download(&self, plan: &PlaylistPlan) -> DownloadOutcome {
        let downloader = AudioDownloader::new(self.config.yt_dlp.clone(), self.config.profile.clone());
        downloader.download(&plan.url, &plan.output_folder).await
    }

    /// Copy the album folder to `destination`
    pub async fn mirror(
        &self,
        plan: &PlaylistPlan,
        destination: &Path,
    ) -> std::result::Result<(), MirrorError> {
        mirror_folder(self.config.copier.as_ref(), &plan.output_folder, destination).await
    }

    /// Plan and download in one go
    pub async fn run(&self, url: &str) -> PlaylistReport {
        let plan = self.plan(url).await;
        let outcome = self.download(&plan).await;
        PlaylistReport { plan, outcome }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::TitleSource;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingCopier {
        calls: Mutex<Vec<(PathBuf, PathBuf)>>,
    }

    #[async_trait]
    impl DirectoryCopier for RecordingCopier {
        fn name(&self) -> &str {
            "recording"
        }

        async fn copy_directory(
            &self,
            source: &Path,
            destination: &Path,
        ) -> albumgrab_mirror::Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((source.to_path_buf(), destination.to_path_buf()));
            Ok(())
        }
    }

    fn build_pipeline(yt_dlp: PathBuf, root: &Path, copier: Arc<dyn DirectoryCopier>) -> Pipeline {
        Pipeline::new(PipelineConfig {
            yt_dlp,
            output_root: root.to_path_buf(),
            profile: DownloadProfile::default(),
            copier,
        })
    }

    #[tokio::test]
    async fn missing_yt_dlp_still_plans_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = build_pipeline(
            dir.path().join("missing-yt-dlp"),
            dir.path(),
            Arc::new(RecordingCopier::default()),
        );

        let report = pipeline.run("https://youtu.be/x").await;

        assert_eq!(report.plan.title.title, "Unknown Playlist");
        assert_eq!(report.plan.output_folder, dir.path().join("Unknown Playlist"));
        assert!(report.plan.output_folder.is_dir());
        assert!(matches!(report.outcome, DownloadOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn mirror_uses_album_folder() {
        let dir = tempfile::tempdir().unwrap();
        let copier = Arc::new(RecordingCopier::default());
        let pipeline = build_pipeline(dir.path().join("missing-yt-dlp"), dir.path(), copier.clone());

        let plan = pipeline.plan("https://youtu.be/x").await;
        let err = pipeline.mirror(&plan, Path::new("//nas/music")).await.unwrap_err();
        assert!(matches!(err, MirrorError::SourceMissing(_)));
        assert!(copier.calls.lock().unwrap().is_empty());

        std::fs::create_dir_all(&plan.output_folder).unwrap();
        pipeline.mirror(&plan, Path::new("//nas/music")).await.unwrap();
        assert_eq!(
            copier.calls.lock().unwrap().as_slice(),
            &[(plan.output_folder.clone(), PathBuf::from("//nas/music"))]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn sanitized_title_names_the_folder() {
        let dir = tempfile::tempdir().unwrap();
        let yt_dlp = crate::test_support::fake_yt_dlp(
            dir.path(),
            &format!(
                r#"for arg in "$@"; do
  if [ "$arg" = "--dump-single-json" ]; then
    echo '{{"_type": "playlist", "title": "My:Playlist/2024"}}'
    exit 0
  fi
done
{}
touch "{root}/My_Playlist_2024/Song.mp3"
echo "{root}/My_Playlist_2024/Song.mp3" >> "$manifest""#,
                crate::test_support::FIND_MANIFEST,
                root = dir.path().display()
            ),
        );
        let pipeline = build_pipeline(yt_dlp, dir.path(), Arc::new(RecordingCopier::default()));

        let report = pipeline.run("https://www.youtube.com/playlist?list=PL1").await;

        let folder = dir.path().join("My_Playlist_2024");
        assert_eq!(report.plan.title.source, TitleSource::Metadata);
        assert_eq!(report.plan.folder_name, "My_Playlist_2024");
        assert_eq!(report.plan.output_folder, folder);
        assert_eq!(
            report.outcome,
            DownloadOutcome::Complete {
                files: vec![folder.join("Song.mp3")]
            }
        );
        assert!(folder.join("Song.mp3").is_file());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn dot_titles_do_not_escape_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let yt_dlp = crate::test_support::fake_yt_dlp(dir.path(), r#"echo '{"title": ".."}'"#);
        let pipeline = build_pipeline(yt_dlp, dir.path(), Arc::new(RecordingCopier::default()));

        let plan = pipeline.plan("https://x").await;

        assert_eq!(plan.title.title, "..");
        assert_eq!(plan.output_folder, dir.path().join(UNKNOWN_TITLE));
    }
}
