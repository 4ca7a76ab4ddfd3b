// Ports - Interface definitions (contracts) for external collaborators

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::render::RenderJob;

/// Port for media metadata probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe a source file for duration, container format and dimensions
    async fn probe(&self, path: &Path) -> Result<MediaMetadata, DomainError>;
}

/// Port for preview artifact generation
#[async_trait]
pub trait PreviewPort: Send + Sync {
    /// Single still frame; `Ok(None)` when nothing could be extracted
    async fn thumbnail(&self, path: &Path) -> Result<Option<PreviewImage>, DomainError>;

    /// Full-source audio waveform strip; `Ok(None)` when the source has no audio
    async fn waveform(&self, path: &Path) -> Result<Option<PreviewImage>, DomainError>;
}

/// Port for source and destination selection
#[async_trait]
pub trait FilePickerPort: Send + Sync {
    /// Source files to import; an empty list means the user cancelled.
    /// An error means no picker is available at all.
    async fn pick_sources(&self) -> Result<Vec<PathBuf>, DomainError>;

    /// Render destination, or `None` when the user cancelled
    async fn pick_destination(&self) -> Option<PathBuf>;
}

/// Port for the external transcoding service
#[async_trait]
pub trait RenderPort: Send + Sync {
    /// Render the job to its output path
    ///
    /// Progress is reported as a percentage on `progress` while the job runs.
    /// Resolves once the output exists at its final path, or with an error
    /// after which no output has been published.
    async fn render(
        &self,
        job: &RenderJob,
        progress: mpsc::UnboundedSender<f64>,
    ) -> Result<(), DomainError>;
}

/// Port for blocking, last-resort user alerts
pub trait AlertPort: Send + Sync {
    fn alert(&self, message: &str);
}

/// Port for the playback engine driving the preview
///
/// Positions are absolute times in the loaded source file.
pub trait PlaybackEngine {
    fn position(&self) -> f64;

    fn seek(&mut self, position: f64);

    fn play(&mut self);

    fn pause(&mut self);

    /// Replace the loaded source
    fn load(&mut self, path: &Path);
}
