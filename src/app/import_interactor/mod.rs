// Import interactor - Brings picked source files into the timeline

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::store::EditStore;
use crate::ports::*;

/// Interactor for the import use case
pub struct ImportInteractor {
    probe_port: Arc<dyn ProbePort>,
    preview_port: Option<Arc<dyn PreviewPort>>,
    alert_port: Arc<dyn AlertPort>,
    default_duration: f64,
}

impl ImportInteractor {
    /// Create new import interactor; without a preview port no previews are generated
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        preview_port: Option<Arc<dyn PreviewPort>>,
        alert_port: Arc<dyn AlertPort>,
        default_duration: f64,
    ) -> Self {
        Self {
            probe_port,
            preview_port,
            alert_port,
            default_duration,
        }
    }

    /// Import every file the picker returns, one at a time, in order
    ///
    /// Returns the ids of the clips added. Per-file probe and preview failures
    /// are logged and defaulted; only a missing picker fails the operation.
    pub async fn import(
        &self,
        store: &mut EditStore,
        picker: &dyn FilePickerPort,
    ) -> Result<Vec<ClipId>, DomainError> {
        let paths = match picker.pick_sources().await {
            Ok(paths) => paths,
            Err(e) => {
                self.alert_port.alert(&format!("Cannot import: {}", e));
                return Err(e);
            }
        };

        if paths.is_empty() {
            debug!("Import cancelled, no files selected");
            return Ok(Vec::new());
        }

        let mut added = Vec::with_capacity(paths.len());
        for path in &paths {
            let media = self.gather(path).await;
            match store.add_clip(media) {
                Ok(id) => added.push(id),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping file"),
            }
        }

        info!(requested = paths.len(), imported = added.len(), "Import finished");
        Ok(added)
    }

    /// Collect metadata and previews for one file, defaulting whatever fails
    pub async fn gather(&self, path: &Path) -> ImportedMedia {
        let (duration, has_audio) = match self.probe_port.probe(path).await {
            // A zero or unreadable duration counts as unknown
            Ok(meta) if meta.duration == 0.0 || !meta.duration.is_finite() => {
                warn!(path = %path.display(), default = self.default_duration, "Probe reported no duration, using default");
                (self.default_duration, meta.has_audio)
            }
            Ok(meta) => (meta.duration, meta.has_audio),
            Err(e) => {
                warn!(path = %path.display(), error = %e, default = self.default_duration, "Probe failed, using default duration");
                (self.default_duration, true)
            }
        };

        let media = ImportedMedia::new(path, duration).with_audio(has_audio);
        let Some(preview) = &self.preview_port else {
            return media;
        };

        let thumbnail = match preview.thumbnail(path).await {
            Ok(image) => image,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Thumbnail generation failed");
                None
            }
        };

        let waveform = if has_audio {
            match preview.waveform(path).await {
                Ok(image) => image,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Waveform generation failed");
                    None
                }
            }
        } else {
            None
        };

        media.with_thumbnail(thumbnail).with_waveform(waveform)
    }
}
