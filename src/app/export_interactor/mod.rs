// Export interactor - Renders the timeline or the selected clip to a file

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::domain::errors::*;
use crate::domain::model::Notification;
use crate::domain::store::EditStore;
use crate::ports::*;
use crate::render::{ExportScope, ProgressCallback, ProgressTracker, RenderRequestBuilder};

/// How an export request ended without an error
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// Output published at the path
    Exported(PathBuf),
    /// No destination was chosen
    Cancelled,
    /// The requested scope held no clips
    NothingToExport,
}

/// Interactor for the export use case
pub struct ExportInteractor {
    render_port: Arc<dyn RenderPort>,
}

impl ExportInteractor {
    pub fn new(render_port: Arc<dyn RenderPort>) -> Self {
        Self { render_port }
    }

    /// Export `scope` to a destination chosen through `picker`
    ///
    /// Success and failure are both reported through a store notification;
    /// a failure also returns the render error.
    pub async fn export(
        &self,
        store: &mut EditStore,
        scope: ExportScope,
        picker: &dyn FilePickerPort,
        progress: &dyn ProgressCallback,
    ) -> Result<ExportOutcome, DomainError> {
        let empty = match scope {
            ExportScope::Project => store.is_empty(),
            ExportScope::ActiveClip => store.active_clip().is_none(),
        };
        if empty {
            debug!(?scope, "Nothing to export");
            return Ok(ExportOutcome::NothingToExport);
        }

        let Some(destination) = picker.pick_destination().await else {
            info!("Export cancelled, no destination chosen");
            return Ok(ExportOutcome::Cancelled);
        };

        let job = RenderRequestBuilder::for_scope(store, scope, destination.clone())?;
        info!(
            ?scope,
            segments = job.segments.len(),
            output = %destination.display(),
            "Exporting"
        );
        progress.on_start(job.total_duration());

        let (tx, mut rx) = mpsc::unbounded_channel();
        let render = self.render_port.render(&job, tx);
        let forward = async {
            let mut tracker = ProgressTracker::new();
            while let Some(raw) = rx.recv().await {
                if let Some(percent) = tracker.update(raw) {
                    progress.on_progress(percent);
                }
            }
        };
        let (result, ()) = tokio::join!(render, forward);

        match result {
            Ok(()) => {
                progress.on_complete(&destination);
                store.notify(Notification::success(format!(
                    "Export complete: {}",
                    destination.display()
                )));
                Ok(ExportOutcome::Exported(destination))
            }
            Err(e) => {
                error!(error = %e, output = %destination.display(), "Export failed");
                progress.on_error(&e.to_string());
                store.notify(Notification::error(format!("Export failed: {}", e)));
                Err(e)
            }
        }
    }
}
