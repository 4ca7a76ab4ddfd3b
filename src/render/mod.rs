//! Render request building
//!
//! Projects the ordered clip sequence into a [`RenderJob`]: one trimmed
//! segment per clip, in timeline order, concatenated into a single output.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::Clip;
use crate::domain::store::EditStore;

pub mod filter_graph;
pub mod progress;

pub use filter_graph::FfmpegCommandBuilder;
pub use progress::{clamp_percent, FfmpegProgressParser, NoopProgress, ProgressCallback, ProgressTracker};

/// One trimmed range of a source file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSegment {
    pub source_path: PathBuf,
    pub trim_start: f64,
    pub trim_end: f64,
    pub has_audio: bool,
}

impl RenderSegment {
    pub fn from_clip(clip: &Clip) -> Self {
        Self {
            source_path: clip.path().to_path_buf(),
            trim_start: clip.start(),
            trim_end: clip.end(),
            has_audio: clip.has_audio(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.trim_end - self.trim_start
    }
}

/// Ordered segment list plus destination, handed to the render service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderJob {
    pub segments: Vec<RenderSegment>,
    pub output: PathBuf,
}

impl RenderJob {
    /// Expected duration of the rendered file
    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(RenderSegment::duration).sum()
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

/// What part of the timeline to export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    /// Every clip, in timeline order
    Project,
    /// Only the selected clip
    ActiveClip,
}

/// Builds render jobs from clips
pub struct RenderRequestBuilder;

impl RenderRequestBuilder {
    /// Job rendering `clips` in iteration order
    pub fn build<'a, I>(clips: I, output: impl Into<PathBuf>) -> DomainResult<RenderJob>
    where
        I: IntoIterator<Item = &'a Clip>,
    {
        let segments: Vec<RenderSegment> = clips.into_iter().map(RenderSegment::from_clip).collect();
        if segments.is_empty() {
            return Err(DomainError::EmptyTimeline);
        }

        Ok(RenderJob {
            segments,
            output: output.into(),
        })
    }

    pub fn for_scope(
        store: &EditStore,
        scope: ExportScope,
        output: impl Into<PathBuf>,
    ) -> DomainResult<RenderJob> {
        match scope {
            ExportScope::Project => Self::build(store.clips(), output),
            ExportScope::ActiveClip => Self::build(store.active_clip(), output),
        }
    }
}
