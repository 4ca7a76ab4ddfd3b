//! FFmpeg preview adapter
//!
//! Extracts a thumbnail frame and renders a waveform strip for imported
//! sources. Each image is written into a scratch directory and read back.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::debug;

use crate::config::PreviewConfig;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// FFmpeg-based thumbnail and waveform generator
pub struct FfmpegPreviewAdapter {
    binary: PathBuf,
    config: PreviewConfig,
}

impl FfmpegPreviewAdapter {
    pub fn new(binary: impl Into<PathBuf>, config: PreviewConfig) -> Self {
        Self {
            binary: binary.into(),
            config,
        }
    }

    /// Arguments producing one scaled still frame
    pub fn thumbnail_args(&self, source: &Path, output: &Path) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            "-y".to_string(),
            "-ss".to_string(),
            format!("{}", self.config.thumbnail_timemark),
            "-i".to_string(),
            source.to_string_lossy().into_owned(),
            "-frames:v".to_string(),
            "1".to_string(),
            "-vf".to_string(),
            format!(
                "scale={}:{}",
                self.config.thumbnail_width, self.config.thumbnail_height
            ),
            output.to_string_lossy().into_owned(),
        ]
    }

    /// Arguments producing the waveform strip of the full source
    ///
    /// The wave is drawn at twice the strip height and padded back down so
    /// the mono trace is centred.
    pub fn waveform_args(&self, source: &Path, output: &Path) -> Vec<String> {
        let width = self.config.waveform_width;
        let height = self.config.waveform_height;
        vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            "-y".to_string(),
            "-i".to_string(),
            source.to_string_lossy().into_owned(),
            "-filter_complex".to_string(),
            format!(
                "[0:a]aformat=channel_layouts=mono,showwavespic=s={}x{}:colors={},scale={}:{},pad={}:{}:(ow-iw)/2:(oh-ih)/2[wave]",
                width,
                height * 2,
                self.config.waveform_color,
                width,
                height,
                width,
                height
            ),
            "-map".to_string(),
            "[wave]".to_string(),
            "-frames:v".to_string(),
            "1".to_string(),
            output.to_string_lossy().into_owned(),
        ]
    }

    async fn run_to_png(&self, args: Vec<String>, output: &Path) -> Result<Option<PreviewImage>, DomainError> {
        let result = Command::new(&self.binary)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DomainError::PreviewFailed(format!("Failed to run ffmpeg: {}", e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(DomainError::PreviewFailed(format!(
                "ffmpeg exited with {}: {}",
                result.status,
                stderr.trim()
            )));
        }

        match tokio::fs::read(output).await {
            Ok(bytes) => Ok(PreviewImage::png(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::Io(e)),
        }
    }
}

#[async_trait]
impl PreviewPort for FfmpegPreviewAdapter {
    async fn thumbnail(&self, path: &Path) -> Result<Option<PreviewImage>, DomainError> {
        let scratch = TempDir::new()?;
        let output = scratch.path().join("thumbnail.png");
        debug!(path = %path.display(), "Generating thumbnail");
        self.run_to_png(self.thumbnail_args(path, &output), &output).await
    }

    async fn waveform(&self, path: &Path) -> Result<Option<PreviewImage>, DomainError> {
        let scratch = TempDir::new()?;
        let output = scratch.path().join("waveform.png");
        debug!(path = %path.display(), "Generating waveform");

        // Sources without an audio stream make the filter graph fail
        match self.run_to_png(self.waveform_args(path, &output), &output).await {
            Ok(image) => Ok(image),
            Err(DomainError::PreviewFailed(reason)) => {
                debug!(path = %path.display(), %reason, "No waveform produced");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
