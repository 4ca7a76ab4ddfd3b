//! FFmpeg render adapter
//!
//! Renders into a hidden temporary sibling of the destination and renames it
//! into place only when ffmpeg exits successfully, so a failed render never
//! leaves a partial file under the final name.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::domain::errors::*;
use crate::ports::*;
use crate::render::{clamp_percent, FfmpegCommandBuilder, FfmpegProgressParser, RenderJob};

/// FFmpeg-based render adapter
pub struct FfmpegRenderAdapter {
    binary: PathBuf,
    builder: FfmpegCommandBuilder,
}

impl FfmpegRenderAdapter {
    pub fn new(binary: impl Into<PathBuf>, threads: usize) -> Self {
        Self {
            binary: binary.into(),
            builder: FfmpegCommandBuilder::new()
                .with_threads(threads)
                .with_progress_pipe(),
        }
    }

    pub fn builder(&self) -> &FfmpegCommandBuilder {
        &self.builder
    }

    /// Temporary file next to `output`, keeping its extension so ffmpeg
    /// infers the same container
    fn staging_file(output: &Path) -> Result<NamedTempFile, DomainError> {
        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let suffix = output
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        tempfile::Builder::new()
            .prefix(".perseus-render-")
            .suffix(&suffix)
            .tempfile_in(dir)
            .map_err(|e| {
                DomainError::RenderFailed(format!(
                    "Cannot create temporary output in {}: {}",
                    dir.display(),
                    e
                ))
            })
    }
}

#[async_trait]
impl RenderPort for FfmpegRenderAdapter {
    async fn render(
        &self,
        job: &RenderJob,
        progress: mpsc::UnboundedSender<f64>,
    ) -> Result<(), DomainError> {
        let staging = Self::staging_file(job.output())?;
        let args = self.builder.args_for(job, staging.path());
        info!(
            output = %job.output().display(),
            segments = job.segments.len(),
            duration = job.total_duration(),
            "Starting render"
        );
        debug!(binary = %self.binary.display(), ?args, "ffmpeg invocation");

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DomainError::RenderFailed(format!("Failed to spawn ffmpeg: {}", e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DomainError::RenderFailed("ffmpeg stdout unavailable".to_string()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| DomainError::RenderFailed("ffmpeg stderr unavailable".to_string()))?;

        // Drain stderr concurrently so a chatty encoder cannot fill the pipe
        let stderr_task = tokio::spawn(async move {
            let mut text = String::new();
            let _ = stderr.read_to_string(&mut text).await;
            text
        });

        let parser = FfmpegProgressParser::new(job.total_duration());
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await? {
            if let Some(percent) = parser.parse_line(&line) {
                // Receiver may be gone; the render still completes
                let _ = progress.send(clamp_percent(percent));
            }
        }

        let status = child.wait().await?;
        let stderr_text = stderr_task.await.unwrap_or_default();

        if !status.success() {
            let tail: Vec<&str> = stderr_text.lines().rev().take(5).collect();
            let reason = tail.into_iter().rev().collect::<Vec<_>>().join("\n");
            error!(%status, output = %job.output().display(), "Render failed");
            return Err(DomainError::RenderFailed(format!(
                "ffmpeg exited with {}: {}",
                status,
                reason.trim()
            )));
        }

        staging.persist(job.output()).map_err(|e| {
            DomainError::RenderFailed(format!(
                "Cannot move render into {}: {}",
                job.output().display(),
                e.error
            ))
        })?;

        let _ = progress.send(100.0);
        info!(output = %job.output().display(), "Render complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderSegment;
    use tempfile::TempDir;

    fn job(output: PathBuf) -> RenderJob {
        RenderJob {
            segments: vec![
                RenderSegment {
                    source_path: PathBuf::from("a.mp4"),
                    trim_start: 0.0,
                    trim_end: 4.0,
                    has_audio: true,
                },
                RenderSegment {
                    source_path: PathBuf::from("b.mp4"),
                    trim_start: 2.0,
                    trim_end: 8.0,
                    has_audio: true,
                },
            ],
            output,
        }
    }

    fn leftovers(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }

    #[test]
    fn test_staging_file_keeps_extension() {
        let dir = TempDir::new().unwrap();
        let staging = FfmpegRenderAdapter::staging_file(&dir.path().join("final.mov")).unwrap();
        let name = staging.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(".perseus-render-"));
        assert!(name.ends_with(".mov"));
        assert_eq!(staging.path().parent(), Some(dir.path()));
    }

    #[tokio::test]
    async fn test_spawn_failure_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let adapter = FfmpegRenderAdapter::new("/nonexistent/bin/ffmpeg", 1);
        let (tx, _rx) = mpsc::unbounded_channel();

        let result = adapter.render(&job(dir.path().join("out.mp4")), tx).await;
        assert!(matches!(result, Err(DomainError::RenderFailed(_))));
        assert!(leftovers(dir.path()).is_empty());
    }

    #[cfg(unix)]
    fn fake_ffmpeg(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-ffmpeg.sh");
        std::fs::write(&path, format!("#!/bin/sh\nfor last; do :; done\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_render_publishes_output() {
        let bin_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        let binary = fake_ffmpeg(
            bin_dir.path(),
            "echo out_time_ms=5000000\necho progress=continue\nprintf rendered > \"$last\"\necho progress=end",
        );
        let adapter = FfmpegRenderAdapter::new(binary, 2);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let output = out_dir.path().join("out.mp4");

        adapter.render(&job(output.clone()), tx).await.unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "rendered");
        assert_eq!(leftovers(out_dir.path()), vec![output]);

        let mut reported = Vec::new();
        while let Ok(percent) = rx.try_recv() {
            reported.push(percent);
        }
        assert_eq!(reported.first(), Some(&50.0));
        assert_eq!(reported.last(), Some(&100.0));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_render_discards_partial_output() {
        let bin_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        let binary = fake_ffmpeg(
            bin_dir.path(),
            "printf partial > \"$last\"\necho 'Invalid data found' >&2\nexit 1",
        );
        let adapter = FfmpegRenderAdapter::new(binary, 2);
        let (tx, _rx) = mpsc::unbounded_channel();

        let result = adapter.render(&job(out_dir.path().join("out.mp4")), tx).await;
        match result {
            Err(DomainError::RenderFailed(reason)) => assert!(reason.contains("Invalid data found")),
            other => panic!("expected render failure, got {:?}", other),
        }
        assert!(leftovers(out_dir.path()).is_empty());
    }
}
