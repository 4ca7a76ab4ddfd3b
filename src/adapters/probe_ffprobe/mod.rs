//! FFprobe adapter for media file probing
//!
//! Runs the `ffprobe` binary and reads its JSON report.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// FFprobe-based probe adapter
pub struct FfprobeAdapter {
    binary: PathBuf,
}

impl FfprobeAdapter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProbeReport {
    #[serde(default)]
    format: Option<ProbeFormat>,
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    #[serde(default)]
    format_name: Option<String>,
    #[serde(default)]
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    codec_type: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    duration: Option<String>,
}

/// Interpret an ffprobe JSON report
pub fn parse_probe_output(json: &str) -> Result<MediaMetadata, DomainError> {
    let report: ProbeReport = serde_json::from_str(json)
        .map_err(|e| DomainError::ProbeFailed(format!("Unreadable ffprobe output: {}", e)))?;

    let video = report
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));
    let has_audio = report
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    // Container duration first, then the longest stream duration
    let format_duration = report
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok());
    let stream_duration = report
        .streams
        .iter()
        .filter_map(|s| s.duration.as_deref()?.parse::<f64>().ok())
        .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.max(d))));

    let duration = format_duration
        .or(stream_duration)
        .ok_or_else(|| DomainError::ProbeFailed("No duration reported".to_string()))?;

    Ok(MediaMetadata {
        duration,
        format: report
            .format
            .and_then(|f| f.format_name)
            .unwrap_or_else(|| "unknown".to_string()),
        width: video.and_then(|v| v.width),
        height: video.and_then(|v| v.height),
        has_audio,
    })
}

#[async_trait]
impl ProbePort for FfprobeAdapter {
    async fn probe(&self, path: &Path) -> Result<MediaMetadata, DomainError> {
        debug!(path = %path.display(), binary = %self.binary.display(), "Probing media");

        let output = Command::new(&self.binary)
            .args(["-v", "error", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(path)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DomainError::ProbeFailed(format!("Failed to run ffprobe: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DomainError::ProbeFailed(format!(
                "ffprobe exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        parse_probe_output(&String::from_utf8_lossy(&output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_report() {
        let json = r#"{
            "streams": [
                {"codec_type": "video", "width": 1920, "height": 1080, "duration": "12.000000"},
                {"codec_type": "audio", "duration": "12.010000"}
            ],
            "format": {"format_name": "mov,mp4,m4a,3gp,3g2,mj2", "duration": "12.034000"}
        }"#;

        let meta = parse_probe_output(json).unwrap();
        assert_eq!(meta.duration, 12.034);
        assert_eq!(meta.width, Some(1920));
        assert_eq!(meta.height, Some(1080));
        assert!(meta.has_audio);
        assert!(meta.format.starts_with("mov"));
    }

    #[test]
    fn test_stream_duration_fallback() {
        let json = r#"{"streams": [{"codec_type": "video", "duration": "4.5"}, {"codec_type": "video", "duration": "6.0"}], "format": {}}"#;
        let meta = parse_probe_output(json).unwrap();
        assert_eq!(meta.duration, 6.0);
        assert!(!meta.has_audio);
        assert_eq!(meta.format, "unknown");
    }

    #[test]
    fn test_missing_duration_fails() {
        let json = r#"{"streams": [], "format": {"format_name": "png_pipe"}}"#;
        assert!(matches!(parse_probe_output(json), Err(DomainError::ProbeFailed(_))));
        assert!(parse_probe_output("not json").is_err());
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_probe_failure() {
        let adapter = FfprobeAdapter::new("/nonexistent/bin/ffprobe");
        let result = adapter.probe(Path::new("clip.mp4")).await;
        assert!(matches!(result, Err(DomainError::ProbeFailed(_))));
    }
}
