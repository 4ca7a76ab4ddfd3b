// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::rules::BoundsClamp;

/// Opaque clip identifier, unique across the timeline for the clip's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(Uuid);

impl ClipId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Encoded preview image (thumbnail or waveform strip)
///
/// The bytes are shared, so both halves of a split point at the same buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewImage {
    format: &'static str,
    bytes: Arc<[u8]>,
}

impl PreviewImage {
    /// Wrap PNG-encoded bytes; empty input yields no image
    pub fn png(bytes: Vec<u8>) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }
        Some(Self {
            format: "png",
            bytes: bytes.into(),
        })
    }

    pub fn format(&self) -> &str {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Serialize for PreviewImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PreviewImage", 2)?;
        state.serialize_field("format", self.format)?;
        state.serialize_field("bytes", &self.bytes.len())?;
        state.end()
    }
}

/// Metadata reported by the probe service for one source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    /// Total duration in seconds
    pub duration: f64,
    /// Container format name as reported by the prober
    pub format: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub has_audio: bool,
}

/// Everything the import path gathered about one source file
#[derive(Debug, Clone)]
pub struct ImportedMedia {
    pub path: PathBuf,
    /// Display label; derived from the path when absent
    pub name: Option<String>,
    pub duration: f64,
    pub has_audio: bool,
    pub thumbnail: Option<PreviewImage>,
    pub waveform: Option<PreviewImage>,
}

impl ImportedMedia {
    /// Descriptor with no preview artifacts and an audio track assumed
    pub fn new(path: impl Into<PathBuf>, duration: f64) -> Self {
        Self {
            path: path.into(),
            name: None,
            duration,
            has_audio: true,
            thumbnail: None,
            waveform: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_audio(mut self, has_audio: bool) -> Self {
        self.has_audio = has_audio;
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: Option<PreviewImage>) -> Self {
        self.thumbnail = thumbnail;
        self
    }

    pub fn with_waveform(mut self, waveform: Option<PreviewImage>) -> Self {
        self.waveform = waveform;
        self
    }
}

/// Requested change to a clip's trim bounds; absent fields are left alone
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundsUpdate {
    pub start: Option<f64>,
    pub end: Option<f64>,
}

impl BoundsUpdate {
    pub fn start(start: f64) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    pub fn end(end: f64) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    pub fn both(start: f64, end: f64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Portion of the full-source waveform image covered by a clip, as fractions
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaveformWindow {
    pub offset: f64,
    pub width: f64,
}

/// One trimmed reference `[start, end)` into a source media file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clip {
    id: ClipId,
    path: PathBuf,
    name: String,
    source_duration: f64,
    start: f64,
    end: f64,
    duration: f64,
    has_audio: bool,
    thumbnail: Option<PreviewImage>,
    waveform: Option<PreviewImage>,
}

impl Clip {
    /// Create a clip spanning the whole source
    pub fn create(media: ImportedMedia) -> DomainResult<Self> {
        if !media.duration.is_finite() || media.duration <= 0.0 {
            return Err(DomainError::InvalidDuration(media.duration));
        }

        let name = media
            .name
            .unwrap_or_else(|| display_name_for(&media.path));

        Ok(Self {
            id: ClipId::new(),
            path: media.path,
            name,
            source_duration: media.duration,
            start: 0.0,
            end: media.duration,
            duration: media.duration,
            has_audio: media.has_audio,
            thumbnail: media.thumbnail,
            waveform: media.waveform,
        })
    }

    pub fn id(&self) -> ClipId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_duration(&self) -> f64 {
        self.source_duration
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Always `end - start`
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn has_audio(&self) -> bool {
        self.has_audio
    }

    pub fn thumbnail(&self) -> Option<&PreviewImage> {
        self.thumbnail.as_ref()
    }

    pub fn waveform(&self) -> Option<&PreviewImage> {
        self.waveform.as_ref()
    }

    /// Whether an absolute source time falls inside `[start, end)`
    pub fn contains(&self, source_time: f64) -> bool {
        source_time >= self.start && source_time < self.end
    }

    /// Apply new trim bounds, silently clamped to keep the clip valid
    pub fn set_bounds(&mut self, update: BoundsUpdate) {
        let (start, end) = BoundsClamp::resolve(
            self.start,
            self.end,
            self.source_duration,
            update.start,
            update.end,
        );
        self.start = start;
        self.end = end;
        self.recompute_duration();
    }

    /// Slice of the import-time waveform that lines up with the trimmed range
    pub fn waveform_window(&self) -> WaveformWindow {
        WaveformWindow {
            offset: self.start / self.source_duration,
            width: self.duration / self.source_duration,
        }
    }

    /// Cut at an absolute source time, keeping `[start, at)` and returning `[at, end)`
    ///
    /// Callers validate `at` against the guard band first.
    pub(crate) fn split_off(&mut self, at: f64) -> Clip {
        let mut second = self.clone();
        second.id = ClipId::new();
        second.name = format!("{} (Part 2)", self.name);
        second.start = at;
        second.recompute_duration();

        self.end = at;
        self.recompute_duration();

        second
    }

    fn recompute_duration(&mut self) {
        self.duration = self.end - self.start;
    }
}

/// Display label for a source path: its final component, or "Unknown"
pub fn display_name_for(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Notification kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient user-facing message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    /// Whether the message has outlived its display interval
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now - self.raised_at >= ttl
    }
}

#[cfg(test)]
mod tests;
