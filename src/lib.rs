//! Perseus video editor core
//!
//! An in-memory timeline of trimmed clips over source media files, an edit
//! store that keeps every clip's range valid across trims, splits and
//! reorders, a playback synchroniser for the preview engine, and a render
//! pipeline that concatenates the timeline through ffmpeg.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod playback;
pub mod ports;
pub mod render;
pub mod utils;

// Re-export commonly used types
pub use config::EditorConfig;
pub use domain::errors::{DomainError, DomainResult};
pub use domain::model::{BoundsUpdate, Clip, ClipId, ImportedMedia, MediaMetadata, Notification, NotificationKind};
pub use domain::store::EditStore;
pub use playback::{PlaybackSync, SyncState};
pub use render::{ExportScope, RenderJob, RenderRequestBuilder, RenderSegment};
