//! Editor configuration
//!
//! Values resolve in order of precedence: CLI flags, `PERSEUS_*` environment
//! variables, the TOML file, then the defaults below.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};
use crate::utils::logging::LogFormat;

pub mod loader;

pub use loader::{ConfigLoader, ConfigOverrides};

/// Complete editor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub tools: ToolsConfig,
    pub import: ImportConfig,
    pub preview: PreviewConfig,
    pub render: RenderConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

/// Locations of the external media binaries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
    /// Root of bundled binaries laid out as `ffmpeg-<platform>/<binary>`
    pub resources_dir: Option<PathBuf>,
}

impl ToolsConfig {
    pub fn ffmpeg(&self) -> PathBuf {
        self.resolve(self.ffmpeg_path.as_ref(), "ffmpeg")
    }

    pub fn ffprobe(&self) -> PathBuf {
        self.resolve(self.ffprobe_path.as_ref(), "ffprobe")
    }

    fn resolve(&self, explicit: Option<&PathBuf>, binary: &str) -> PathBuf {
        if let Some(path) = explicit {
            return path.clone();
        }

        let file_name = if cfg!(windows) {
            format!("{binary}.exe")
        } else {
            binary.to_string()
        };

        match &self.resources_dir {
            Some(dir) => dir.join(format!("ffmpeg-{}", platform_folder())).join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

fn platform_folder() -> &'static str {
    if cfg!(target_os = "macos") {
        "mac"
    } else if cfg!(windows) {
        "win"
    } else {
        "linux"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Duration assumed when probing a file fails, in seconds
    pub default_duration: f64,
    pub generate_previews: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_duration: 10.0,
            generate_previews: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
    /// Source time of the thumbnail frame, in seconds
    pub thumbnail_timemark: f64,
    pub waveform_width: u32,
    pub waveform_height: u32,
    pub waveform_color: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            thumbnail_width: 320,
            thumbnail_height: 180,
            thumbnail_timemark: 1.0,
            waveform_width: 2048,
            waveform_height: 120,
            waveform_color: "#0ea5e9".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub threads: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            threads: num_cpus::get(),
        }
    }
}

/// Upper bound for `ui.notification_timeout_secs`
pub const MAX_NOTIFICATION_TIMEOUT_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub notification_timeout_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notification_timeout_secs: 3,
        }
    }
}

impl UiConfig {
    /// Notification lifetime; saturates instead of overflowing
    pub fn notification_ttl(&self) -> chrono::Duration {
        i64::try_from(self.notification_timeout_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl EditorConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> DomainResult<Self> {
        toml::from_str(content)
            .map_err(|e| DomainError::Config(format!("Failed to parse TOML config: {}", e)))
    }

    pub fn to_toml_string(&self) -> DomainResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| DomainError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Validate configuration
    pub fn validate(&self) -> DomainResult<()> {
        let duration = self.import.default_duration;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(DomainError::Config(format!(
                "import.default_duration must be positive, got {}",
                duration
            )));
        }

        let preview = &self.preview;
        if preview.thumbnail_width == 0
            || preview.thumbnail_height == 0
            || preview.waveform_width == 0
            || preview.waveform_height == 0
        {
            return Err(DomainError::Config(
                "Preview dimensions cannot be zero".to_string(),
            ));
        }
        if !preview.thumbnail_timemark.is_finite() || preview.thumbnail_timemark < 0.0 {
            return Err(DomainError::Config(
                "preview.thumbnail_timemark must be a non-negative number".to_string(),
            ));
        }

        if self.ui.notification_timeout_secs > MAX_NOTIFICATION_TIMEOUT_SECS {
            return Err(DomainError::Config(format!(
                "ui.notification_timeout_secs must be at most {}, got {}",
                MAX_NOTIFICATION_TIMEOUT_SECS, self.ui.notification_timeout_secs
            )));
        }

        if self.render.threads == 0 {
            return Err(DomainError::Config(
                "render.threads must be at least 1".to_string(),
            ));
        }

        self.logging
            .level
            .parse::<tracing::Level>()
            .map_err(|_| {
                DomainError::Config(format!(
                    "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                    self.logging.level
                ))
            })?;

        Ok(())
    }
}
