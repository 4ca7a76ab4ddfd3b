//! Configuration hierarchy: defaults < file < environment < CLI

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::EditorConfig;
use crate::domain::errors::{DomainError, DomainResult};
use crate::utils::logging::LogFormat;

/// File looked up in the working directory when none is named
pub const DEFAULT_CONFIG_FILE: &str = "perseus.toml";

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "PERSEUS_CONFIG";

/// Values given on the command line; `None` leaves the lower layers in place
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
    pub default_duration: Option<f64>,
    pub no_previews: bool,
}

/// Resolves an [`EditorConfig`] from every configuration layer
pub struct ConfigLoader<F>
where
    F: Fn(&str) -> Option<String>,
{
    env: F,
}

impl ConfigLoader<fn(&str) -> Option<String>> {
    /// Loader reading the process environment
    pub fn from_process_env() -> Self {
        Self { env: process_env }
    }
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

impl<F> ConfigLoader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Loader reading variables through `env`
    pub fn with_env(env: F) -> Self {
        Self { env }
    }

    /// Resolve the full hierarchy and validate the result
    pub fn load(
        &self,
        explicit_file: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> DomainResult<EditorConfig> {
        let mut config = self.load_file(explicit_file)?;
        self.apply_env(&mut config)?;
        apply_overrides(&mut config, overrides);
        config.validate()?;
        Ok(config)
    }

    fn load_file(&self, explicit_file: Option<&Path>) -> DomainResult<EditorConfig> {
        let named = explicit_file
            .map(Path::to_path_buf)
            .or_else(|| (self.env)(CONFIG_ENV_VAR).map(PathBuf::from));

        let (path, required) = match named {
            Some(path) => (path, true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !path.exists() {
            if required {
                return Err(DomainError::Config(format!(
                    "Config file does not exist: {}",
                    path.display()
                )));
            }
            debug!("No config file found, using defaults");
            return Ok(EditorConfig::default());
        }

        info!(path = %path.display(), "Loading configuration");
        let content = std::fs::read_to_string(&path).map_err(|e| {
            DomainError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        EditorConfig::from_toml_str(&content)
    }

    fn apply_env(&self, config: &mut EditorConfig) -> DomainResult<()> {
        let mut applied = 0;

        if let Some(value) = (self.env)("PERSEUS_FFMPEG") {
            config.tools.ffmpeg_path = Some(PathBuf::from(value));
            applied += 1;
        }
        if let Some(value) = (self.env)("PERSEUS_FFPROBE") {
            config.tools.ffprobe_path = Some(PathBuf::from(value));
            applied += 1;
        }
        if let Some(value) = (self.env)("PERSEUS_RESOURCES_DIR") {
            config.tools.resources_dir = Some(PathBuf::from(value));
            applied += 1;
        }
        if let Some(value) = (self.env)("PERSEUS_DEFAULT_DURATION") {
            config.import.default_duration = parse_env("PERSEUS_DEFAULT_DURATION", &value)?;
            applied += 1;
        }
        if let Some(value) = (self.env)("PERSEUS_GENERATE_PREVIEWS") {
            config.import.generate_previews = parse_env("PERSEUS_GENERATE_PREVIEWS", &value)?;
            applied += 1;
        }
        if let Some(value) = (self.env)("PERSEUS_THREADS") {
            config.render.threads = parse_env("PERSEUS_THREADS", &value)?;
            applied += 1;
        }
        if let Some(value) = (self.env)("PERSEUS_NOTIFICATION_TIMEOUT") {
            config.ui.notification_timeout_secs = parse_env("PERSEUS_NOTIFICATION_TIMEOUT", &value)?;
            applied += 1;
        }
        if let Some(value) = (self.env)("PERSEUS_LOG_LEVEL") {
            config.logging.level = value;
            applied += 1;
        }
        if let Some(value) = (self.env)("PERSEUS_LOG_FORMAT") {
            config.logging.format = parse_env("PERSEUS_LOG_FORMAT", &value)?;
            applied += 1;
        }

        if applied > 0 {
            debug!(count = applied, "Applied environment overrides");
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> DomainResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DomainError::Config(format!("Invalid value for {}: {}", key, value)))
}

fn apply_overrides(config: &mut EditorConfig, overrides: &ConfigOverrides) {
    if let Some(level) = &overrides.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = overrides.log_format {
        config.logging.format = format;
    }
    if let Some(path) = &overrides.ffmpeg_path {
        config.tools.ffmpeg_path = Some(path.clone());
    }
    if let Some(path) = &overrides.ffprobe_path {
        config.tools.ffprobe_path = Some(path.clone());
    }
    if let Some(duration) = overrides.default_duration {
        config.import.default_duration = duration;
    }
    if overrides.no_previews {
        config.import.generate_previews = false;
    }
}
