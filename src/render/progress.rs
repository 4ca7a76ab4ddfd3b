//! Render progress reporting

use std::path::Path;

/// Progress callback trait for UI integration
pub trait ProgressCallback: Send + Sync {
    /// Called when the render starts
    fn on_start(&self, total_seconds: f64);

    /// Called with a percentage in `0.0..=100.0`
    fn on_progress(&self, percent: f64);

    /// Called when the output has been published
    fn on_complete(&self, output: &Path);

    /// Called when the render fails
    fn on_error(&self, error: &str);
}

/// Callback that ignores every event
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_start(&self, _total_seconds: f64) {}
    fn on_progress(&self, _percent: f64) {}
    fn on_complete(&self, _output: &Path) {}
    fn on_error(&self, _error: &str) {}
}

/// Clamp a service-reported value into a displayable percentage
pub fn clamp_percent(raw: f64) -> f64 {
    if raw.is_finite() {
        raw.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Drops progress reports that would not change the displayed whole percent
#[derive(Debug, Default)]
pub struct ProgressTracker {
    last_reported: Option<u8>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamped percentage if it moves the display, `None` otherwise
    pub fn update(&mut self, raw: f64) -> Option<f64> {
        let percent = clamp_percent(raw);
        let whole = percent.floor() as u8;
        if self.last_reported == Some(whole) {
            return None;
        }
        self.last_reported = Some(whole);
        Some(percent)
    }
}

/// Parser for ffmpeg's `-progress` key=value stream
#[derive(Debug, Clone)]
pub struct FfmpegProgressParser {
    total_seconds: f64,
}

impl FfmpegProgressParser {
    pub fn new(total_seconds: f64) -> Self {
        Self { total_seconds }
    }

    /// Percentage carried by one progress line, if any
    ///
    /// `out_time_ms` and `out_time_us` both count microseconds.
    pub fn parse_line(&self, line: &str) -> Option<f64> {
        let (key, value) = line.trim().split_once('=')?;
        match key {
            "out_time_us" | "out_time_ms" => {
                let micros: f64 = value.trim().parse().ok()?;
                if self.total_seconds <= 0.0 {
                    return None;
                }
                Some(micros / 1_000_000.0 / self.total_seconds * 100.0)
            }
            "progress" if value.trim() == "end" => Some(100.0),
            _ => None,
        }
    }
}
