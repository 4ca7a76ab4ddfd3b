// Clock playback engine - headless engine advanced by explicit ticks

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::ports::PlaybackEngine;

/// Playback engine with no decoder behind it
///
/// The position only moves when [`ClockPlaybackEngine::advance`] is called
/// while playing, which makes frame timing fully deterministic.
#[derive(Debug, Clone, Default)]
pub struct ClockPlaybackEngine {
    position: f64,
    playing: bool,
    source: Option<PathBuf>,
}

impl ClockPlaybackEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Move the playhead forward by `seconds` if playing; returns the new position
    pub fn advance(&mut self, seconds: f64) -> f64 {
        if self.playing && self.source.is_some() && seconds.is_finite() && seconds > 0.0 {
            self.position += seconds;
            trace!(position = self.position, "Engine tick");
        }
        self.position
    }
}

impl PlaybackEngine for ClockPlaybackEngine {
    fn position(&self) -> f64 {
        self.position
    }

    fn seek(&mut self, position: f64) {
        if position.is_finite() {
            self.position = position.max(0.0);
        }
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn load(&mut self, path: &Path) {
        self.source = Some(path.to_path_buf());
        self.position = 0.0;
        self.playing = false;
    }
}
