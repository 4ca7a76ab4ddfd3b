//! Playback synchronisation between the preview engine and the edit store
//!
//! Two clocks advance independently: the engine's position (absolute source
//! time, updated every frame) and the store's cursor (relative to the active
//! clip's trimmed start). [`PlaybackSync`] reconciles them without letting an
//! update in one direction echo back as a new update in the other.

use std::path::PathBuf;

use tracing::debug;

use crate::domain::model::ClipId;
use crate::domain::store::EditStore;
use crate::ports::PlaybackEngine;

/// Minimum cursor movement pushed from the engine into the store
pub const ENGINE_TICK_THRESHOLD: f64 = 0.05;

/// Store changes closer than this to the last engine push are echoes
pub const ECHO_THRESHOLD: f64 = 0.1;

/// Minimum engine/store discrepancy that warrants a seek
pub const SEEK_THRESHOLD: f64 = 0.2;

/// Who last moved the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No update in flight
    Idle,
    /// The last cursor change came from the engine
    EngineDriven,
    /// A scrub gesture owns the cursor; automatic sync is suspended
    UserSeeking,
}

/// Clip the engine is currently bound to
#[derive(Debug, Clone, PartialEq)]
struct Binding {
    clip_id: ClipId,
    path: PathBuf,
    start: f64,
}

/// Reconciles the engine position with the store cursor
#[derive(Debug)]
pub struct PlaybackSync {
    state: SyncState,
    last_pushed: f64,
    binding: Option<Binding>,
    engine_playing: bool,
}

impl Default for PlaybackSync {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackSync {
    pub fn new() -> Self {
        Self {
            state: SyncState::Idle,
            last_pushed: 0.0,
            binding: None,
            engine_playing: false,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Last relative time pushed from the engine into the store
    pub fn last_pushed(&self) -> f64 {
        self.last_pushed
    }

    /// Bring the engine in line with the store after any store mutation
    pub fn reconcile(&mut self, store: &mut EditStore, engine: &mut dyn PlaybackEngine) {
        let current = store.active_clip().map(|clip| Binding {
            clip_id: clip.id(),
            path: clip.path().to_path_buf(),
            start: clip.start(),
        });

        if current != self.binding {
            self.on_active_clip_changed(store, engine);
        }

        self.sync_transport(store, engine);
        self.on_store_time_changed(store, engine);
    }

    /// Engine reported a new position
    pub fn on_engine_position(&mut self, store: &mut EditStore, engine: &mut dyn PlaybackEngine) {
        if self.state == SyncState::UserSeeking {
            return;
        }
        let Some(clip) = store.active_clip() else {
            return;
        };

        let position = engine.position();
        let start = clip.start();

        if !clip.contains(position) {
            debug!(position, start, end = clip.end(), "Playback left clip range, rewinding");
            store.set_playing(false);
            store.set_current_time(0.0);
            engine.pause();
            engine.seek(start);
            self.engine_playing = false;
            self.last_pushed = 0.0;
            self.state = SyncState::Idle;
            return;
        }

        let relative = position - start;
        if (relative - self.last_pushed).abs() > ENGINE_TICK_THRESHOLD {
            store.set_current_time(relative);
            self.last_pushed = store.current_time();
            self.state = SyncState::EngineDriven;
        }
    }

    /// Store cursor changed; seek the engine unless the change is an echo
    pub fn on_store_time_changed(&mut self, store: &EditStore, engine: &mut dyn PlaybackEngine) {
        if self.state == SyncState::UserSeeking {
            return;
        }
        let Some(clip) = store.active_clip() else {
            return;
        };

        let current = store.current_time();
        if (current - self.last_pushed).abs() < ECHO_THRESHOLD {
            return;
        }

        let target = clip.start() + current;
        if (engine.position() - target).abs() > SEEK_THRESHOLD {
            debug!(target, position = engine.position(), "Seeking engine to store cursor");
            engine.seek(target);
        }
        self.last_pushed = current;
        self.state = SyncState::Idle;
    }

    /// Scrub gesture started
    pub fn begin_scrub(&mut self) {
        self.state = SyncState::UserSeeking;
    }

    /// Scrub gesture moved the cursor to `relative` seconds
    pub fn scrub_to(&mut self, store: &mut EditStore, engine: &mut dyn PlaybackEngine, relative: f64) {
        store.set_current_time(relative);
        if let Some(clip) = store.active_clip() {
            engine.seek(clip.start() + store.current_time());
            self.last_pushed = store.current_time();
        }
    }

    /// Scrub gesture ended; the store cursor is authoritative
    pub fn end_scrub(&mut self, store: &EditStore, engine: &mut dyn PlaybackEngine) {
        self.state = SyncState::Idle;
        if let Some(clip) = store.active_clip() {
            engine.seek(clip.start() + store.current_time());
            self.last_pushed = store.current_time();
        }
    }

    /// Selection changed: reload if the source differs, rewind and stop
    pub fn on_active_clip_changed(&mut self, store: &mut EditStore, engine: &mut dyn PlaybackEngine) {
        store.set_playing(false);
        engine.pause();
        self.engine_playing = false;
        self.last_pushed = 0.0;
        self.state = SyncState::Idle;

        let Some(clip) = store.active_clip() else {
            self.binding = None;
            return;
        };

        let binding = Binding {
            clip_id: clip.id(),
            path: clip.path().to_path_buf(),
            start: clip.start(),
        };

        let same_source = self
            .binding
            .as_ref()
            .is_some_and(|previous| previous.path == binding.path);
        if !same_source {
            debug!(path = %binding.path.display(), "Loading source into playback engine");
            engine.load(&binding.path);
        }

        engine.seek(binding.start);
        self.binding = Some(binding);
        store.set_current_time(0.0);
    }

    /// Mirror the store's play/pause state onto the engine
    fn sync_transport(&mut self, store: &EditStore, engine: &mut dyn PlaybackEngine) {
        if store.is_playing() == self.engine_playing {
            return;
        }
        if store.is_playing() {
            engine.play();
        } else {
            engine.pause();
        }
        self.engine_playing = store.is_playing();
    }
}
