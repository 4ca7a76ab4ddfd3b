// Edit store - Single source of truth for the timeline and transport state

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::errors::DomainResult;
use crate::domain::model::*;
use crate::domain::rules::{CursorRule, ReorderRule, SplitRule};

/// Ordered clip collection plus selection, playback cursor and notification
///
/// Every mutation runs to completion before returning and leaves the clip
/// invariants intact. Rejected edits leave the store untouched.
#[derive(Debug, Default)]
pub struct EditStore {
    clips: Vec<Clip>,
    active_clip_id: Option<ClipId>,
    current_time: f64,
    is_playing: bool,
    notification: Option<Notification>,
}

impl EditStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Queries

    /// Clips in timeline and export order
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|clip| clip.id() == id)
    }

    pub fn index_of(&self, id: ClipId) -> Option<usize> {
        self.clips.iter().position(|clip| clip.id() == id)
    }

    pub fn active_clip_id(&self) -> Option<ClipId> {
        self.active_clip_id
    }

    pub fn active_clip(&self) -> Option<&Clip> {
        self.active_clip_id.and_then(|id| self.clip(id))
    }

    /// Playback cursor, relative to the active clip's trimmed start
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Sum of all trimmed clip durations
    pub fn total_duration(&self) -> f64 {
        self.clips.iter().map(Clip::duration).sum()
    }

    // Structural edits

    /// Append a clip for freshly imported media; selection is unchanged
    pub fn add_clip(&mut self, media: ImportedMedia) -> DomainResult<ClipId> {
        let clip = Clip::create(media)?;
        let id = clip.id();
        info!(clip_id = %id, name = clip.name(), duration = clip.duration(), "Clip added");
        self.clips.push(clip);
        Ok(id)
    }

    /// Delete a clip; clears the selection if it was active
    pub fn remove_clip(&mut self, id: ClipId) -> bool {
        let Some(index) = self.index_of(id) else {
            debug!(clip_id = %id, "Remove ignored: clip not found");
            return false;
        };

        self.clips.remove(index);
        if self.active_clip_id == Some(id) {
            self.active_clip_id = None;
        }
        info!(clip_id = %id, "Clip removed");
        true
    }

    /// Change the selection and restart the local transport
    ///
    /// An id that names no clip clears the selection.
    pub fn set_active_clip(&mut self, id: Option<ClipId>) {
        self.active_clip_id = id.filter(|id| self.index_of(*id).is_some());
        self.current_time = 0.0;
        self.is_playing = false;
    }

    /// Move the clip at `from` to position `to`, shifting the others
    pub fn reorder_clips(&mut self, from: usize, to: usize) -> bool {
        if !ReorderRule::is_valid(self.clips.len(), from, to) {
            debug!(from, to, len = self.clips.len(), "Reorder ignored: index out of bounds");
            return false;
        }

        let clip = self.clips.remove(from);
        self.clips.insert(to, clip);
        true
    }

    /// Trim a clip; requests are clamped, never rejected
    pub fn update_clip(&mut self, id: ClipId, update: BoundsUpdate) -> bool {
        let Some(clip) = self.clips.iter_mut().find(|clip| clip.id() == id) else {
            debug!(clip_id = %id, "Trim ignored: clip not found");
            return false;
        };

        clip.set_bounds(update);
        let duration = clip.duration();

        if self.active_clip_id == Some(id) {
            self.current_time = CursorRule::clamp(self.current_time, duration);
        }
        true
    }

    /// Split a clip at `relative_time` seconds into its trimmed range
    ///
    /// Returns the id of the new second part, or `None` when the split was
    /// rejected and the timeline is unchanged.
    pub fn split_clip(&mut self, id: ClipId, relative_time: f64) -> Option<ClipId> {
        let Some(index) = self.index_of(id) else {
            debug!(clip_id = %id, "Split ignored: clip not found");
            return None;
        };

        let clip = &mut self.clips[index];
        let Some(at) = SplitRule::split_point(clip.start(), clip.end(), relative_time) else {
            debug!(
                clip_id = %id,
                relative_time,
                start = clip.start(),
                end = clip.end(),
                "Split ignored: split point too close to start or end"
            );
            return None;
        };

        let second = clip.split_off(at);
        let second_id = second.id();
        self.clips.insert(index + 1, second);

        if self.active_clip_id == Some(id) {
            let duration = self.clips[index].duration();
            self.current_time = CursorRule::clamp(self.current_time, duration);
        }

        info!(clip_id = %id, new_clip_id = %second_id, at, "Clip split");
        Some(second_id)
    }

    // Transport

    /// Move the playback cursor, clamped to the active clip's duration
    pub fn set_current_time(&mut self, time: f64) {
        self.current_time = match self.active_clip() {
            Some(clip) => CursorRule::clamp(time, clip.duration()),
            None => 0.0,
        };
    }

    /// Start or stop playback; playing requires an active clip
    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing && self.active_clip().is_some();
    }

    pub fn toggle_playing(&mut self) {
        self.set_playing(!self.is_playing);
    }

    // Notifications

    pub fn notify(&mut self, notification: Notification) {
        info!(kind = ?notification.kind, text = %notification.message, "Notification raised");
        self.notification = Some(notification);
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// Clear the notification once it has been shown for `ttl`
    pub fn expire_notification(&mut self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        let expired = self
            .notification
            .as_ref()
            .is_some_and(|notification| notification.is_expired(now, ttl));
        if expired {
            self.notification = None;
        }
        expired
    }
}
