//! # Drawing history
//!
//! A linear, capped list of snapshots with a cursor. `current_index == -1` is the state before the first
//! snapshot: the drawing as it was when the history was opened ([`DrawingHistory::base_image`]), or an
//! empty canvas if that isn't known. Writing after an undo throws away everything past the cursor; there
//! is no redo tree.

use super::{DrawingId, ProfileId};
use crate::io::Blob;

pub type HistoryId = crate::Id<DrawingHistory>;

#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingHistory {
    /// Same value as `drawing_id`. A drawing has exactly one history.
    pub id: HistoryId,
    pub profile_id: ProfileId,
    pub drawing_id: DrawingId,
    pub image_list: Vec<Blob>,
    /// Index into `image_list` of the displayed snapshot, `-1` for none.
    /// Always within `-1..image_list.len()`.
    pub current_index: i32,
    /// Shown at `current_index == -1`.
    #[serde(default)]
    pub base_image: Option<Blob>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
impl DrawingHistory {
    #[must_use]
    pub fn new(profile_id: ProfileId, drawing_id: DrawingId) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: drawing_id.cast(),
            profile_id,
            drawing_id,
            image_list: Vec::new(),
            current_index: -1,
            base_image: None,
            created_at: now,
            updated_at: now,
        }
    }
    /// The cursor as an index, or `None` for the empty canvas.
    #[must_use]
    pub fn current(&self) -> Option<usize> {
        usize::try_from(self.current_index).ok()
    }
    #[must_use]
    pub fn current_image(&self) -> Option<&Blob> {
        self.image_list.get(self.current()?)
    }
    /// What the canvas should show at the cursor: the current snapshot, else the base image.
    #[must_use]
    pub fn restore_image(&self) -> Option<&Blob> {
        self.current_image().or(self.base_image.as_ref())
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.image_list.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.image_list.is_empty()
    }
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.current_index >= 0
    }
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.next().is_some()
    }
    /// Index redo would move to, if any.
    fn next(&self) -> Option<usize> {
        let next = self.current().map_or(0, |current| current + 1);
        (next < self.image_list.len()).then_some(next)
    }
    fn set_current(&mut self, index: Option<usize>) {
        self.current_index = index
            .and_then(|index| i32::try_from(index).ok())
            .unwrap_or(-1);
    }
    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now();
    }
    /// Append a snapshot after the cursor, discarding any redo tail, then evict from the front
    /// until at most `max_len` entries remain. The cursor ends on the new snapshot.
    pub fn push(&mut self, snapshot: Blob, max_len: usize) {
        // A zero cap would make the pushed snapshot vanish immediately.
        let max_len = max_len.max(1);
        let keep = self.current().map_or(0, |current| current + 1);
        self.image_list.truncate(keep);
        self.image_list.push(snapshot);
        let excess = self.image_list.len().saturating_sub(max_len);
        if excess > 0 {
            self.image_list.drain(..excess);
        }
        self.set_current(self.image_list.len().checked_sub(1));
        self.touch();
    }
    /// Step the cursor back. Stepping back from the first snapshot lands on the empty canvas.
    /// Returns `false` if already at the empty canvas.
    pub fn undo(&mut self) -> bool {
        let Some(current) = self.current() else {
            return false;
        };
        self.set_current(current.checked_sub(1));
        self.touch();
        true
    }
    /// Step the cursor forward. Returns `false` if already at the newest snapshot.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.next() else {
            return false;
        };
        self.set_current(Some(next));
        self.touch();
        true
    }
    /// Drop every snapshot. Returns `false` if there was nothing to drop.
    pub fn clear(&mut self) -> bool {
        if self.image_list.is_empty() && self.current_index == -1 {
            return false;
        }
        self.image_list.clear();
        self.current_index = -1;
        self.touch();
        true
    }
    /// Replace the image shown before the first snapshot. Returns `false` if it was already `base`.
    pub fn set_base(&mut self, base: Option<Blob>) -> bool {
        if self.base_image == base {
            return false;
        }
        self.base_image = base;
        self.touch();
        true
    }
    /// Pull an out-of-range cursor (from a damaged or hand-edited record) back into range.
    /// Returns `true` if anything changed.
    pub fn repair(&mut self) -> bool {
        let last = self
            .image_list
            .len()
            .checked_sub(1)
            .and_then(|last| i32::try_from(last).ok())
            .unwrap_or(-1);
        let clamped = self.current_index.clamp(-1, last);
        let changed = clamped != self.current_index;
        self.current_index = clamped;
        changed
    }
}
