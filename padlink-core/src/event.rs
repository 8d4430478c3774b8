//! Raw multi-touch events as the platform delivers them.
//!
//! A [`TouchEvent`] is one snapshot of every pointer currently on the
//! screen plus the action that produced it. For down/up actions the
//! `action_index` names which entry of `pointers` changed.

use serde::{Deserialize, Serialize};

// ── TouchAction ──────────────────────────────────────────────────

/// Masked touch action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchAction {
    /// First pointer went down.
    Down,
    /// An additional pointer went down.
    PointerDown,
    /// One or more pointers moved.
    Move,
    /// Last pointer went up.
    Up,
    /// A non-last pointer went up.
    PointerUp,
    /// The gesture was aborted by the platform.
    Cancel,
}

impl TouchAction {
    /// `true` for `Down` and `PointerDown`.
    pub fn is_down(self) -> bool {
        matches!(self, Self::Down | Self::PointerDown)
    }

    /// `true` for `Up` and `PointerUp`.
    pub fn is_up(self) -> bool {
        matches!(self, Self::Up | Self::PointerUp)
    }
}

// ── TouchPointer ─────────────────────────────────────────────────

/// One pointer inside a touch event, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPointer {
    /// Platform pointer id. Recycled unpredictably across gestures.
    pub id: i32,
    pub x: f32,
    pub y: f32,
}

impl TouchPointer {
    pub fn new(id: i32, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

// ── TouchEvent ───────────────────────────────────────────────────

/// A multi-touch event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub action: TouchAction,
    /// Index into `pointers` of the pointer the action refers to.
    #[serde(default)]
    pub action_index: usize,
    /// Every pointer still on the screen.
    pub pointers: Vec<TouchPointer>,
    /// Event time in milliseconds on the platform's monotonic clock.
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl TouchEvent {
    /// Create an event whose action refers to `pointers[action_index]`.
    pub fn new(
        action: TouchAction,
        action_index: usize,
        pointers: Vec<TouchPointer>,
        timestamp_ms: u64,
    ) -> Self {
        Self {
            action,
            action_index,
            pointers,
            timestamp_ms,
        }
    }

    /// Single-pointer event.
    pub fn single(action: TouchAction, id: i32, x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self::new(action, 0, vec![TouchPointer::new(id, x, y)], timestamp_ms)
    }

    /// The pointer the action refers to, if the index is valid.
    pub fn action_pointer(&self) -> Option<&TouchPointer> {
        self.pointers.get(self.action_index)
    }

    /// Look up a pointer by platform id.
    pub fn find(&self, id: i32) -> Option<&TouchPointer> {
        self.pointers.iter().find(|p| p.id == id)
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }
}
