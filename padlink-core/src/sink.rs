//! Capabilities the input core consumes from the surrounding session.
//!
//! The wrapped protocol stacks, the canvas view and the notification UI
//! live outside this crate. Handlers only see them through these traits.
//! All calls are fire-and-forget; methods take `&self` so one transport
//! object can back several sinks.

use serde::{Deserialize, Serialize};

use crate::flags::{ButtonFlags, CONTROLLER_TYPE_XBOX, ControllerCapabilities};
use crate::keycode::KeyCode;

// ── Pointer / keyboard ───────────────────────────────────────────

/// Remote mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer and touch primitives of the active remote protocol.
pub trait PointerSink: Send + Sync {
    /// Whether the protocol carries multi-touch frames. When `false`,
    /// the direct-touch handler falls back to mouse emulation.
    fn supports_touch(&self) -> bool {
        true
    }

    fn touch_down(&self, x: i32, y: i32, contact_id: u32);
    fn touch_update(&self, x: i32, y: i32, contact_id: u32);
    fn touch_up(&self, x: i32, y: i32, contact_id: u32);
    fn touch_cancel(&self, x: i32, y: i32, contact_id: u32);

    fn move_mouse(&self, x: i32, y: i32);
    fn button_down(&self, button: MouseButton, x: i32, y: i32);
    fn button_up(&self, button: MouseButton, x: i32, y: i32);

    /// Scroll by whole steps; positive `dy` scrolls down, positive `dx` right.
    fn scroll(&self, x: i32, y: i32, dx: i32, dy: i32);
}

/// Keyboard primitive, used for key codes that are not gamepad buttons.
pub trait KeyboardSink: Send + Sync {
    fn key_event(&self, key: KeyCode, down: bool);
}

// ── Controller transport ─────────────────────────────────────────

/// Controller arrival / removal announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerArrival {
    pub controller_number: u8,
    pub active_mask: u16,
    pub controller_type: u8,
    pub supported_buttons: u32,
    pub capabilities: ControllerCapabilities,
}

impl ControllerArrival {
    /// Announce controller 0 as an Xbox-style pad with every button,
    /// analog triggers and rumble.
    pub fn xbox() -> Self {
        Self {
            controller_number: 0,
            active_mask: 1,
            controller_type: CONTROLLER_TYPE_XBOX,
            supported_buttons: u32::MAX,
            capabilities: ControllerCapabilities::ANALOG_TRIGGERS
                | ControllerCapabilities::RUMBLE,
        }
    }

    /// Announce that controller 0 went away.
    pub fn removal() -> Self {
        Self {
            controller_number: 0,
            active_mask: 0,
            controller_type: CONTROLLER_TYPE_XBOX,
            supported_buttons: 0,
            capabilities: ControllerCapabilities::empty(),
        }
    }

    pub fn is_removal(&self) -> bool {
        self.active_mask == 0
    }
}

/// One combined controller-input frame: both sticks plus the full
/// button and trigger state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControllerFrame {
    pub controller_number: i16,
    pub active_mask: i16,
    pub buttons: ButtonFlags,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub left_stick_x: i16,
    pub left_stick_y: i16,
    pub right_stick_x: i16,
    pub right_stick_y: i16,
}

/// The streaming transport's controller entry points.
pub trait ControllerTransport: Send + Sync {
    fn send_controller_arrival(&self, arrival: &ControllerArrival);
    fn send_controller_input(&self, frame: &ControllerFrame);
}

// ── UI hooks ─────────────────────────────────────────────────────

/// Transient user-visible notification (a toast).
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Geometry of the local view onto the remote desktop.
pub trait Canvas: Send + Sync {
    /// Screen pixels per remote pixel.
    fn zoom_factor(&self) -> f32;
    /// Remote x coordinate at the left edge of the view.
    fn abs_x(&self) -> f32;
    /// Remote y coordinate at the top edge of the view.
    fn abs_y(&self) -> f32;
    /// Screen-space offset of the view's top edge.
    fn top(&self) -> f32 {
        0.0
    }
    fn image_width(&self) -> u32;
    fn image_height(&self) -> u32;
    /// Pan the local view by a raw screen-pixel delta. Nothing is sent
    /// to the remote.
    fn pan_by(&self, dx: f32, dy: f32);

    /// Map a screen position to remote desktop coordinates.
    fn to_remote(&self, x: f32, y: f32) -> (i32, i32) {
        let zoom = self.zoom_factor();
        let rx = self.abs_x() + x / zoom;
        let ry = self.abs_y() + (y - self.top()) / zoom;
        (rx as i32, ry as i32)
    }

    /// Whether a remote coordinate lies on the desktop image.
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0
            && y >= 0
            && (x as i64) < self.image_width() as i64
            && (y as i64) < self.image_height() as i64
    }
}
