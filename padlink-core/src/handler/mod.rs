//! Touch input handlers.
//!
//! Each handler owns the per-gesture state for one input mode and turns
//! raw [`TouchEvent`]s into calls on the session's sinks:
//!
//! - [`DirectTouchHandler`]: fingers become remote multi-touch contacts.
//! - [`GamepadInputHandler`]: fingers drive on-screen buttons and sticks.
//! - [`TouchpadHandler`]: the screen is a laptop touchpad.

pub mod direct_touch;
pub mod gamepad;
pub mod touchpad;

use crate::event::TouchEvent;

pub use direct_touch::DirectTouchHandler;
pub use gamepad::{GamepadInputHandler, GamepadTimer};
pub use touchpad::TouchpadHandler;

/// Common surface the UI layer drives.
pub trait InputHandler: Send {
    /// Feed one touch event. Returns `true` when the event was consumed.
    fn on_touch_event(&mut self, event: &TouchEvent) -> bool;

    /// Drop all gesture state without sending anything further.
    fn cleanup(&mut self);
}
