//! # padlink-core
//!
//! Input translation core for remote desktop and game-streaming sessions.
//!
//! This crate contains:
//! - **Contacts**: `ContactIdAllocator` mapping platform pointer ids to compact contact ids
//! - **Movement**: `TouchMovementAnalyzer` (slow/fine detection) and `PointerAccelerationHelper`
//! - **Sticks**: analog-stick normalization, deadzone and dual-stick state
//! - **Gamepad**: `RemoteGamepad` with one adapter per wire protocol, built by `create_gamepad`
//! - **Handlers**: direct-touch, on-screen gamepad and touchpad input handlers
//! - **Session**: `GamepadSession`, a single-task driver for the gamepad handler and its timers
//! - **Config**: `InputConfig`, TOML-backed tuning with defaults
//! - **Error**: `PadError`, a typed `thiserror`-based error

pub mod acceleration;
pub mod analyzer;
pub mod config;
pub mod contact;
pub mod error;
pub mod event;
pub mod flags;
pub mod gamepad;
pub mod handler;
pub mod keycode;
pub mod layout;
pub mod session;
pub mod sink;
pub mod stick;
pub mod timer;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use acceleration::PointerAccelerationHelper;
pub use analyzer::{TouchMovementAnalyzer, TouchSample};
pub use config::InputConfig;
pub use contact::ContactIdAllocator;
pub use error::PadError;
pub use event::{TouchAction, TouchEvent, TouchPointer};
pub use flags::{ButtonFlags, ControllerCapabilities};
pub use gamepad::{ButtonState, GamepadInput, Protocol, RemoteGamepad, create_gamepad};
pub use handler::{
    DirectTouchHandler, GamepadInputHandler, GamepadTimer, InputHandler, TouchpadHandler,
};
pub use keycode::KeyCode;
pub use layout::{ButtonLayout, Rect, VirtualButton};
pub use session::{GamepadSession, SessionCommand, SessionHandle};
pub use sink::{
    Canvas, ControllerArrival, ControllerFrame, ControllerTransport, KeyboardSink, MouseButton,
    Notifier, PointerSink,
};
pub use stick::{DualStick, StickAxes, StickGeometry, StickSide, StickState};
pub use timer::TimerQueue;
