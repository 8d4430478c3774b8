//! Protocol-independent gamepad abstraction.
//!
//! Exactly one [`RemoteGamepad`] exists per remote session. It is built
//! once by [`create_gamepad`] from the session's [`Protocol`] and never
//! reselected; callers drive it through the trait and never branch on
//! the protocol again.
//!
//! ```text
//!   Protocol::NvStream ──► NvStreamGamepad   (controller frames)
//!   Protocol::Rdp      ──► LegacyGamepad     (notify once, no-op)
//!   Protocol::Vnc      ──► LegacyGamepad     (notify once, no-op)
//!   anything else      ──► PadError::UnsupportedProtocol
//! ```

pub mod legacy;
pub mod nvstream;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::PadError;
use crate::flags::ButtonFlags;
use crate::keycode::KeyCode;
use crate::sink::{ControllerTransport, Notifier};
use crate::stick::StickAxes;

pub use legacy::LegacyGamepad;
pub use nvstream::NvStreamGamepad;

// ── Protocol ─────────────────────────────────────────────────────

/// Remote protocol of the active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Vnc,
    Rdp,
    /// Game-streaming transport with native controller support.
    NvStream,
    Spice,
    Opaque,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Vnc => "vnc",
            Self::Rdp => "rdp",
            Self::NvStream => "nvstream",
            Self::Spice => "spice",
            Self::Opaque => "opaque",
        };
        f.write_str(name)
    }
}

impl FromStr for Protocol {
    type Err = PadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vnc" => Ok(Self::Vnc),
            "rdp" => Ok(Self::Rdp),
            "nvstream" | "moonlight" => Ok(Self::NvStream),
            "spice" => Ok(Self::Spice),
            "opaque" => Ok(Self::Opaque),
            other => Err(PadError::UnknownProtocol(other.to_string())),
        }
    }
}

// ── ButtonState ──────────────────────────────────────────────────

/// Accumulated digital buttons and analog triggers of one session.
///
/// Every outbound frame is built from this value, so a stick update
/// never clobbers held buttons and a button press never drops a
/// trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ButtonState {
    pub buttons: ButtonFlags,
    pub left_trigger: u8,
    pub right_trigger: u8,
}

impl ButtonState {
    /// Apply one press or release. Returns `true` if the state changed.
    pub fn apply(&mut self, input: GamepadInput, down: bool) -> bool {
        let before = *self;
        let value = if down { crate::flags::TRIGGER_FULL } else { 0 };
        match input {
            GamepadInput::Button(flag) => self.buttons.set(flag, down),
            GamepadInput::LeftTrigger => self.left_trigger = value,
            GamepadInput::RightTrigger => self.right_trigger = value,
        }
        *self != before
    }

    pub fn is_idle(&self) -> bool {
        self.buttons.is_empty() && self.left_trigger == 0 && self.right_trigger == 0
    }
}

// ── GamepadInput ─────────────────────────────────────────────────

/// What a platform key code controls on the virtual pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamepadInput {
    Button(ButtonFlags),
    LeftTrigger,
    RightTrigger,
}

impl GamepadInput {
    /// Fixed key-code table. `None` for keys that are not gamepad input.
    pub fn from_key_code(key: KeyCode) -> Option<Self> {
        let flag = match key {
            KeyCode::BUTTON_A => ButtonFlags::A,
            KeyCode::BUTTON_B => ButtonFlags::B,
            KeyCode::BUTTON_X => ButtonFlags::X,
            KeyCode::BUTTON_Y => ButtonFlags::Y,
            KeyCode::BUTTON_L1 => ButtonFlags::LB,
            KeyCode::BUTTON_R1 => ButtonFlags::RB,
            KeyCode::BUTTON_START => ButtonFlags::PLAY,
            KeyCode::BUTTON_SELECT => ButtonFlags::BACK,
            KeyCode::BUTTON_THUMBL => ButtonFlags::LS_CLK,
            KeyCode::BUTTON_THUMBR => ButtonFlags::RS_CLK,
            KeyCode::DPAD_UP => ButtonFlags::UP,
            KeyCode::DPAD_DOWN => ButtonFlags::DOWN,
            KeyCode::DPAD_LEFT => ButtonFlags::LEFT,
            KeyCode::DPAD_RIGHT => ButtonFlags::RIGHT,
            KeyCode::BUTTON_L2 => return Some(Self::LeftTrigger),
            KeyCode::BUTTON_R2 => return Some(Self::RightTrigger),
            _ => return None,
        };
        Some(Self::Button(flag))
    }
}

// ── RemoteGamepad ────────────────────────────────────────────────

/// One virtual controller bound to the session's wire protocol.
pub trait RemoteGamepad: Send {
    fn protocol(&self) -> Protocol;

    /// Announce the controller to the remote.
    fn initialize(&mut self);

    /// Announce removal and reset all state.
    fn cleanup(&mut self);

    fn send_button_down(&mut self, key: KeyCode);
    fn send_button_up(&mut self, key: KeyCode);

    /// Send both sticks' normalized values together with the current
    /// button state.
    fn send_analog_sticks(&mut self, axes: StickAxes);

    /// Current accumulated button and trigger state.
    fn button_state(&self) -> ButtonState;

    /// Whether the protocol carries controller input at all.
    fn supports_gamepad(&self) -> bool;
}

/// Build the adapter for `protocol`.
///
/// Fails with [`PadError::UnsupportedProtocol`] when the protocol has no
/// adapter. That is a wiring defect in the caller, not something to
/// degrade around.
pub fn create_gamepad(
    protocol: Protocol,
    controller: Arc<dyn ControllerTransport>,
    notifier: Arc<dyn Notifier>,
) -> Result<Box<dyn RemoteGamepad>, PadError> {
    match protocol {
        Protocol::NvStream => Ok(Box::new(NvStreamGamepad::new(controller))),
        Protocol::Rdp | Protocol::Vnc => Ok(Box::new(LegacyGamepad::new(protocol, notifier))),
        Protocol::Spice | Protocol::Opaque => {
            Err(PadError::UnsupportedProtocol(protocol.to_string()))
        }
    }
}
