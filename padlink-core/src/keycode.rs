//! Platform key codes for gamepad buttons.
//!
//! Values match the Android `KeyEvent.KEYCODE_*` constants, which is what
//! the on-screen controls and physical controllers report.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A platform key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub i32);

impl KeyCode {
    pub const DPAD_UP: KeyCode = KeyCode(19);
    pub const DPAD_DOWN: KeyCode = KeyCode(20);
    pub const DPAD_LEFT: KeyCode = KeyCode(21);
    pub const DPAD_RIGHT: KeyCode = KeyCode(22);
    pub const BUTTON_A: KeyCode = KeyCode(96);
    pub const BUTTON_B: KeyCode = KeyCode(97);
    pub const BUTTON_X: KeyCode = KeyCode(99);
    pub const BUTTON_Y: KeyCode = KeyCode(100);
    pub const BUTTON_L1: KeyCode = KeyCode(102);
    pub const BUTTON_R1: KeyCode = KeyCode(103);
    pub const BUTTON_L2: KeyCode = KeyCode(104);
    pub const BUTTON_R2: KeyCode = KeyCode(105);
    pub const BUTTON_THUMBL: KeyCode = KeyCode(106);
    pub const BUTTON_THUMBR: KeyCode = KeyCode(107);
    pub const BUTTON_START: KeyCode = KeyCode(108);
    pub const BUTTON_SELECT: KeyCode = KeyCode(109);

    /// Short human-readable name, used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::DPAD_UP => "DPAD_UP",
            Self::DPAD_DOWN => "DPAD_DOWN",
            Self::DPAD_LEFT => "DPAD_LEFT",
            Self::DPAD_RIGHT => "DPAD_RIGHT",
            Self::BUTTON_A => "A",
            Self::BUTTON_B => "B",
            Self::BUTTON_X => "X",
            Self::BUTTON_Y => "Y",
            Self::BUTTON_L1 => "L1",
            Self::BUTTON_R1 => "R1",
            Self::BUTTON_L2 => "L2",
            Self::BUTTON_R2 => "R2",
            Self::BUTTON_THUMBL => "THUMBL",
            Self::BUTTON_THUMBR => "THUMBR",
            Self::BUTTON_START => "START",
            Self::BUTTON_SELECT => "SELECT",
            _ => "KEY",
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.0)
    }
}
