//! Streaming-protocol controller flags.
//!
//! Button bits and controller-announcement constants as the game-streaming
//! transport defines them. The two shoulder triggers are analog and have
//! no bit here.

use bitflags::bitflags;

bitflags! {
    /// Digital buttons carried in every controller-input frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
    pub struct ButtonFlags: u32 {
        const UP = 0x0001;
        const DOWN = 0x0002;
        const LEFT = 0x0004;
        const RIGHT = 0x0008;
        const PLAY = 0x0010;
        const BACK = 0x0020;
        const LS_CLK = 0x0040;
        const RS_CLK = 0x0080;
        const LB = 0x0100;
        const RB = 0x0200;
        const SPECIAL = 0x0400;
        const A = 0x1000;
        const B = 0x2000;
        const X = 0x4000;
        const Y = 0x8000;
    }
}

bitflags! {
    /// Capabilities announced with a controller arrival.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
    pub struct ControllerCapabilities: u16 {
        const ANALOG_TRIGGERS = 0x01;
        const RUMBLE = 0x02;
    }
}

/// Controller type byte for an Xbox-style pad.
pub const CONTROLLER_TYPE_XBOX: u8 = 0x01;

/// Full-scale trigger value.
pub const TRIGGER_FULL: u8 = 0xFF;
