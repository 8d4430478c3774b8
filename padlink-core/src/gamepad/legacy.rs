//! Adapter for protocols without a controller channel (RDP, VNC).
//!
//! Every gamepad call is a no-op. The first attempted button press and
//! the first stick update each raise one notification for the session;
//! releases stay silent so a normal press/release pair notifies once.

use std::sync::Arc;

use tracing::debug;

use crate::gamepad::{ButtonState, Protocol, RemoteGamepad};
use crate::keycode::KeyCode;
use crate::sink::Notifier;
use crate::stick::StickAxes;

pub struct LegacyGamepad {
    protocol: Protocol,
    notifier: Arc<dyn Notifier>,
    buttons_notified: bool,
    sticks_notified: bool,
}

impl LegacyGamepad {
    pub fn new(protocol: Protocol, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            protocol,
            notifier,
            buttons_notified: false,
            sticks_notified: false,
        }
    }

    fn message(&self) -> String {
        format!(
            "Gamepad input is not supported over {}",
            self.protocol.to_string().to_uppercase()
        )
    }
}

impl RemoteGamepad for LegacyGamepad {
    fn protocol(&self) -> Protocol {
        self.protocol
    }

    fn initialize(&mut self) {
        debug!(protocol = %self.protocol, "no controller channel");
    }

    fn cleanup(&mut self) {
        self.buttons_notified = false;
        self.sticks_notified = false;
    }

    fn send_button_down(&mut self, key: KeyCode) {
        if !self.buttons_notified {
            self.buttons_notified = true;
            self.notifier.notify(&self.message());
        }
        debug!(%key, protocol = %self.protocol, "dropping button press");
    }

    fn send_button_up(&mut self, _key: KeyCode) {}

    fn send_analog_sticks(&mut self, _axes: StickAxes) {
        if !self.sticks_notified {
            self.sticks_notified = true;
            self.notifier.notify(&self.message());
        }
    }

    fn button_state(&self) -> ButtonState {
        ButtonState::default()
    }

    fn supports_gamepad(&self) -> bool {
        false
    }
}
