//! Game-streaming adapter: native controller frames.
//!
//! The transport models a controller as one frame carrying every button,
//! both triggers and both sticks. The adapter keeps the accumulated
//! [`ButtonState`] and the last stick values, and rebuilds the full frame
//! on every mutation.

use std::sync::Arc;

use tracing::{debug, info};

use crate::gamepad::{ButtonState, GamepadInput, Protocol, RemoteGamepad};
use crate::keycode::KeyCode;
use crate::sink::{ControllerArrival, ControllerFrame, ControllerTransport};
use crate::stick::StickAxes;

/// Controller slot used for the on-screen pad.
const CONTROLLER_NUMBER: i16 = 0;
/// Active-controller mask with only slot 0 set.
const ACTIVE_MASK: i16 = 0x01;

pub struct NvStreamGamepad {
    transport: Arc<dyn ControllerTransport>,
    state: ButtonState,
    axes: StickAxes,
    initialized: bool,
}

impl NvStreamGamepad {
    pub fn new(transport: Arc<dyn ControllerTransport>) -> Self {
        Self {
            transport,
            state: ButtonState::default(),
            axes: StickAxes::CENTERED,
            initialized: false,
        }
    }

    /// Last stick values sent.
    pub fn axes(&self) -> StickAxes {
        self.axes
    }

    fn frame(&self) -> ControllerFrame {
        let [lx, ly, rx, ry] = self.axes.to_wire();
        ControllerFrame {
            controller_number: CONTROLLER_NUMBER,
            active_mask: ACTIVE_MASK,
            buttons: self.state.buttons,
            left_trigger: self.state.left_trigger,
            right_trigger: self.state.right_trigger,
            left_stick_x: lx,
            left_stick_y: ly,
            right_stick_x: rx,
            right_stick_y: ry,
        }
    }

    fn send_frame(&self) {
        self.transport.send_controller_input(&self.frame());
    }

    fn apply_key(&mut self, key: KeyCode, down: bool) {
        let Some(input) = GamepadInput::from_key_code(key) else {
            debug!(%key, down, "key has no controller mapping, ignoring");
            return;
        };
        self.state.apply(input, down);
        debug!(
            %key,
            down,
            buttons = self.state.buttons.bits(),
            lt = self.state.left_trigger,
            rt = self.state.right_trigger,
            "controller button"
        );
        self.send_frame();
    }
}

impl RemoteGamepad for NvStreamGamepad {
    fn protocol(&self) -> Protocol {
        Protocol::NvStream
    }

    fn initialize(&mut self) {
        self.transport
            .send_controller_arrival(&ControllerArrival::xbox());
        self.initialized = true;
        info!("virtual controller announced");
    }

    fn cleanup(&mut self) {
        if self.initialized {
            self.transport
                .send_controller_arrival(&ControllerArrival::removal());
            info!("virtual controller removed");
        }
        self.initialized = false;
        self.state = ButtonState::default();
        self.axes = StickAxes::CENTERED;
    }

    fn send_button_down(&mut self, key: KeyCode) {
        self.apply_key(key, true);
    }

    fn send_button_up(&mut self, key: KeyCode) {
        self.apply_key(key, false);
    }

    fn send_analog_sticks(&mut self, axes: StickAxes) {
        self.axes = axes;
        self.send_frame();
    }

    fn button_state(&self) -> ButtonState {
        self.state
    }

    fn supports_gamepad(&self) -> bool {
        true
    }
}
