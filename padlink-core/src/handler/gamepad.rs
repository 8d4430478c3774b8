//! On-screen gamepad: virtual buttons plus two analog sticks.
//!
//! A touch that lands on a button presses it; any other touch binds the
//! stick for its screen half. All state lives in this handler and is
//! only mutated from the session's single task, including by the timers
//! it schedules:
//!
//! | Timer            | Armed by                 | Fires                                   |
//! |------------------|--------------------------|-----------------------------------------|
//! | `StickRepeat`    | stick bind / move        | re-send combined frame while bound      |
//! | `KeepAlive`      | overlay shown            | presence frame after an idle gap        |
//! | `AutoRelease(k)` | short press of `k`       | release `k`                             |
//! | `LongPress(p)`   | pointer `p` on SELECT    | enter edit mode if still held           |
//!
//! Any transition that makes a timer stale cancels it in the same step.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, trace};

use crate::config::{ButtonSpec, InputConfig};
use crate::error::PadError;
use crate::event::{TouchAction, TouchEvent};
use crate::gamepad::{ButtonState, GamepadInput, Protocol, RemoteGamepad, create_gamepad};
use crate::handler::InputHandler;
use crate::keycode::KeyCode;
use crate::layout::ButtonLayout;
use crate::sink::{ControllerTransport, KeyboardSink, Notifier};
use crate::stick::{DualStick, StickAxes, StickGeometry};
use crate::timer::TimerQueue;

/// Scheduled callbacks, keyed by the state they affect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadTimer {
    StickRepeat,
    KeepAlive,
    AutoRelease(KeyCode),
    LongPress(i32),
}

pub struct GamepadInputHandler {
    gamepad: Box<dyn RemoteGamepad>,
    keyboard: Arc<dyn KeyboardSink>,
    layout: ButtonLayout,
    button_specs: Vec<ButtonSpec>,
    button_size: f32,
    sticks: DualStick,
    /// Pointer id → index of the button it holds down.
    held: HashMap<i32, usize>,
    timers: TimerQueue<GamepadTimer>,
    repeat_interval: Duration,
    keepalive: Duration,
    auto_release: Duration,
    long_press: Duration,
    last_frame_at: Instant,
    edit_mode: bool,
    overlay_attached: bool,
}

impl GamepadInputHandler {
    /// Build the handler for a session and announce the controller.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        protocol: Protocol,
        controller: Arc<dyn ControllerTransport>,
        notifier: Arc<dyn Notifier>,
        keyboard: Arc<dyn KeyboardSink>,
        config: &InputConfig,
    ) -> Result<Self, PadError> {
        config.validate()?;
        let gamepad = create_gamepad(protocol, controller, notifier)?;
        Ok(Self::with_gamepad(gamepad, keyboard, config))
    }

    /// Build the handler around an existing adapter.
    pub fn with_gamepad(
        gamepad: Box<dyn RemoteGamepad>,
        keyboard: Arc<dyn KeyboardSink>,
        config: &InputConfig,
    ) -> Self {
        let display = &config.display;
        let layout = ButtonLayout::from_specs(
            &config.buttons.layout,
            display.width,
            display.height,
            config.button_size_px(),
        );
        let geometry = StickGeometry::new(config.stick_radius_px(), config.stick.deadzone);

        let mut handler = Self {
            gamepad,
            keyboard,
            layout,
            button_specs: config.buttons.layout.clone(),
            button_size: config.button_size_px(),
            sticks: DualStick::new(geometry, display.width),
            held: HashMap::new(),
            timers: TimerQueue::new(),
            repeat_interval: Duration::from_millis(config.stick.repeat_interval_ms),
            keepalive: Duration::from_millis(config.stick.keepalive_ms),
            auto_release: Duration::from_millis(config.buttons.auto_release_ms),
            long_press: Duration::from_millis(config.buttons.long_press_ms),
            last_frame_at: Instant::now(),
            edit_mode: false,
            overlay_attached: false,
        };
        handler.show_overlay();
        handler
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn protocol(&self) -> Protocol {
        self.gamepad.protocol()
    }

    pub fn button_state(&self) -> ButtonState {
        self.gamepad.button_state()
    }

    pub fn stick_axes(&self) -> StickAxes {
        self.sticks.axes()
    }

    pub fn sticks(&self) -> &DualStick {
        &self.sticks
    }

    pub fn layout(&self) -> &ButtonLayout {
        &self.layout
    }

    /// Key currently held by `pointer_id`, if any.
    pub fn held_key(&self, pointer_id: i32) -> Option<KeyCode> {
        let index = *self.held.get(&pointer_id)?;
        self.layout.button(index).map(|b| b.key)
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn is_overlay_attached(&self) -> bool {
        self.overlay_attached
    }

    pub fn has_pending_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    pub fn is_timer_armed(&self, timer: GamepadTimer) -> bool {
        self.timers.is_armed(&timer)
    }

    // ── UI entry points ──────────────────────────────────────────

    /// Press `key` on behalf of the UI. With `auto_release` the key is
    /// released again after the configured delay; pressing the same key
    /// before then restarts the delay.
    pub fn send_gamepad_button(&mut self, key: KeyCode, auto_release: bool) {
        if GamepadInput::from_key_code(key).is_none() {
            debug!(%key, "not a gamepad key, forwarding to keyboard");
            self.keyboard.key_event(key, true);
            if auto_release {
                self.keyboard.key_event(key, false);
            }
            return;
        }
        self.gamepad.send_button_down(key);
        self.last_frame_at = Instant::now();
        if auto_release {
            self.timers.arm(GamepadTimer::AutoRelease(key), self.auto_release);
        } else {
            self.timers.cancel(&GamepadTimer::AutoRelease(key));
        }
    }

    /// Release `key`, cancelling any pending auto-release for it first.
    pub fn release_gamepad_button(&mut self, key: KeyCode) {
        self.timers.cancel(&GamepadTimer::AutoRelease(key));
        self.key_up(key);
    }

    /// Re-attach the overlay: announce the controller again and restart
    /// the keep-alive. Does nothing while already attached.
    pub fn show_overlay(&mut self) {
        if self.overlay_attached {
            return;
        }
        self.gamepad.initialize();
        self.overlay_attached = true;
        self.last_frame_at = Instant::now();
        if self.gamepad.supports_gamepad() && !self.keepalive.is_zero() {
            self.timers.arm(GamepadTimer::KeepAlive, self.keepalive);
        }
        info!(protocol = %self.gamepad.protocol(), "gamepad overlay attached");
    }

    /// Re-place the buttons and move the stick split for a new screen
    /// size. Anything held is released first.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.release_everything();
        self.layout = ButtonLayout::from_specs(&self.button_specs, width, height, self.button_size);
        self.sticks.set_screen_width(width);
        info!(width, height, "gamepad overlay resized");
    }

    /// Flip edit mode. Returns the new state.
    pub fn toggle_edit_mode(&mut self) -> bool {
        let enable = !self.edit_mode;
        self.set_edit_mode(enable);
        enable
    }

    pub fn set_edit_mode(&mut self, enable: bool) {
        if enable == self.edit_mode {
            return;
        }
        if enable {
            self.release_everything();
        }
        self.edit_mode = enable;
        info!(edit_mode = enable, "gamepad edit mode");
    }

    // ── Timers ───────────────────────────────────────────────────

    /// Wait for the next scheduled callback. `None` when nothing is armed.
    pub async fn next_timer(&mut self) -> Option<GamepadTimer> {
        self.timers.next_expired().await
    }

    /// Wait for the next scheduled callback and run it.
    pub async fn run_next_timer(&mut self) -> Option<GamepadTimer> {
        let timer = self.next_timer().await?;
        self.on_timer(timer);
        Some(timer)
    }

    /// Run an expired callback.
    pub fn on_timer(&mut self, timer: GamepadTimer) {
        trace!(?timer, "timer fired");
        match timer {
            GamepadTimer::StickRepeat => {
                if self.sticks.any_bound() {
                    self.emit_sticks();
                    self.timers.arm(GamepadTimer::StickRepeat, self.repeat_interval);
                }
            }
            GamepadTimer::KeepAlive => {
                if !self.overlay_attached {
                    return;
                }
                let idle = self.last_frame_at.elapsed();
                if idle >= self.keepalive {
                    self.emit_sticks();
                    self.timers.arm(GamepadTimer::KeepAlive, self.keepalive);
                } else {
                    self.timers.arm(GamepadTimer::KeepAlive, self.keepalive - idle);
                }
            }
            GamepadTimer::AutoRelease(key) => {
                if self.is_key_held(key) {
                    debug!(%key, "key still held on screen, skipping auto-release");
                } else {
                    self.key_up(key);
                }
            }
            GamepadTimer::LongPress(pointer_id) => {
                if self.held_key(pointer_id) == Some(KeyCode::BUTTON_SELECT) {
                    info!("SELECT held, entering edit mode");
                    self.set_edit_mode(true);
                }
            }
        }
    }

    // ── Frames ───────────────────────────────────────────────────

    fn emit_sticks(&mut self) {
        self.gamepad.send_analog_sticks(self.sticks.axes());
        self.last_frame_at = Instant::now();
    }

    fn key_down(&mut self, key: KeyCode) {
        if GamepadInput::from_key_code(key).is_some() {
            self.gamepad.send_button_down(key);
            self.last_frame_at = Instant::now();
        } else {
            self.keyboard.key_event(key, true);
        }
    }

    fn key_up(&mut self, key: KeyCode) {
        if GamepadInput::from_key_code(key).is_some() {
            self.gamepad.send_button_up(key);
            self.last_frame_at = Instant::now();
        } else {
            self.keyboard.key_event(key, false);
        }
    }

    // ── Virtual buttons ──────────────────────────────────────────

    fn is_button_held(&self, index: usize) -> bool {
        self.held.values().any(|&i| i == index)
    }

    fn is_key_held(&self, key: KeyCode) -> bool {
        self.held
            .values()
            .any(|&i| self.layout.button(i).is_some_and(|b| b.key == key))
    }

    fn press_virtual(&mut self, pointer_id: i32, index: usize) {
        if self.is_button_held(index) {
            trace!(pointer_id, index, "button already held by another pointer");
            return;
        }
        let Some(key) = self.layout.button(index).map(|b| b.key) else {
            return;
        };
        self.held.insert(pointer_id, index);
        self.timers.cancel(&GamepadTimer::AutoRelease(key));
        debug!(pointer_id, %key, "virtual button down");
        self.key_down(key);
        if key == KeyCode::BUTTON_SELECT {
            self.timers.arm(GamepadTimer::LongPress(pointer_id), self.long_press);
        }
    }

    fn release_virtual(&mut self, pointer_id: i32) -> bool {
        let Some(index) = self.held.remove(&pointer_id) else {
            return false;
        };
        self.timers.cancel(&GamepadTimer::LongPress(pointer_id));
        if let Some(key) = self.layout.button(index).map(|b| b.key) {
            debug!(pointer_id, %key, "virtual button up");
            self.key_up(key);
        }
        true
    }

    // ── Sticks ───────────────────────────────────────────────────

    fn release_stick(&mut self, pointer_id: i32) -> bool {
        let Some(side) = self.sticks.release(pointer_id) else {
            return false;
        };
        debug!(pointer_id, ?side, "stick released");
        self.emit_sticks();
        if !self.sticks.any_bound() {
            self.timers.cancel(&GamepadTimer::StickRepeat);
        }
        true
    }

    /// Release every held button and both sticks, sending the matching
    /// release and centred frames.
    fn release_everything(&mut self) {
        let mut pointers: Vec<i32> = self.held.keys().copied().collect();
        pointers.sort_unstable();
        for pointer_id in pointers {
            self.release_virtual(pointer_id);
        }
        if self.sticks.release_all() {
            self.emit_sticks();
        }
        self.timers.cancel(&GamepadTimer::StickRepeat);
    }

    // ── Pointer routing ──────────────────────────────────────────

    fn pointer_down(&mut self, pointer_id: i32, x: f32, y: f32) {
        // A repeated down means the up for the earlier one was lost.
        if self.release_virtual(pointer_id) || self.release_stick(pointer_id) {
            debug!(pointer_id, "down for tracked pointer, dropped its previous hold");
        }
        if let Some(index) = self.layout.hit(x, y) {
            self.press_virtual(pointer_id, index);
            return;
        }
        match self.sticks.bind(pointer_id, x, y) {
            Some(side) => {
                debug!(pointer_id, ?side, x, y, "stick bound");
                self.timers.arm(GamepadTimer::StickRepeat, self.repeat_interval);
            }
            None => trace!(pointer_id, x, y, "stick side busy, ignoring"),
        }
    }

    fn pointer_moved(&mut self, pointer_id: i32, x: f32, y: f32) {
        if let Some(&index) = self.held.get(&pointer_id) {
            let still_inside = self
                .layout
                .button(index)
                .is_some_and(|b| b.rect.contains(x, y));
            if still_inside {
                return;
            }
            self.release_virtual(pointer_id);
            if let Some(next) = self.layout.hit(x, y) {
                self.press_virtual(pointer_id, next);
            }
            return;
        }

        if self.sticks.side_of(pointer_id).is_some() {
            if let Some(index) = self.layout.hit(x, y) {
                self.release_stick(pointer_id);
                self.press_virtual(pointer_id, index);
                return;
            }
            if let Some((side, knob)) = self.sticks.update(pointer_id, x, y) {
                trace!(pointer_id, ?side, ?knob, "stick moved");
            }
            self.emit_sticks();
            self.timers.arm(GamepadTimer::StickRepeat, self.repeat_interval);
            return;
        }

        if let Some(index) = self.layout.hit(x, y) {
            self.press_virtual(pointer_id, index);
        }
    }

    fn pointer_up(&mut self, pointer_id: i32) {
        if self.release_virtual(pointer_id) {
            return;
        }
        if !self.release_stick(pointer_id) {
            trace!(pointer_id, "up for untracked pointer");
        }
    }
}

impl InputHandler for GamepadInputHandler {
    fn on_touch_event(&mut self, event: &TouchEvent) -> bool {
        if self.edit_mode || !self.overlay_attached {
            return false;
        }
        match event.action {
            TouchAction::Move => {
                for p in &event.pointers {
                    self.pointer_moved(p.id, p.x, p.y);
                }
            }
            TouchAction::Cancel => {
                debug!("gesture cancelled, releasing all controls");
                self.release_everything();
            }
            action => {
                let Some(p) = event.action_pointer().copied() else {
                    return false;
                };
                if action.is_down() {
                    self.pointer_down(p.id, p.x, p.y);
                } else if action.is_up() {
                    self.pointer_up(p.id);
                }
            }
        }
        true
    }

    /// Tear down the session: cancel every timer, forget all pointers,
    /// centre both sticks and announce controller removal. Nothing
    /// scheduled before this call fires afterwards.
    fn cleanup(&mut self) {
        self.timers.clear();
        self.held.clear();
        self.sticks.release_all();
        self.edit_mode = false;
        if self.overlay_attached {
            self.gamepad.cleanup();
            self.overlay_attached = false;
            info!(protocol = %self.gamepad.protocol(), "gamepad overlay detached");
        }
    }
}
