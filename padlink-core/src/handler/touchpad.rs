//! Laptop-style touchpad emulation.
//!
//! One finger moves the remote pointer relative to where it is; two
//! fingers scroll. Both paths scale the raw finger delta through their
//! own [`PointerAccelerationHelper`], and every drag sample feeds the
//! [`TouchMovementAnalyzer`] so the UI can magnify during fine work.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::acceleration::PointerAccelerationHelper;
use crate::analyzer::TouchMovementAnalyzer;
use crate::config::InputConfig;
use crate::event::{TouchAction, TouchEvent};
use crate::handler::InputHandler;
use crate::sink::{Canvas, PointerSink};

/// Largest scroll step the wire accepts in one event.
pub const MAX_SCROLL_STEP: i32 = 255;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    /// One finger moving the pointer.
    Pointer { pointer_id: i32, last_x: f32, last_y: f32 },
    /// Two fingers scrolling; tracks their midpoint.
    Scroll { last_x: f32, last_y: f32 },
}

pub struct TouchpadHandler {
    sink: Arc<dyn PointerSink>,
    canvas: Arc<dyn Canvas>,
    analyzer: TouchMovementAnalyzer,
    pointer_accel: PointerAccelerationHelper,
    scroll_accel: PointerAccelerationHelper,
    scroll_base: f32,
    density: f32,
    gesture: Gesture,
    /// Remote pointer position.
    pointer_x: f32,
    pointer_y: f32,
}

impl TouchpadHandler {
    pub fn new(sink: Arc<dyn PointerSink>, canvas: Arc<dyn Canvas>, config: &InputConfig) -> Self {
        let pointer_x = canvas.image_width() as f32 / 2.0;
        let pointer_y = canvas.image_height() as f32 / 2.0;
        Self {
            sink,
            canvas,
            analyzer: TouchMovementAnalyzer::with_config(
                config.display.density,
                config.movement.clone(),
            ),
            pointer_accel: PointerAccelerationHelper::from_config(&config.acceleration),
            scroll_accel: PointerAccelerationHelper::from_config(&config.acceleration),
            scroll_base: config.acceleration.scroll_base,
            density: config.display.density,
            gesture: Gesture::Idle,
            pointer_x,
            pointer_y,
        }
    }

    /// Remote pointer position.
    pub fn pointer_position(&self) -> (i32, i32) {
        (self.pointer_x as i32, self.pointer_y as i32)
    }

    /// Whether recent movement is slow enough for precision magnification.
    pub fn fine_movement(&self) -> bool {
        self.analyzer.is_slow()
    }

    fn begin(&mut self, event: &TouchEvent) {
        self.pointer_accel.reset();
        self.scroll_accel.reset();
        match event.pointers.as_slice() {
            [] => self.gesture = Gesture::Idle,
            [p] => {
                self.gesture = Gesture::Pointer {
                    pointer_id: p.id,
                    last_x: p.x,
                    last_y: p.y,
                }
            }
            [a, b, ..] => {
                self.gesture = Gesture::Scroll {
                    last_x: (a.x + b.x) / 2.0,
                    last_y: (a.y + b.y) / 2.0,
                }
            }
        }
        trace!(gesture = ?self.gesture, "touchpad gesture");
    }

    fn moved(&mut self, event: &TouchEvent) {
        match self.gesture {
            Gesture::Idle => {}
            Gesture::Pointer {
                pointer_id,
                last_x,
                last_y,
            } => {
                let Some(p) = event.find(pointer_id).copied() else {
                    return;
                };
                self.analyzer.add_point(p.x, p.y, event.timestamp_ms);
                self.analyzer.analyze(event.timestamp_ms);

                let (dx, dy) = (p.x - last_x, p.y - last_y);
                let m = self
                    .pointer_accel
                    .calculate_acceleration_multiplier(event.timestamp_ms, dx, dy, 1.0);
                self.move_pointer(dx * m, dy * m);
                self.gesture = Gesture::Pointer {
                    pointer_id,
                    last_x: p.x,
                    last_y: p.y,
                };
            }
            Gesture::Scroll { last_x, last_y } => {
                let [a, b, ..] = event.pointers.as_slice() else {
                    return;
                };
                let (mx, my) = ((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
                self.analyzer.add_point(mx, my, event.timestamp_ms);
                self.analyzer.analyze(event.timestamp_ms);

                let (dx, dy) = (mx - last_x, my - last_y);
                self.scroll(event.timestamp_ms, dx, dy);
                self.gesture = Gesture::Scroll {
                    last_x: mx,
                    last_y: my,
                };
            }
        }
    }

    fn move_pointer(&mut self, dx: f32, dy: f32) {
        let max_x = self.canvas.image_width().saturating_sub(1) as f32;
        let max_y = self.canvas.image_height().saturating_sub(1) as f32;
        self.pointer_x = (self.pointer_x + dx).clamp(0.0, max_x);
        self.pointer_y = (self.pointer_y + dy).clamp(0.0, max_y);
        let (x, y) = self.pointer_position();
        self.sink.move_mouse(x, y);
    }

    /// Turn a two-finger midpoint delta into whole scroll steps along
    /// the dominant axis. Dragging up scrolls down.
    fn scroll(&mut self, now_ms: u64, dx: f32, dy: f32) {
        let dx_dp = dx / self.density;
        let dy_dp = dy / self.density;
        let m = self
            .scroll_accel
            .calculate_acceleration_multiplier(now_ms, dx_dp, dy_dp, self.scroll_base);

        let (step_x, step_y) = if dy.abs() >= dx.abs() {
            (0, scroll_step(-dy_dp * m, self.density))
        } else {
            (scroll_step(-dx_dp * m, self.density), 0)
        };
        if step_x == 0 && step_y == 0 {
            return;
        }
        let (x, y) = self.pointer_position();
        debug!(step_x, step_y, multiplier = m, "touchpad scroll");
        self.sink.scroll(x, y, step_x, step_y);
    }
}

/// One step per two physical pixels of travel, clamped to the wire range.
fn scroll_step(distance_dp: f32, density: f32) -> i32 {
    let steps = (distance_dp * density / 2.0) as i32;
    steps.clamp(-MAX_SCROLL_STEP, MAX_SCROLL_STEP)
}

impl InputHandler for TouchpadHandler {
    fn on_touch_event(&mut self, event: &TouchEvent) -> bool {
        match event.action {
            TouchAction::Down => {
                self.analyzer.reset();
                self.begin(event);
            }
            TouchAction::PointerDown => self.begin(event),
            TouchAction::Move => self.moved(event),
            TouchAction::PointerUp => {
                // Continue with the fingers that remain.
                let mut remaining = event.clone();
                if event.action_index < remaining.pointers.len() {
                    remaining.pointers.remove(event.action_index);
                }
                self.begin(&remaining);
            }
            TouchAction::Up | TouchAction::Cancel => {
                self.gesture = Gesture::Idle;
                self.pointer_accel.reset();
                self.scroll_accel.reset();
            }
        }
        true
    }

    fn cleanup(&mut self) {
        self.gesture = Gesture::Idle;
        self.analyzer.reset();
        self.pointer_accel.reset();
        self.scroll_accel.reset();
    }
}
