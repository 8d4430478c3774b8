//! Direct multi-touch forwarding.
//!
//! Each platform pointer becomes one remote contact for its lifetime:
//!
//! ```text
//!   Down / PointerDown ──► allocate contact ──► touch_down
//!   Move               ──► touch_update   (mapped pointers only)
//!   Up / PointerUp     ──► touch_up       ──► release contact
//!   Cancel             ──► touch_cancel for every contact, clear table
//! ```
//!
//! A gesture whose first finger lands outside the remote desktop image
//! pans the local view instead and sends nothing until it ends.
//! Protocols without touch frames get single-button mouse emulation
//! driven by the first finger.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::contact::ContactIdAllocator;
use crate::event::{TouchAction, TouchEvent};
use crate::handler::InputHandler;
use crate::sink::{Canvas, MouseButton, PointerSink};

/// An in-progress local pan.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PanGesture {
    pointer_id: i32,
    last_x: f32,
    last_y: f32,
}

pub struct DirectTouchHandler {
    sink: Arc<dyn PointerSink>,
    canvas: Arc<dyn Canvas>,
    contacts: ContactIdAllocator,
    /// Last remote position seen per pointer, used when a cancel event no
    /// longer carries the pointer.
    positions: HashMap<i32, (i32, i32)>,
    pan: Option<PanGesture>,
    off_canvas_panning: bool,
    /// Pointer driving the emulated mouse.
    mouse_pointer: Option<i32>,
}

impl DirectTouchHandler {
    pub fn new(sink: Arc<dyn PointerSink>, canvas: Arc<dyn Canvas>, off_canvas_panning: bool) -> Self {
        Self {
            sink,
            canvas,
            contacts: ContactIdAllocator::new(),
            positions: HashMap::new(),
            pan: None,
            off_canvas_panning,
            mouse_pointer: None,
        }
    }

    /// Whether the current gesture is a local pan.
    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    /// Number of live remote contacts.
    pub fn active_contacts(&self) -> usize {
        self.contacts.len()
    }

    pub fn contact_for(&self, pointer_id: i32) -> Option<u32> {
        self.contacts.get(pointer_id)
    }

    // ── Touch path ───────────────────────────────────────────────

    fn pointer_down(&mut self, pointer_id: i32, sx: f32, sy: f32) {
        if self.pan.is_some() {
            trace!(pointer_id, "extra finger during pan, ignoring");
            return;
        }
        let (x, y) = self.canvas.to_remote(sx, sy);
        if self.off_canvas_panning && self.contacts.is_empty() && !self.canvas.in_bounds(x, y) {
            debug!(pointer_id, x, y, "touch outside desktop, panning locally");
            self.pan = Some(PanGesture {
                pointer_id,
                last_x: sx,
                last_y: sy,
            });
            return;
        }
        let contact_id = self.contacts.allocate(pointer_id);
        self.positions.insert(pointer_id, (x, y));
        debug!(pointer_id, contact_id, x, y, "touch down");
        self.sink.touch_down(x, y, contact_id);
    }

    fn pointers_moved(&mut self, event: &TouchEvent) {
        if let Some(pan) = self.pan.as_mut() {
            if let Some(p) = event.find(pan.pointer_id) {
                let (dx, dy) = (pan.last_x - p.x, pan.last_y - p.y);
                pan.last_x = p.x;
                pan.last_y = p.y;
                self.canvas.pan_by(dx, dy);
            }
            return;
        }
        for p in &event.pointers {
            let Some(contact_id) = self.contacts.get(p.id) else {
                trace!(pointer_id = p.id, "move for unmapped pointer, skipping");
                continue;
            };
            let (x, y) = self.canvas.to_remote(p.x, p.y);
            self.positions.insert(p.id, (x, y));
            self.sink.touch_update(x, y, contact_id);
        }
    }

    fn pointer_up(&mut self, pointer_id: i32, sx: f32, sy: f32) {
        if let Some(pan) = self.pan {
            if pan.pointer_id == pointer_id {
                debug!(pointer_id, "pan finished");
                self.pan = None;
            }
            return;
        }
        let Some(contact_id) = self.contacts.release(pointer_id) else {
            debug!(pointer_id, "up for unmapped pointer, skipping");
            return;
        };
        self.positions.remove(&pointer_id);
        let (x, y) = self.canvas.to_remote(sx, sy);
        debug!(pointer_id, contact_id, x, y, "touch up");
        self.sink.touch_up(x, y, contact_id);
    }

    fn cancel_all(&mut self, event: &TouchEvent) {
        self.pan = None;
        let fallback = event.pointers.first().map(|p| self.canvas.to_remote(p.x, p.y));
        for (pointer_id, contact_id) in self.contacts.drain() {
            let (x, y) = event
                .find(pointer_id)
                .map(|p| self.canvas.to_remote(p.x, p.y))
                .or_else(|| self.positions.get(&pointer_id).copied())
                .or(fallback)
                .unwrap_or((0, 0));
            debug!(pointer_id, contact_id, x, y, "touch cancel");
            self.sink.touch_cancel(x, y, contact_id);
        }
        self.positions.clear();
    }

    // ── Mouse emulation path ─────────────────────────────────────

    fn emulate_mouse(&mut self, event: &TouchEvent) {
        match event.action {
            TouchAction::Down | TouchAction::PointerDown => {
                let Some(p) = event.action_pointer() else { return };
                if self.mouse_pointer.is_some() {
                    return;
                }
                let (x, y) = self.canvas.to_remote(p.x, p.y);
                self.mouse_pointer = Some(p.id);
                self.positions.insert(p.id, (x, y));
                self.sink.move_mouse(x, y);
                self.sink.button_down(MouseButton::Left, x, y);
            }
            TouchAction::Move => {
                let Some(id) = self.mouse_pointer else { return };
                if let Some(p) = event.find(id) {
                    let (x, y) = self.canvas.to_remote(p.x, p.y);
                    self.positions.insert(id, (x, y));
                    self.sink.move_mouse(x, y);
                }
            }
            TouchAction::Up | TouchAction::PointerUp => {
                let Some(p) = event.action_pointer() else { return };
                if self.mouse_pointer != Some(p.id) {
                    return;
                }
                let (x, y) = self.canvas.to_remote(p.x, p.y);
                self.release_mouse(x, y);
            }
            TouchAction::Cancel => {
                if let Some(id) = self.mouse_pointer {
                    let (x, y) = self.positions.get(&id).copied().unwrap_or((0, 0));
                    self.release_mouse(x, y);
                }
            }
        }
    }

    fn release_mouse(&mut self, x: i32, y: i32) {
        self.mouse_pointer = None;
        self.positions.clear();
        self.sink.button_up(MouseButton::Left, x, y);
    }
}

impl InputHandler for DirectTouchHandler {
    fn on_touch_event(&mut self, event: &TouchEvent) -> bool {
        if !self.sink.supports_touch() {
            self.emulate_mouse(event);
            return true;
        }
        match event.action {
            TouchAction::Down | TouchAction::PointerDown => {
                let Some(p) = event.action_pointer().copied() else {
                    return false;
                };
                self.pointer_down(p.id, p.x, p.y);
            }
            TouchAction::Move => self.pointers_moved(event),
            TouchAction::Up | TouchAction::PointerUp => {
                let Some(p) = event.action_pointer().copied() else {
                    return false;
                };
                self.pointer_up(p.id, p.x, p.y);
            }
            TouchAction::Cancel => self.cancel_all(event),
        }
        true
    }

    fn cleanup(&mut self) {
        self.contacts.drain();
        self.positions.clear();
        self.pan = None;
        self.mouse_pointer = None;
    }
}
