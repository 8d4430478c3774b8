//! Console stand-ins for the session's transport, keyboard, notifier and
//! canvas. Every outbound call is printed as one JSON line on stdout.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;
use tracing::{debug, info};

use padlink_core::config::DisplayConfig;
use padlink_core::{
    Canvas, ControllerArrival, ControllerFrame, ControllerTransport, KeyCode, KeyboardSink,
    MouseButton, Notifier, PointerSink,
};

/// Prints every wire call it receives.
#[derive(Debug)]
pub struct ConsoleWire {
    touch: bool,
    calls: AtomicUsize,
}

impl ConsoleWire {
    /// `touch` decides whether the pretend protocol carries touch frames.
    pub fn new(touch: bool) -> Self {
        Self {
            touch,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of calls printed so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn emit(&self, call: serde_json::Value) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        debug!(%call, "wire");
        println!("{call}");
    }

    fn touch_call(&self, kind: &str, x: i32, y: i32, contact_id: u32) {
        self.emit(json!({ "call": kind, "x": x, "y": y, "contact": contact_id }));
    }
}

impl PointerSink for ConsoleWire {
    fn supports_touch(&self) -> bool {
        self.touch
    }

    fn touch_down(&self, x: i32, y: i32, contact_id: u32) {
        self.touch_call("touch_down", x, y, contact_id);
    }

    fn touch_update(&self, x: i32, y: i32, contact_id: u32) {
        self.touch_call("touch_update", x, y, contact_id);
    }

    fn touch_up(&self, x: i32, y: i32, contact_id: u32) {
        self.touch_call("touch_up", x, y, contact_id);
    }

    fn touch_cancel(&self, x: i32, y: i32, contact_id: u32) {
        self.touch_call("touch_cancel", x, y, contact_id);
    }

    fn move_mouse(&self, x: i32, y: i32) {
        self.emit(json!({ "call": "move_mouse", "x": x, "y": y }));
    }

    fn button_down(&self, button: MouseButton, x: i32, y: i32) {
        self.emit(json!({ "call": "button_down", "button": button, "x": x, "y": y }));
    }

    fn button_up(&self, button: MouseButton, x: i32, y: i32) {
        self.emit(json!({ "call": "button_up", "button": button, "x": x, "y": y }));
    }

    fn scroll(&self, x: i32, y: i32, dx: i32, dy: i32) {
        self.emit(json!({ "call": "scroll", "x": x, "y": y, "dx": dx, "dy": dy }));
    }
}

impl KeyboardSink for ConsoleWire {
    fn key_event(&self, key: KeyCode, down: bool) {
        self.emit(json!({ "call": "key", "key": key, "down": down }));
    }
}

impl ControllerTransport for ConsoleWire {
    fn send_controller_arrival(&self, arrival: &ControllerArrival) {
        self.emit(json!({ "call": "controller_arrival", "arrival": arrival }));
    }

    fn send_controller_input(&self, frame: &ControllerFrame) {
        self.emit(json!({
            "call": "controller_input",
            "buttons": frame.buttons.bits(),
            "lt": frame.left_trigger,
            "rt": frame.right_trigger,
            "lx": frame.left_stick_x,
            "ly": frame.left_stick_y,
            "rx": frame.right_stick_x,
            "ry": frame.right_stick_y,
        }));
    }
}

impl Notifier for ConsoleWire {
    fn notify(&self, message: &str) {
        info!("notification: {message}");
        self.emit(json!({ "call": "notify", "message": message }));
    }
}

// ── Canvas ───────────────────────────────────────────────────────

/// A fixed-zoom view over a desktop the size of the configured display.
#[derive(Debug)]
pub struct StaticCanvas {
    zoom: f32,
    width: u32,
    height: u32,
    origin: Mutex<(f32, f32)>,
}

impl StaticCanvas {
    pub fn new(display: &DisplayConfig, zoom: f32) -> Self {
        Self {
            zoom,
            width: display.width,
            height: display.height,
            origin: Mutex::new((0.0, 0.0)),
        }
    }

    fn origin(&self) -> (f32, f32) {
        self.origin.lock().map(|o| *o).unwrap_or((0.0, 0.0))
    }
}

impl Canvas for StaticCanvas {
    fn zoom_factor(&self) -> f32 {
        self.zoom
    }

    fn abs_x(&self) -> f32 {
        self.origin().0
    }

    fn abs_y(&self) -> f32 {
        self.origin().1
    }

    fn image_width(&self) -> u32 {
        self.width
    }

    fn image_height(&self) -> u32 {
        self.height
    }

    fn pan_by(&self, dx: f32, dy: f32) {
        if let Ok(mut origin) = self.origin.lock() {
            origin.0 += dx / self.zoom;
            origin.1 += dy / self.zoom;
            debug!(x = origin.0, y = origin.1, "view panned");
        }
    }
}
