//! Virtual analog sticks.
//!
//! Each stick is `Unbound` until a qualifying touch lands in its half of
//! the screen; the touch-down position becomes the stick centre. While
//! bound, every move is turned into a normalized vector:
//!
//! ```text
//!   delta   = touch - centre
//!   clamped = delta scaled onto the disk of radius R (if |delta| > R)
//!   norm    = clamped / R                      ∈ unit disk
//!   norm    = (0, 0) if |x| < dz and |y| < dz  (deadzone)
//!   stick_y = -norm.y                          (screen-down is stick-down)
//! ```
//!
//! The side a pointer belongs to is fixed at touch-down; moving across
//! the midline later does not swap sticks.

use serde::{Deserialize, Serialize};

/// Wire scale for a full-deflection axis.
pub const AXIS_SCALE: f32 = 32767.0;

/// Which physical stick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StickSide {
    Left,
    Right,
}

// ── StickGeometry ────────────────────────────────────────────────

/// Travel radius and deadzone shared by both sticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickGeometry {
    /// Radius in pixels at which the stick reaches full deflection.
    pub max_radius: f32,
    /// Per-axis deadzone on the normalized value.
    pub deadzone: f32,
}

impl StickGeometry {
    pub fn new(max_radius: f32, deadzone: f32) -> Self {
        Self {
            max_radius,
            deadzone,
        }
    }

    /// Clamp `(dx, dy)` onto the travel disk. Returns the clamped pixel
    /// offset (for drawing the knob).
    pub fn clamp(&self, dx: f32, dy: f32) -> (f32, f32) {
        let distance = (dx * dx + dy * dy).sqrt();
        if distance > self.max_radius {
            let ratio = self.max_radius / distance;
            (dx * ratio, dy * ratio)
        } else {
            (dx, dy)
        }
    }

    /// Normalize a screen-space offset to the unit disk and apply the
    /// deadzone. Screen orientation is kept; Y is not inverted here.
    pub fn normalize(&self, dx: f32, dy: f32) -> (f32, f32) {
        let (cx, cy) = self.clamp(dx, dy);
        let nx = cx / self.max_radius;
        let ny = cy / self.max_radius;
        if nx.abs() < self.deadzone && ny.abs() < self.deadzone {
            (0.0, 0.0)
        } else {
            (nx, ny)
        }
    }
}

// ── StickState ───────────────────────────────────────────────────

/// One stick: which pointer drives it, its centre and current value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StickState {
    pub pointer_id: Option<i32>,
    pub center_x: f32,
    pub center_y: f32,
    /// Normalized X, right positive.
    pub x: f32,
    /// Normalized Y, up positive.
    pub y: f32,
}

impl StickState {
    pub fn is_bound(&self) -> bool {
        self.pointer_id.is_some()
    }

    fn bind(&mut self, pointer_id: i32, x: f32, y: f32) {
        *self = Self {
            pointer_id: Some(pointer_id),
            center_x: x,
            center_y: y,
            x: 0.0,
            y: 0.0,
        };
    }

    /// Recompute the value for a touch at `(x, y)`. Returns the clamped
    /// knob position in screen space.
    fn update(&mut self, x: f32, y: f32, geometry: &StickGeometry) -> (f32, f32) {
        let dx = x - self.center_x;
        let dy = y - self.center_y;
        let (nx, ny) = geometry.normalize(dx, dy);
        self.x = nx;
        self.y = -ny;
        let (kx, ky) = geometry.clamp(dx, dy);
        (self.center_x + kx, self.center_y + ky)
    }

    fn release(&mut self) {
        self.pointer_id = None;
        self.x = 0.0;
        self.y = 0.0;
    }
}

// ── StickAxes ────────────────────────────────────────────────────

/// Both sticks' normalized values, as sent in one combined frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StickAxes {
    pub left_x: f32,
    pub left_y: f32,
    pub right_x: f32,
    pub right_y: f32,
}

impl StickAxes {
    pub const CENTERED: StickAxes = StickAxes {
        left_x: 0.0,
        left_y: 0.0,
        right_x: 0.0,
        right_y: 0.0,
    };

    /// Scale to the wire's signed 16-bit range.
    pub fn to_wire(self) -> [i16; 4] {
        [
            scale_axis(self.left_x),
            scale_axis(self.left_y),
            scale_axis(self.right_x),
            scale_axis(self.right_y),
        ]
    }
}

fn scale_axis(v: f32) -> i16 {
    (v.clamp(-1.0, 1.0) * AXIS_SCALE) as i16
}

// ── DualStick ────────────────────────────────────────────────────

/// Left and right sticks, split at the screen's horizontal midpoint.
#[derive(Debug, Clone)]
pub struct DualStick {
    left: StickState,
    right: StickState,
    geometry: StickGeometry,
    mid_x: f32,
}

impl DualStick {
    pub fn new(geometry: StickGeometry, screen_width: u32) -> Self {
        Self {
            left: StickState::default(),
            right: StickState::default(),
            geometry,
            mid_x: screen_width as f32 / 2.0,
        }
    }

    /// Move the split point after a screen size change.
    pub fn set_screen_width(&mut self, width: u32) {
        self.mid_x = width as f32 / 2.0;
    }

    pub fn side_for(&self, x: f32) -> StickSide {
        if x < self.mid_x {
            StickSide::Left
        } else {
            StickSide::Right
        }
    }

    pub fn stick(&self, side: StickSide) -> &StickState {
        match side {
            StickSide::Left => &self.left,
            StickSide::Right => &self.right,
        }
    }

    fn stick_mut(&mut self, side: StickSide) -> &mut StickState {
        match side {
            StickSide::Left => &mut self.left,
            StickSide::Right => &mut self.right,
        }
    }

    /// The stick `pointer_id` drives, if any.
    pub fn side_of(&self, pointer_id: i32) -> Option<StickSide> {
        if self.left.pointer_id == Some(pointer_id) {
            Some(StickSide::Left)
        } else if self.right.pointer_id == Some(pointer_id) {
            Some(StickSide::Right)
        } else {
            None
        }
    }

    /// Bind the stick for the half containing `(x, y)` if it is free.
    /// A pointer already driving a stick is left alone.
    pub fn bind(&mut self, pointer_id: i32, x: f32, y: f32) -> Option<StickSide> {
        if self.side_of(pointer_id).is_some() {
            return None;
        }
        let side = self.side_for(x);
        let stick = self.stick_mut(side);
        if stick.is_bound() {
            return None;
        }
        stick.bind(pointer_id, x, y);
        Some(side)
    }

    /// Update the stick driven by `pointer_id`. Returns the side and the
    /// clamped knob position.
    pub fn update(&mut self, pointer_id: i32, x: f32, y: f32) -> Option<(StickSide, (f32, f32))> {
        let side = self.side_of(pointer_id)?;
        let geometry = self.geometry;
        let knob = self.stick_mut(side).update(x, y, &geometry);
        Some((side, knob))
    }

    /// Release the stick driven by `pointer_id`, zeroing its axes.
    pub fn release(&mut self, pointer_id: i32) -> Option<StickSide> {
        let side = self.side_of(pointer_id)?;
        self.stick_mut(side).release();
        Some(side)
    }

    /// Release both sticks. Returns `true` if either was bound.
    pub fn release_all(&mut self) -> bool {
        let any = self.any_bound();
        self.left.release();
        self.right.release();
        any
    }

    pub fn any_bound(&self) -> bool {
        self.left.is_bound() || self.right.is_bound()
    }

    /// Current values of both sticks.
    pub fn axes(&self) -> StickAxes {
        StickAxes {
            left_x: self.left.x,
            left_y: self.left.y,
            right_x: self.right.x,
            right_y: self.right.y,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
