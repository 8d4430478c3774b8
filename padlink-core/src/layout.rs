//! On-screen virtual button placement and hit testing.

use crate::config::{ButtonConfig, ButtonSpec, default_layout};
use crate::keycode::KeyCode;

// ── Rect ─────────────────────────────────────────────────────────

/// Axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Square of edge `size` centred on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, size: f32) -> Self {
        Self::new(cx - size / 2.0, cy - size / 2.0, size, size)
    }

    /// Inclusive on all four edges.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left
            && x <= self.left + self.width
            && y >= self.top
            && y <= self.top + self.height
    }
}

// ── VirtualButton ────────────────────────────────────────────────

/// A placed on-screen button.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualButton {
    pub label: String,
    pub key: KeyCode,
    pub rect: Rect,
}

// ── ButtonLayout ─────────────────────────────────────────────────

/// All virtual buttons for one screen size.
#[derive(Debug, Clone, Default)]
pub struct ButtonLayout {
    buttons: Vec<VirtualButton>,
}

impl ButtonLayout {
    /// Place `specs` on a `width × height` screen with square buttons of
    /// edge `size_px`.
    pub fn from_specs(specs: &[ButtonSpec], width: u32, height: u32, size_px: f32) -> Self {
        let buttons = specs
            .iter()
            .map(|spec| VirtualButton {
                label: spec.label.clone(),
                key: spec.key,
                rect: Rect::centered(spec.x * width as f32, spec.y * height as f32, size_px),
            })
            .collect();
        Self { buttons }
    }

    /// The default layout on a `width × height` screen of the given
    /// density, with the default button size.
    pub fn default_for(width: u32, height: u32, density: f32) -> Self {
        let size_px = ButtonConfig::default().size_dp * density;
        Self::from_specs(&default_layout(), width, height, size_px)
    }

    /// Index of the first button containing `(x, y)`.
    pub fn hit(&self, x: f32, y: f32) -> Option<usize> {
        self.buttons.iter().position(|b| b.rect.contains(x, y))
    }

    pub fn button(&self, index: usize) -> Option<&VirtualButton> {
        self.buttons.get(index)
    }

    /// Find a button by key code.
    pub fn find_key(&self, key: KeyCode) -> Option<usize> {
        self.buttons.iter().position(|b| b.key == key)
    }

    pub fn buttons(&self) -> &[VirtualButton] {
        &self.buttons
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}
