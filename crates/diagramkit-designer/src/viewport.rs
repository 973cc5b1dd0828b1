//! Viewport scalars.
//!
//! The host owns the real viewport transform; the editor mirrors its zoom
//! and pan so tools can convert screen tolerances into world units and the
//! validator can clamp values that drifted out of range.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f64,
    /// Screen-space offset of the world origin.
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl Viewport {
    pub fn new(zoom: f64, pan_x: f64, pan_y: f64) -> Self {
        Self { zoom, pan_x, pan_y }
    }

    /// Moves content by a world-space delta at the current zoom.
    pub fn pan_by_world(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx * self.zoom;
        self.pan_y += dy * self.zoom;
    }

    pub fn world_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.zoom + self.pan_x, y * self.zoom + self.pan_y)
    }

    pub fn screen_to_world(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.pan_x) / self.zoom, (y - self.pan_y) / self.zoom)
    }

    /// Brings zoom into `[min_zoom, max_zoom]` and replaces non-finite pan
    /// with zero. Returns the names of the fields that changed.
    pub fn clamp(&mut self, min_zoom: f64, max_zoom: f64) -> Vec<&'static str> {
        let mut changed = Vec::new();
        let zoom = if self.zoom.is_finite() {
            self.zoom.clamp(min_zoom, max_zoom)
        } else {
            1.0_f64.clamp(min_zoom, max_zoom)
        };
        if zoom != self.zoom {
            self.zoom = zoom;
            changed.push("zoom");
        }
        if !self.pan_x.is_finite() {
            self.pan_x = 0.0;
            changed.push("pan_x");
        }
        if !self.pan_y.is_finite() {
            self.pan_y = 0.0;
            changed.push("pan_y");
        }
        changed
    }
}
