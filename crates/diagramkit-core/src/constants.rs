//! Default numeric constants for the interaction engine.
//!
//! Tolerances expressed in pixels are screen-space values; consumers divide
//! them by the current zoom to obtain world-space distances.

/// Handle hit radius, in screen pixels.
pub const HANDLE_TOLERANCE_PX: f64 = 8.0;

/// Object edge hit tolerance, in screen pixels.
pub const HIT_TOLERANCE_PX: f64 = 4.0;

/// Distance between the top edge of a selection and its rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

/// Angular step used when rotation snapping is requested.
pub const ROTATION_SNAP_DEGREES: f64 = 15.0;

/// Repeated clicks within this radius (screen pixels) continue an overlap cycle.
pub const CYCLE_CLICK_TOLERANCE_PX: f64 = 4.0;

/// Creation gestures shorter than this (world units) are discarded.
pub const MIN_SHAPE_EXTENT: f64 = 2.0;

/// Smallest radius or side length a resize may produce (world units).
pub const MIN_RESIZE_EXTENT: f64 = 1.0;

/// Default undo journal depth.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Default number of transitions kept for diagnostics.
pub const DEFAULT_STATE_HISTORY: usize = 64;

/// Default validator cadence, in repaint ticks.
pub const DEFAULT_VALIDATOR_INTERVAL: u32 = 30;

/// Default zoom bounds.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 50.0;

/// Normalizes an angle in degrees into `[0, 360)`.
///
/// Non-finite input maps to `0.0` so a corrupted value can never leak into
/// stored geometry.
pub fn normalize_degrees(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
