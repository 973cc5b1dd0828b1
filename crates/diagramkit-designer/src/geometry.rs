//! Geometry engine.
//!
//! Pure functions over [`DiagramObject`]s: rotated bounds, hit-testing,
//! handle lookup, per-type resize, rotation drags and connector attachment
//! points. Shape records store unrotated geometry; every function here
//! applies the object's rotation about the center of the unrotated bounds.

use diagramkit_core::constants::{normalize_degrees, MIN_RESIZE_EXTENT};
use diagramkit_settings::InteractionSettings;

use crate::model::{
    rotate_point, Bounds, DiagramObject, Endpoint, Point, ResizeMode, Shape, ShapeGeometry,
};

/// Distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance_to(&a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance_to(&Point::new(a.x + t * dx, a.y + t * dy))
}

/// Distance from `p` to a polyline, optionally closed.
pub fn polyline_distance(p: Point, points: &[Point], closed: bool) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => p.distance_to(only),
        _ => {
            let open = points
                .windows(2)
                .map(|w| distance_to_segment(p, w[0], w[1]))
                .fold(f64::INFINITY, f64::min);
            if closed {
                let (first, last) = (points[0], points[points.len() - 1]);
                open.min(distance_to_segment(p, last, first))
            } else {
                open
            }
        }
    }
}

/// Even-odd point-in-polygon test.
pub fn point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

pub fn quad_bezier_point(start: Point, control: Point, end: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    Point::new(
        mt * mt * start.x + 2.0 * mt * t * control.x + t * t * end.x,
        mt * mt * start.y + 2.0 * mt * t * control.y + t * t * end.y,
    )
}

/// Vertices of a regular polygon. The first vertex points up (angle
/// `-π/2`) before `rotation_deg` is applied.
pub fn regular_polygon_vertices(
    center: Point,
    radius: f64,
    sides: u32,
    rotation_deg: f64,
) -> Vec<Point> {
    let n = sides.max(3);
    let offset = rotation_deg.to_radians();
    (0..n)
        .map(|i| {
            let angle =
                std::f64::consts::TAU * i as f64 / n as f64 - std::f64::consts::FRAC_PI_2 + offset;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

/// Center of the unrotated bounds; the pivot for rotation.
pub fn center(obj: &DiagramObject) -> Point {
    obj.shape.local_bounds().center()
}

/// Maps a world point into the object's unrotated frame.
pub fn to_local(obj: &DiagramObject, p: Point) -> Point {
    rotate_point(p, center(obj), -obj.rotation())
}

pub fn to_world(obj: &DiagramObject, p: Point) -> Point {
    rotate_point(p, center(obj), obj.rotation())
}

/// World-space outline with rotation applied.
pub fn world_outline(obj: &DiagramObject) -> Vec<Point> {
    let c = center(obj);
    let rotation = obj.rotation();
    obj.shape
        .outline()
        .into_iter()
        .map(|p| rotate_point(p, c, rotation))
        .collect()
}

/// Axis-aligned world bounds including rotation.
pub fn bounds(obj: &DiagramObject) -> Bounds {
    let local = obj.shape.local_bounds();
    let rotation = obj.rotation();
    if rotation == 0.0 {
        return local;
    }
    let c = local.center();
    match &obj.shape {
        Shape::Circle(_) => local,
        Shape::Ellipse(e) => {
            let (s, co) = rotation.to_radians().sin_cos();
            let hw = ((e.rx * co).powi(2) + (e.ry * s).powi(2)).sqrt();
            let hh = ((e.rx * s).powi(2) + (e.ry * co).powi(2)).sqrt();
            Bounds::new(c.x - hw, c.y - hh, c.x + hw, c.y + hh)
        }
        Shape::Rectangle(_) | Shape::Text(_) => {
            rotated_bounds(local.corners().iter().copied(), c, rotation).unwrap_or(local)
        }
        Shape::TaperedLine(t) => {
            let widest = t.start_width.max(t.end_width) / 2.0;
            rotated_bounds(obj.shape.outline(), c, rotation)
                .map(|b| b.inflate(widest))
                .unwrap_or(local)
        }
        _ => {
            // point-based shapes: rotated points plus the pivot
            let mut b = rotated_bounds(obj.shape.outline(), c, rotation).unwrap_or(local);
            b.expand_to(c);
            b
        }
    }
}

fn rotated_bounds<I: IntoIterator<Item = Point>>(
    points: I,
    pivot: Point,
    rotation: f64,
) -> Option<Bounds> {
    Bounds::from_points(
        points
            .into_iter()
            .map(|p| rotate_point(p, pivot, rotation)),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HitMode {
    /// Bounding-box containment, inflated by the tolerance.
    #[default]
    Bounds,
    /// True fill test for filled shapes, outline distance otherwise.
    Precise,
}

/// Hit-tests a world point against an object.
///
/// Linear shapes are always tested against their stroke; the bounding box
/// of a diagonal line is not a meaningful target.
pub fn contains(obj: &DiagramObject, p: Point, tolerance: f64, mode: HitMode) -> bool {
    let local = to_local(obj, p);
    if mode == HitMode::Bounds && !obj.kind().is_linear() {
        return obj.shape.local_bounds().inflate(tolerance).contains(local);
    }
    let interior = obj.is_filled() || matches!(obj.shape, Shape::Text(_) | Shape::TaperedLine(_));
    if interior && obj.shape.contains_local(local) {
        return true;
    }
    obj.shape.edge_distance(local) <= tolerance + obj.style.stroke_width / 2.0
}

/// Interactive handles of a selected object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    Start,
    End,
    Control,
    Rotate,
}

impl Handle {
    pub const BOX: [Handle; 8] = [
        Handle::TopLeft,
        Handle::Top,
        Handle::TopRight,
        Handle::Right,
        Handle::BottomRight,
        Handle::Bottom,
        Handle::BottomLeft,
        Handle::Left,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Handle::TopLeft | Handle::TopRight | Handle::BottomRight | Handle::BottomLeft
        )
    }

    pub fn endpoint(self) -> Option<Endpoint> {
        match self {
            Handle::Start => Some(Endpoint::Start),
            Handle::End => Some(Endpoint::End),
            _ => None,
        }
    }

    /// Position of a box handle on `b`.
    fn on_bounds(self, b: &Bounds) -> Option<Point> {
        let c = b.center();
        let p = match self {
            Handle::TopLeft => Point::new(b.min_x, b.min_y),
            Handle::Top => Point::new(c.x, b.min_y),
            Handle::TopRight => Point::new(b.max_x, b.min_y),
            Handle::Right => Point::new(b.max_x, c.y),
            Handle::BottomRight => Point::new(b.max_x, b.max_y),
            Handle::Bottom => Point::new(c.x, b.max_y),
            Handle::BottomLeft => Point::new(b.min_x, b.max_y),
            Handle::Left => Point::new(b.min_x, c.y),
            _ => return None,
        };
        Some(p)
    }
}

/// World units covered by one screen pixel; unusable zoom values count as 1.
pub fn world_per_px(zoom: f64) -> f64 {
    if zoom.is_finite() && zoom > 0.0 {
        1.0 / zoom
    } else {
        1.0
    }
}

/// Screen-space handle sizes converted to world units at a zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleMetrics {
    pub zoom: f64,
    pub tolerance_px: f64,
    pub rotate_offset_px: f64,
}

impl HandleMetrics {
    pub fn new(zoom: f64, settings: &InteractionSettings) -> Self {
        Self {
            zoom,
            tolerance_px: settings.handle_tolerance_px,
            rotate_offset_px: settings.rotate_handle_offset_px,
        }
    }

    fn scale(&self) -> f64 {
        world_per_px(self.zoom)
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance_px * self.scale()
    }

    pub fn rotate_offset(&self) -> f64 {
        self.rotate_offset_px * self.scale()
    }
}

/// World positions of every handle the object offers.
pub fn handle_positions(obj: &DiagramObject, metrics: &HandleMetrics) -> Vec<(Handle, Point)> {
    let kind = obj.kind();
    let local = obj.shape.local_bounds();
    let mut handles = Vec::with_capacity(10);
    if let Some((start, end)) = obj.shape.endpoints() {
        handles.push((Handle::Start, start));
        handles.push((Handle::End, end));
        if let Some(control) = obj.shape.control_point() {
            handles.push((Handle::Control, control));
        }
    } else {
        for handle in Handle::BOX {
            if let Some(p) = handle.on_bounds(&local) {
                handles.push((handle, p));
            }
        }
    }
    if kind.supports_rotation() {
        let c = local.center();
        handles.push((
            Handle::Rotate,
            Point::new(c.x, local.min_y - metrics.rotate_offset()),
        ));
    }
    handles
        .into_iter()
        .map(|(h, p)| (h, to_world(obj, p)))
        .collect()
}

/// The handle nearest `p` within the zoom-scaled tolerance.
pub fn handle_at(p: Point, obj: &DiagramObject, metrics: &HandleMetrics) -> Option<Handle> {
    let tolerance = metrics.tolerance();
    handle_positions(obj, metrics)
        .into_iter()
        .map(|(h, at)| (h, at.distance_to(&p)))
        .filter(|(_, d)| *d <= tolerance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(h, _)| h)
}

/// Applies a handle drag to a snapshot of the object.
///
/// `pointer` is in world space. The result is computed from `original` each
/// time, so repeated calls during a drag never accumulate error. Points the
/// handle does not move stay fixed in world space under rotation.
pub fn resize_object(
    original: &DiagramObject,
    handle: Handle,
    pointer: Point,
    keep_aspect: bool,
) -> DiagramObject {
    let mut obj = original.clone();
    let pivot = center(original);
    let rotation = original.rotation();
    let local = rotate_point(pointer, pivot, -rotation);
    let lb = original.shape.local_bounds();

    match handle {
        Handle::Rotate => return obj,
        Handle::Start | Handle::End => {
            if let Some(which) = handle.endpoint() {
                obj.shape.set_endpoint(which, local);
            }
        }
        Handle::Control => obj.shape.set_control_point(local),
        _ => match original.kind().resize_mode() {
            ResizeMode::Uniform => {
                let dx = (local.x - pivot.x).abs();
                let dy = (local.y - pivot.y).abs();
                let radius = match handle {
                    Handle::Left | Handle::Right => dx,
                    Handle::Top | Handle::Bottom => dy,
                    _ => dx.max(dy),
                }
                .max(MIN_RESIZE_EXTENT / 2.0);
                match &mut obj.shape {
                    Shape::Circle(c) => c.radius = radius,
                    Shape::RegularPolygon(p) => p.radius = radius,
                    _ => {}
                }
            }
            ResizeMode::Box => {
                let nb = resize_bounds(&lb, handle, local, keep_aspect);
                match &mut obj.shape {
                    Shape::Rectangle(r) => r.set_bounds(nb),
                    Shape::Text(t) => t.set_bounds(nb),
                    Shape::Ellipse(e) => *e = crate::model::DiagramEllipse::from_bounds(nb),
                    _ => {}
                }
            }
            ResizeMode::PointScale => {
                let nb = resize_bounds(&lb, handle, local, true);
                let scale = if lb.width() > 0.0 {
                    nb.width() / lb.width()
                } else if lb.height() > 0.0 {
                    nb.height() / lb.height()
                } else {
                    1.0
                };
                let anchor = opposite_anchor(&lb, handle);
                if let Shape::Freehand(path) | Shape::Polyline(path) = &mut obj.shape {
                    path.scale_about(anchor, scale, scale);
                }
            }
            ResizeMode::Endpoints => {}
        },
    }

    if rotation != 0.0 {
        let new_center = center(&obj);
        let desired = rotate_point(new_center, pivot, rotation);
        obj.shape
            .translate(desired.x - new_center.x, desired.y - new_center.y);
    }
    obj
}

/// Fixed point for a box handle drag.
fn opposite_anchor(b: &Bounds, handle: Handle) -> Point {
    let c = b.center();
    match handle {
        Handle::TopLeft => Point::new(b.max_x, b.max_y),
        Handle::Top => Point::new(c.x, b.max_y),
        Handle::TopRight => Point::new(b.min_x, b.max_y),
        Handle::Right => Point::new(b.min_x, c.y),
        Handle::BottomRight => Point::new(b.min_x, b.min_y),
        Handle::Bottom => Point::new(c.x, b.min_y),
        Handle::BottomLeft => Point::new(b.max_x, b.min_y),
        Handle::Left => Point::new(b.max_x, c.y),
        _ => c,
    }
}

/// Moves the edges `handle` controls to `p`. Edges never cross the fixed
/// side; each extent stays at least [`MIN_RESIZE_EXTENT`].
pub fn resize_bounds(b: &Bounds, handle: Handle, p: Point, keep_aspect: bool) -> Bounds {
    let min = MIN_RESIZE_EXTENT;
    let (mut x0, mut y0, mut x1, mut y1) = (b.min_x, b.min_y, b.max_x, b.max_y);
    let moves_left = matches!(handle, Handle::TopLeft | Handle::Left | Handle::BottomLeft);
    let moves_right = matches!(
        handle,
        Handle::TopRight | Handle::Right | Handle::BottomRight
    );
    let moves_top = matches!(handle, Handle::TopLeft | Handle::Top | Handle::TopRight);
    let moves_bottom = matches!(
        handle,
        Handle::BottomLeft | Handle::Bottom | Handle::BottomRight
    );
    if moves_left {
        x0 = p.x.min(x1 - min);
    }
    if moves_right {
        x1 = p.x.max(x0 + min);
    }
    if moves_top {
        y0 = p.y.min(y1 - min);
    }
    if moves_bottom {
        y1 = p.y.max(y0 + min);
    }

    let (w0, h0) = (b.width(), b.height());
    if keep_aspect && w0 > 0.0 && h0 > 0.0 {
        let s = if handle.is_corner() {
            ((x1 - x0) / w0).max((y1 - y0) / h0)
        } else if moves_left || moves_right {
            (x1 - x0) / w0
        } else {
            (y1 - y0) / h0
        };
        let (w, h) = (w0 * s, h0 * s);
        if moves_left {
            x0 = x1 - w;
        } else if moves_right {
            x1 = x0 + w;
        } else {
            let cx = b.center().x;
            x0 = cx - w / 2.0;
            x1 = cx + w / 2.0;
        }
        if moves_top {
            y0 = y1 - h;
        } else if moves_bottom {
            y1 = y0 + h;
        } else {
            let cy = b.center().y;
            y0 = cy - h / 2.0;
            y1 = cy + h / 2.0;
        }
    }
    Bounds::new(x0, y0, x1, y1)
}

/// Snaps `degrees` to the nearest multiple of `step`.
pub fn snap_angle(degrees: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return degrees;
    }
    (degrees / step).round() * step
}

/// Rotation produced by dragging the rotate handle from `start` to
/// `current` around `pivot`. The result is normalized to `[0, 360)`.
pub fn rotation_for_drag(
    pivot: Point,
    start: Point,
    current: Point,
    original: f64,
    snap_step: Option<f64>,
) -> f64 {
    let a0 = (start.y - pivot.y).atan2(start.x - pivot.x);
    let a1 = (current.y - pivot.y).atan2(current.x - pivot.x);
    let raw = original + (a1 - a0).to_degrees();
    let snapped = match snap_step {
        Some(step) => snap_angle(raw, step),
        None => raw,
    };
    normalize_degrees(snapped)
}

/// Where a connector meets `obj` when heading toward `toward`.
///
/// Casts a ray from the object's center through `toward` and returns its
/// exit point from the outline, in world space.
pub fn attachment_point(obj: &DiagramObject, toward: Point) -> Point {
    let c = center(obj);
    let target = to_local(obj, toward);
    let dir = target - c;
    let len = dir.length();
    if len < f64::EPSILON {
        return c;
    }
    let local_hit = match &obj.shape {
        Shape::Circle(circle) => circle.center + dir * (circle.radius / len),
        Shape::Ellipse(e) if e.rx > 0.0 && e.ry > 0.0 => {
            let t = 1.0 / ((dir.x / e.rx).powi(2) + (dir.y / e.ry).powi(2)).sqrt();
            c + dir * t
        }
        Shape::Rectangle(_) | Shape::Text(_) => box_exit(&obj.shape.local_bounds(), c, dir),
        _ => {
            let outline = obj.shape.outline();
            ray_exit(c, dir, &outline, obj.shape.has_area())
                .map(|t| c + dir * t)
                .unwrap_or_else(|| box_exit(&obj.shape.local_bounds(), c, dir))
        }
    };
    to_world(obj, local_hit)
}

fn box_exit(b: &Bounds, c: Point, dir: Point) -> Point {
    let hw = b.width() / 2.0;
    let hh = b.height() / 2.0;
    let tx = if dir.x.abs() > f64::EPSILON {
        hw / dir.x.abs()
    } else {
        f64::INFINITY
    };
    let ty = if dir.y.abs() > f64::EPSILON {
        hh / dir.y.abs()
    } else {
        f64::INFINITY
    };
    let t = tx.min(ty);
    if t.is_finite() {
        c + dir * t
    } else {
        c
    }
}

/// Largest ray parameter at which `origin + t*dir` crosses the outline.
fn ray_exit(origin: Point, dir: Point, outline: &[Point], closed: bool) -> Option<f64> {
    if outline.len() < 2 {
        return None;
    }
    let mut segments: Vec<(Point, Point)> = outline.windows(2).map(|w| (w[0], w[1])).collect();
    if closed {
        segments.push((outline[outline.len() - 1], outline[0]));
    }
    segments
        .into_iter()
        .filter_map(|(a, b)| {
            let e = b - a;
            let denom = dir.x * e.y - dir.y * e.x;
            if denom.abs() < f64::EPSILON {
                return None;
            }
            let w = a - origin;
            let t = (w.x * e.y - w.y * e.x) / denom;
            let u = (w.x * dir.y - w.y * dir.x) / denom;
            (t >= 0.0 && (0.0..=1.0).contains(&u)).then_some(t)
        })
        .max_by(f64::total_cmp)
}
