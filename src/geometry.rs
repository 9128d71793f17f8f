//! Shared geometric primitives and the pure coordinate math behind pan and drag.
use serde::{Deserialize, Serialize};

/// Displacement, in either axis, above which a pointer drag stops counting as a click.
pub const DRAG_CLASSIFY_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// On-screen rectangle of the base image, or of the whole viewport in fullscreen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportBounds {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
}

impl ViewportBounds {
    pub const fn new(width: f64, height: f64, left: f64, top: f64) -> Self {
        Self {
            width,
            height,
            left,
            top,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScaleRatios {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OffsetOrigin {
    pub x: f64,
    pub y: f64,
}

/// CSS offset applied to the zoom image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub left: f64,
    pub top: f64,
}

impl Position {
    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

pub fn compute_bounds(element: ViewportBounds, viewport: Size, fullscreen: bool) -> ViewportBounds {
    if fullscreen {
        return ViewportBounds::new(viewport.width, viewport.height, 0.0, 0.0);
    }
    element
}

pub fn compute_offset_origin(
    pointer_x: f64,
    pointer_y: f64,
    ref_left: f64,
    ref_top: f64,
) -> OffsetOrigin {
    OffsetOrigin {
        x: pointer_x - ref_left,
        y: pointer_y - ref_top,
    }
}

/// Per-axis size difference between the zoom image and `bounds`, relative to `bounds`.
///
/// `bounds` must come from a laid-out element: a zero width or height yields
/// `NaN` or infinite ratios.
pub fn compute_scale_ratios(bounds: ViewportBounds, zoom_image: Size) -> ScaleRatios {
    ScaleRatios {
        x: (zoom_image.width - bounds.width) / bounds.width,
        y: (zoom_image.height - bounds.height) / bounds.height,
    }
}

pub fn scaled_zoom_size(rendered: Size, zoom_scale: f64) -> Size {
    Size::new(rendered.width * zoom_scale, rendered.height * zoom_scale)
}

/// Pan offset: how far across the thumbnail the pointer sits, mapped onto the zoom image.
pub fn pan_position(
    pointer: Point,
    origin: OffsetOrigin,
    bounds: ViewportBounds,
    ratios: ScaleRatios,
) -> Position {
    let left = (pointer.x - origin.x).min(bounds.width).max(0.0);
    let top = (pointer.y - origin.y).min(bounds.height).max(0.0);

    Position::new(left * -ratios.x, top * -ratios.y)
}

/// Drag offset, clamped so the zoom image never uncovers the area behind it.
pub fn drag_position(
    pointer: Point,
    origin: OffsetOrigin,
    bounds: ViewportBounds,
    zoom_image: Size,
) -> Position {
    let left = (pointer.x - origin.x)
        .min(0.0)
        .max(-(zoom_image.width - bounds.width));
    let top = (pointer.y - origin.y)
        .min(0.0)
        .max(-(zoom_image.height - bounds.height));

    Position::new(left, top)
}

pub fn exceeds_drag_threshold(start: Point, end: Point) -> bool {
    let move_x = (end.x - start.x).abs();
    let move_y = (end.y - start.y).abs();
    move_x > DRAG_CLASSIFY_THRESHOLD || move_y > DRAG_CLASSIFY_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    const THUMB: ViewportBounds = ViewportBounds::new(100.0, 100.0, 0.0, 0.0);

    #[test]
    fn compute_bounds_uses_viewport_in_fullscreen() {
        let element = ViewportBounds::new(300.0, 200.0, 40.0, 80.0);
        let viewport = Size::new(390.0, 844.0);

        assert_eq!(compute_bounds(element, viewport, false), element);
        assert_eq!(
            compute_bounds(element, viewport, true),
            ViewportBounds::new(390.0, 844.0, 0.0, 0.0)
        );
    }

    #[test]
    fn compute_offset_origin_subtracts_reference() {
        let origin = compute_offset_origin(120.0, 75.0, 20.0, -5.0);
        assert_eq!(origin, OffsetOrigin { x: 100.0, y: 80.0 });
    }

    #[test]
    fn scale_ratios_for_double_sized_zoom_image_are_one() {
        let ratios = compute_scale_ratios(THUMB, Size::new(200.0, 200.0));
        assert_eq!(ratios, ScaleRatios { x: 1.0, y: 1.0 });
    }

    #[test]
    fn scale_ratios_are_non_negative_when_zoom_image_is_larger() {
        let bounds = [
            ViewportBounds::new(1.0, 1.0, 0.0, 0.0),
            ViewportBounds::new(320.0, 180.0, 12.0, 9.0),
            ViewportBounds::new(750.0, 500.0, 0.0, 300.0),
        ];
        for bounds in bounds {
            for extra in [0.0, 0.5, 1.0, 64.0, 2_000.0] {
                let zoom = Size::new(bounds.width + extra, bounds.height + extra);
                let ratios = compute_scale_ratios(bounds, zoom);
                assert!(ratios.x >= 0.0, "x ratio for {bounds:?} + {extra}");
                assert!(ratios.y >= 0.0, "y ratio for {bounds:?} + {extra}");
            }
        }
    }

    #[test]
    fn scale_ratios_on_collapsed_bounds_are_not_finite() {
        let ratios = compute_scale_ratios(
            ViewportBounds::new(0.0, 0.0, 0.0, 0.0),
            Size::new(200.0, 0.0),
        );
        assert!(ratios.x.is_infinite());
        assert!(ratios.y.is_nan());
    }

    #[test]
    fn scaled_zoom_size_multiplies_both_axes() {
        assert_eq!(
            scaled_zoom_size(Size::new(400.0, 300.0), 1.5),
            Size::new(600.0, 450.0)
        );
    }

    #[test]
    fn pan_at_thumbnail_center_shows_zoom_center() {
        let ratios = compute_scale_ratios(THUMB, Size::new(200.0, 200.0));
        let position = pan_position(
            Point::new(50.0, 50.0),
            OffsetOrigin::default(),
            THUMB,
            ratios,
        );
        assert_eq!(position, Position::new(-50.0, -50.0));
    }

    #[test]
    fn pan_position_stays_within_scaled_bounds() {
        let bounds = ViewportBounds::new(120.0, 80.0, 10.0, 30.0);
        let ratios = compute_scale_ratios(bounds, Size::new(480.0, 200.0));
        let origin = compute_offset_origin(0.0, 0.0, -bounds.left, -bounds.top);

        for px in [-50.0, 0.0, 10.0, 37.5, 130.0, 131.0, 400.0] {
            for py in [-10.0, 30.0, 70.0, 110.0, 111.0, 900.0] {
                let position = pan_position(Point::new(px, py), origin, bounds, ratios);
                assert!(position.left <= 0.0 && position.left >= -(bounds.width * ratios.x));
                assert!(position.top <= 0.0 && position.top >= -(bounds.height * ratios.y));
            }
        }
    }

    #[test]
    fn drag_position_never_exposes_blank_space() {
        let zoom = Size::new(300.0, 260.0);
        let mut pointer = Point::new(0.0, 0.0);
        let origin = OffsetOrigin::default();

        for (dx, dy) in [
            (-40.0, -15.0),
            (-400.0, 12.0),
            (75.0, -300.0),
            (500.0, 500.0),
            (-3.0, -3.0),
        ] {
            pointer.x += dx;
            pointer.y += dy;
            let position = drag_position(pointer, origin, THUMB, zoom);
            assert!(position.left <= 0.0 && position.left >= -(zoom.width - THUMB.width));
            assert!(position.top <= 0.0 && position.top >= -(zoom.height - THUMB.height));
        }
    }

    #[test]
    fn drag_threshold_is_strictly_greater_than_five() {
        let start = Point::new(10.0, 10.0);
        assert!(exceeds_drag_threshold(start, Point::new(16.0, 10.0)));
        assert!(exceeds_drag_threshold(start, Point::new(10.0, 4.0)));
        assert!(!exceeds_drag_threshold(start, Point::new(14.0, 10.0)));
        assert!(!exceeds_drag_threshold(start, Point::new(15.0, 15.0)));
    }
}
