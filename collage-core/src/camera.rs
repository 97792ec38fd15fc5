//! Camera and viewport: the pan/zoom transform between screen pixels and
//! canvas coordinates.
//!
//! The render layer draws content with `translate(viewport center) →
//! scale(z) → translate(camera)`; [`screen_to_canvas`] is the exact inverse
//! of that chain, so a pointer event and the block it lands on agree about
//! where in the world the cursor is.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Smallest permitted zoom factor.
pub const MIN_ZOOM: f32 = 0.05;

/// Largest permitted zoom factor.
pub const MAX_ZOOM: f32 = 20.0;

/// The pan/zoom state of the canvas view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Horizontal pan offset in canvas units.
    pub x: f32,
    /// Vertical pan offset in canvas units.
    pub y: f32,
    /// Zoom factor, always within [`MIN_ZOOM`, `MAX_ZOOM`].
    pub z: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        }
    }
}

/// On-screen size of the interactive surface, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    /// Surface width.
    pub width: f32,
    /// Surface height.
    pub height: f32,
}

impl Viewport {
    /// Create a viewport.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The surface's center point in screen space.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Camera {
    /// Pan by raw screen-pixel deltas.
    ///
    /// Deltas are applied unscaled (no division by `z`) so wheel deltas map
    /// directly to camera movement.
    #[must_use]
    pub fn pan(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x - dx,
            y: self.y - dy,
            z: self.z,
        }
    }

    /// Zoom about a fixed screen point.
    ///
    /// The zoom factor steps multiplicatively (`z − delta_z·z`, clamped),
    /// then the pan offset is re-solved so the canvas point that was under
    /// `screen_point` stays under it.
    #[must_use]
    pub fn zoom_at(self, screen_point: Point, delta_z: f32, viewport: Viewport) -> Self {
        let next_z = (self.z - delta_z * self.z).clamp(MIN_ZOOM, MAX_ZOOM);
        let before = screen_to_canvas(screen_point, self, viewport);
        let zoomed = Self { z: next_z, ..self };
        let after = screen_to_canvas(screen_point, zoomed, viewport);
        Self {
            x: self.x + (after.x - before.x),
            y: self.y + (after.y - before.y),
            z: next_z,
        }
    }
}

/// Map a screen point to canvas coordinates under the given camera.
#[must_use]
pub fn screen_to_canvas(screen: Point, camera: Camera, viewport: Viewport) -> Point {
    let center = viewport.center();
    Point::new(
        (screen.x - center.x) / camera.z - camera.x,
        (screen.y - center.y) / camera.z - camera.y,
    )
}

/// Map a canvas point back to screen coordinates under the given camera.
#[must_use]
pub fn canvas_to_screen(canvas: Point, camera: Camera, viewport: Viewport) -> Point {
    let center = viewport.center();
    Point::new(
        (canvas.x + camera.x) * camera.z + center.x,
        (canvas.y + camera.y) * camera.z + center.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-3;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
    }

    #[test]
    fn test_default_camera_centers_origin() {
        let viewport = Viewport::new(800.0, 600.0);
        let canvas = screen_to_canvas(Point::new(400.0, 300.0), Camera::default(), viewport);
        assert!(approx(canvas, Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_round_trip_identity() {
        let viewport = Viewport::new(1280.0, 720.0);
        let cameras = [
            Camera::default(),
            Camera {
                x: 120.0,
                y: -45.0,
                z: 0.25,
            },
            Camera {
                x: -300.5,
                y: 999.0,
                z: 4.0,
            },
            Camera {
                x: 0.0,
                y: 0.0,
                z: 17.5,
            },
        ];
        let p = Point::new(-83.0, 412.5);
        for camera in cameras {
            let round = screen_to_canvas(canvas_to_screen(p, camera, viewport), camera, viewport);
            assert!(approx(round, p), "camera {camera:?} failed: {round:?}");
        }
    }

    #[test]
    fn test_pan_is_unscaled() {
        let camera = Camera {
            x: 10.0,
            y: 20.0,
            z: 4.0,
        };
        let panned = camera.pan(5.0, -3.0);
        assert!((panned.x - 5.0).abs() < EPSILON);
        assert!((panned.y - 23.0).abs() < EPSILON);
        assert!((panned.z - 4.0).abs() < EPSILON);
    }

    #[test]
    fn test_zoom_keeps_cursor_point_fixed() {
        let viewport = Viewport::new(1024.0, 768.0);
        let cursor = Point::new(700.0, 150.0);
        for z in [0.1, 0.5, 1.0, 2.0, 10.0] {
            for delta in [-0.4, -0.05, 0.05, 0.4] {
                let camera = Camera {
                    x: 33.0,
                    y: -7.0,
                    z,
                };
                let before = screen_to_canvas(cursor, camera, viewport);
                let zoomed = camera.zoom_at(cursor, delta, viewport);
                let after = screen_to_canvas(cursor, zoomed, viewport);
                assert!(
                    approx(before, after),
                    "z={z} delta={delta}: {before:?} vs {after:?}"
                );
            }
        }
    }

    #[test]
    fn test_zoom_clamps_to_range() {
        let viewport = Viewport::new(800.0, 600.0);
        let cursor = Point::new(400.0, 300.0);
        let mut camera = Camera::default();
        for _ in 0..40 {
            camera = camera.zoom_at(cursor, 0.9, viewport);
        }
        assert!((camera.z - MIN_ZOOM).abs() < EPSILON);
        for _ in 0..40 {
            camera = camera.zoom_at(cursor, -0.9, viewport);
        }
        assert!((camera.z - MAX_ZOOM).abs() < EPSILON);
    }

    #[test]
    fn test_zoom_step_is_multiplicative() {
        let viewport = Viewport::new(800.0, 600.0);
        let camera = Camera::default().zoom_at(Point::new(400.0, 300.0), 0.25, viewport);
        assert!((camera.z - 0.75).abs() < EPSILON);
    }
}
