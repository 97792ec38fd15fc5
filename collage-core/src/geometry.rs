//! Geometry kernel: rotation, containment, intersection, and aspect math.
//!
//! All angles are radians, positive counter-clockwise. Rotation values may
//! exceed ±2π; the trigonometric helpers here are the only consumers and are
//! periodic, so callers never need to normalize.

use serde::{Deserialize, Serialize};

/// A point in either screen or canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// An axis-aligned rectangle (top-left anchored).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width, ≥ 0.
    pub width: f32,
    /// Height, ≥ 0.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalized rectangle spanning two arbitrary corner points.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// The four corners, clockwise from top-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y + self.height),
        ]
    }

    /// Boundary-inclusive containment test.
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Half-open AABB overlap test (shared edges do not count as overlap).
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Axis-aligned bounding rectangle of a point set.
    ///
    /// Returns `None` for an empty set.
    #[must_use]
    pub fn bounding(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }
}

/// Rotate a point around a center by `angle` radians.
#[must_use]
pub fn rotate_around(point: Point, center: Point, angle: f32) -> Point {
    let (sin, cos) = angle.sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point::new(
        dx * cos - dy * sin + center.x,
        dx * sin + dy * cos + center.y,
    )
}

/// Boundary-inclusive test for a point against a rectangle rotated about its
/// own center.
///
/// Inverse-rotates the point into the rectangle's local frame, then tests
/// axis-aligned containment.
#[must_use]
pub fn point_in_rotated_rect(point: Point, rect: &Rect, rotation: f32) -> bool {
    let local = rotate_around(point, rect.center(), -rotation);
    rect.contains_point(local)
}

/// Approximate overlap test between an axis-aligned probe rectangle and a
/// rotated target rectangle.
///
/// Only the target's rotation is corrected for: the probe's corners are
/// carried into the target's local frame and re-boxed before the AABB test.
/// A probe with its own rotation would be tested incorrectly; every current
/// caller passes an axis-aligned rubber-band box.
#[must_use]
pub fn rect_intersects_rotated(probe: &Rect, target: &Rect, rotation: f32) -> bool {
    let center = target.center();
    let local: Vec<Point> = probe
        .corners()
        .iter()
        .map(|&corner| rotate_around(corner, center, -rotation))
        .collect();
    match Rect::bounding(&local) {
        Some(local_box) => local_box.intersects(target),
        None => false,
    }
}

/// Constrain a proposed size to a target aspect ratio by shrinking whichever
/// dimension overshoots.
///
/// `aspect` is width over height. A proposal taller than the target ratio
/// loses height; a wider one loses width.
#[must_use]
pub fn fit_to_aspect(width: f32, height: f32, aspect: f32) -> (f32, f32) {
    if width / height < aspect {
        (width, width / aspect)
    } else {
        (height * aspect, height)
    }
}

/// Fit a source size into an available area, preserving the source's aspect
/// ratio and filling the tighter dimension.
#[must_use]
pub fn fit_into(
    source_width: f32,
    source_height: f32,
    avail_width: f32,
    avail_height: f32,
) -> (f32, f32) {
    let aspect = source_width / source_height;
    if avail_width / avail_height > aspect {
        (avail_height * aspect, avail_height)
    } else {
        (avail_width, avail_width / aspect)
    }
}

/// Scale factor that maps a size's larger dimension onto `max`.
///
/// Greater than 1 for sources smaller than `max` in both dimensions.
#[must_use]
pub fn scale_to_max(width: f32, height: f32, max: f32) -> f32 {
    (max / width).min(max / height)
}
