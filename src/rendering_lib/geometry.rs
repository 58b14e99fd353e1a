// src/rendering_lib/geometry.rs

use bytemuck::{Pod, Zeroable};
use std::f32::consts::TAU;

pub const MAX_VERTICES: usize = 16;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq, Default)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const ORIGIN: Point2 = Point2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(&self, other: &Point2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn add(&self, other: &Point2) -> Point2 {
        Point2::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(&self, other: &Point2) -> Point2 {
        Point2::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(&self, factor: f32) -> Point2 {
        Point2::new(self.x * factor, self.y * factor)
    }

    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(&self) -> Point2 {
        let l = self.length();
        if l == 0.0 {
            Point2::ORIGIN
        } else {
            Point2::new(self.x / l, self.y / l)
        }
    }
}

pub fn cross3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - b[1] * a[2],
        b[0] * a[2] - a[0] * b[2],
        a[0] * b[1] - b[0] * a[1],
    ]
}

#[derive(Clone, Debug)]
pub struct ConvexPolygon {
    vertices: [Point2; MAX_VERTICES],
    count: usize,
}

impl Default for ConvexPolygon {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvexPolygon {
    pub fn new() -> Self {
        Self {
            vertices: [Point2::ORIGIN; MAX_VERTICES],
            count: 0,
        }
    }

    pub fn from_points(points: &[Point2]) -> Self {
        let mut polygon = Self::new();
        let num_to_copy = points.len().min(MAX_VERTICES);
        polygon.vertices[..num_to_copy].copy_from_slice(&points[..num_to_copy]);
        polygon.count = num_to_copy;
        polygon
    }

    pub fn vertices(&self) -> &[Point2] {
        &self.vertices[..self.count]
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Shoelace sum halved. Positive for counter-clockwise winding in a y-up frame.
    pub fn signed_area(&self) -> f32 {
        if self.count < 3 {
            return 0.0;
        }
        let mut area = 0.0;
        for (a, b) in self.edges() {
            area += a.x * b.y - b.x * a.y;
        }
        area / 2.0
    }

    pub fn area(&self) -> f32 {
        self.signed_area().abs()
    }

    pub fn translated(&self, offset: Point2) -> ConvexPolygon {
        let mut moved = self.clone();
        for v in &mut moved.vertices[..moved.count] {
            *v = v.add(&offset);
        }
        moved
    }

    /// Consecutive vertex pairs, wrapping from the last vertex back to the first.
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.count;
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

/// Builds a regular polygon centred on the origin.
///
/// Vertices are laid out clockwise (y up), which puts the left-hand normal of
/// every edge on the outside. The shadow pass relies on that.
pub fn regular_polygon(sides: usize, radius: f32) -> ConvexPolygon {
    let sides = sides.clamp(3, MAX_VERTICES);
    let step = TAU / sides as f32;

    let mut points = [Point2::ORIGIN; MAX_VERTICES];
    for (i, point) in points.iter_mut().take(sides).enumerate() {
        let angle = TAU - step * i as f32;
        *point = Point2::new(angle.cos() * radius, angle.sin() * radius);
    }
    ConvexPolygon::from_points(&points[..sides])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_polygon_is_clockwise_on_its_radius() {
        let hex = regular_polygon(6, 0.5);
        assert_eq!(hex.count(), 6);
        assert!(hex.signed_area() < 0.0);
        for v in hex.vertices() {
            assert!((v.length() - 0.5).abs() < 1e-5);
        }
        // First vertex sits on the +x axis.
        assert!((hex.vertices()[0].x - 0.5).abs() < 1e-5);
        assert!(hex.vertices()[0].y.abs() < 1e-5);
    }

    #[test]
    fn negative_radius_keeps_winding() {
        let flipped = regular_polygon(5, -0.1);
        assert!(flipped.signed_area() < 0.0);
        assert!((flipped.vertices()[0].x + 0.1).abs() < 1e-6);
    }

    #[test]
    fn side_count_is_clamped() {
        assert_eq!(regular_polygon(1, 1.0).count(), 3);
        assert_eq!(regular_polygon(40, 1.0).count(), MAX_VERTICES);
    }

    #[test]
    fn square_area_and_translation() {
        let square = ConvexPolygon::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ]);
        assert_eq!(square.area(), 4.0);
        assert!(square.signed_area() > 0.0);

        let moved = square.translated(Point2::new(1.0, -1.0));
        assert_eq!(moved.vertices()[2], Point2::new(3.0, 1.0));
        assert_eq!(moved.area(), 4.0);
    }

    #[test]
    fn edges_wrap_around() {
        let tri = ConvexPolygon::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]);
        let edges: Vec<_> = tri.edges().collect();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2], (Point2::new(0.0, 1.0), Point2::new(0.0, 0.0)));
    }

    #[test]
    fn from_points_truncates_to_capacity() {
        let many = vec![Point2::new(1.0, 1.0); MAX_VERTICES + 4];
        assert_eq!(ConvexPolygon::from_points(&many).count(), MAX_VERTICES);
    }

    #[test]
    fn cross_of_unit_axes() {
        assert_eq!(cross3([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
        assert_eq!(cross3([0.0, 1.0, 0.0], [0.0, 0.0, 1.0]), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn normalize_zero_stays_zero() {
        assert_eq!(Point2::ORIGIN.normalize(), Point2::ORIGIN);
        let n = Point2::new(3.0, 4.0).normalize();
        assert!((n.length() - 1.0).abs() < 1e-6);
    }
}
