// src/rendering_lib/shadow.rs
//
// Hard 2D shadows from convex casters and a single point light.
// Every caster edge that faces away from the light is pushed out along the
// light rays, and the quad between the edge and its projection is the shadow.

use crate::rendering_lib::geometry::{ConvexPolygon, Point2};

pub const DEFAULT_EXTRUDE_DISTANCE: f32 = 6.0;
pub const MAX_CASTERS: usize = 16;
pub const SHADOW_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Left-hand normal of the edge `p1 -> p2`, not normalized.
pub fn line_normal(p1: Point2, p2: Point2) -> Point2 {
    Point2::new(p1.y - p2.y, p2.x - p1.x)
}

pub fn is_back_facing(p1: Point2, p2: Point2, light: Point2) -> bool {
    let to_light = light.sub(&p1);
    to_light.dot(&line_normal(p1, p2)) < 0.0
}

/// Projects both endpoints away from the light by `factor`.
pub fn extrude_line(p1: Point2, p2: Point2, light: Point2, factor: f32) -> (Point2, Point2) {
    let push = |p: Point2| light.add(&p.sub(&light).scale(factor));
    (push(p1), push(p2))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowQuad {
    pub near: [Point2; 2],
    pub far: [Point2; 2],
}

impl ShadowQuad {
    pub fn near_color() -> [f32; 4] {
        [SHADOW_COLOR[0], SHADOW_COLOR[1], SHADOW_COLOR[2], SHADOW_COLOR[3] / 2.0]
    }

    pub fn far_color() -> [f32; 4] {
        SHADOW_COLOR
    }

    /// Fan order: both near points, then the far points walked back.
    pub fn fan(&self) -> [Point2; 4] {
        [self.near[0], self.near[1], self.far[1], self.far[0]]
    }
}

/// `polygon` must be wound clockwise (see `regular_polygon`), otherwise the
/// front edges get extruded and the shadow covers the caster.
pub fn shadow_quads(
    polygon: &ConvexPolygon,
    offset: Point2,
    light: Point2,
    factor: f32,
) -> Vec<ShadowQuad> {
    let placed = polygon.translated(offset);
    placed
        .edges()
        .filter(|(p1, p2)| is_back_facing(*p1, *p2, light))
        .map(|(p1, p2)| {
            let (far1, far2) = extrude_line(p1, p2, light, factor);
            ShadowQuad { near: [p1, p2], far: [far1, far2] }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering_lib::geometry::regular_polygon;

    // Clockwise unit square centred on (2, 0).
    fn square_right_of_light() -> ConvexPolygon {
        ConvexPolygon::from_points(&[
            Point2::new(1.5, 0.5),
            Point2::new(2.5, 0.5),
            Point2::new(2.5, -0.5),
            Point2::new(1.5, -0.5),
        ])
    }

    #[test]
    fn normal_is_left_hand() {
        let n = line_normal(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        assert_eq!(n, Point2::new(0.0, 1.0));
    }

    #[test]
    fn far_side_of_square_is_back_facing() {
        let light = Point2::ORIGIN;
        let sq = square_right_of_light();
        let flags: Vec<bool> = sq.edges().map(|(a, b)| is_back_facing(a, b, light)).collect();
        // top, right, bottom, left
        assert_eq!(flags, vec![true, true, true, false]);
    }

    #[test]
    fn edge_on_edge_is_not_back_facing() {
        // The light lies on the edge's line: zero projection.
        assert!(!is_back_facing(Point2::new(1.0, 0.0), Point2::new(2.0, 0.0), Point2::ORIGIN));
    }

    #[test]
    fn extrusion_from_origin_scales_points() {
        let (a, b) = extrude_line(Point2::new(1.0, 2.0), Point2::new(-1.0, 0.5), Point2::ORIGIN, 6.0);
        assert_eq!(a, Point2::new(6.0, 12.0));
        assert_eq!(b, Point2::new(-6.0, 3.0));
    }

    #[test]
    fn extrusion_follows_the_light() {
        let light = Point2::new(1.0, 1.0);
        let (a, _) = extrude_line(Point2::new(2.0, 1.0), Point2::new(2.0, 2.0), light, 3.0);
        assert_eq!(a, Point2::new(4.0, 1.0));
    }

    #[test]
    fn quads_only_for_back_edges() {
        let quads = shadow_quads(&square_right_of_light(), Point2::ORIGIN, Point2::ORIGIN, 6.0);
        assert_eq!(quads.len(), 3);
        let right = quads[1];
        assert_eq!(right.near, [Point2::new(2.5, 0.5), Point2::new(2.5, -0.5)]);
        assert_eq!(right.far, [Point2::new(15.0, 3.0), Point2::new(15.0, -3.0)]);
        assert_eq!(right.fan()[2], Point2::new(15.0, -3.0));
    }

    #[test]
    fn offset_moves_the_caster_before_testing() {
        let hex = regular_polygon(6, 0.1);
        let quads = shadow_quads(&hex, Point2::new(0.4, 0.0), Point2::ORIGIN, DEFAULT_EXTRUDE_DISTANCE);
        assert!(!quads.is_empty() && quads.len() < 6);
        for q in &quads {
            for p in q.near {
                assert!(p.x > 0.25);
            }
        }
    }

    #[test]
    fn caster_enclosing_light_shadows_every_edge() {
        // Seen from inside, every outward normal points away from the light.
        let hex = regular_polygon(6, 0.3);
        assert_eq!(shadow_quads(&hex, Point2::ORIGIN, Point2::ORIGIN, 6.0).len(), 6);
    }

    #[test]
    fn near_edge_is_half_transparent() {
        assert_eq!(ShadowQuad::near_color()[3], 0.5);
        assert_eq!(ShadowQuad::far_color()[3], 1.0);
    }
}
