// src/voxel/mesh.rs

use super::cell::{Face, Voxel, VoxelShape};
use super::grid::VoxelGrid;
use crate::rendering_lib::vertex::Vertex3;

const N: f32 = -0.5;
const P: f32 = 0.5;

// Two counter-clockwise triangles per face, indexed like `Face`.
const CUBOID_FACES: [[[f32; 3]; 6]; 6] = [
    // Front (+z)
    [[N, N, P], [P, N, P], [N, P, P], [N, P, P], [P, N, P], [P, P, P]],
    // Back (-z)
    [[N, N, N], [N, P, N], [P, N, N], [N, P, N], [P, P, N], [P, N, N]],
    // Top (+y)
    [[N, P, P], [P, P, P], [N, P, N], [N, P, N], [P, P, P], [P, P, N]],
    // Bottom (-y)
    [[N, N, P], [N, N, N], [P, N, P], [N, N, N], [P, N, N], [P, N, P]],
    // Right (+x)
    [[P, N, P], [P, N, N], [P, P, P], [P, P, P], [P, N, N], [P, P, N]],
    // Left (-x)
    [[N, N, N], [N, N, P], [N, P, N], [N, P, N], [N, N, P], [N, P, P]],
];

const PYRAMID_BASE: [[f32; 3]; 6] = [[N, N, N], [P, N, N], [N, N, P], [P, N, N], [P, N, P], [N, N, P]];

const APEX: [f32; 3] = [0.0, P, 0.0];

// Front, left, right and back sides, each closed by the apex.
const PYRAMID_SIDES: [[[f32; 3]; 2]; 4] = [
    [[N, N, P], [P, N, P]],
    [[N, N, N], [N, N, P]],
    [[P, N, P], [P, N, N]],
    [[P, N, N], [N, N, N]],
];

fn push_corners(out: &mut Vec<Vertex3>, corners: &[[f32; 3]], center: [f32; 3], color: [f32; 3]) {
    for c in corners {
        out.push(Vertex3::new([center[0] + c[0], center[1] + c[1], center[2] + c[2]], color));
    }
}

/// Appends the visible triangles of one cell centred on `(x, y, z)`.
pub fn append_voxel(out: &mut Vec<Vertex3>, voxel: &Voxel, x: i32, y: i32, z: i32) {
    if voxel.is_fully_occluded() {
        return;
    }
    let center = [x as f32, y as f32, z as f32];

    match voxel.shape() {
        VoxelShape::Cuboid => {
            for face in Face::ALL {
                if !voxel.is_occluded(face) {
                    push_corners(out, &CUBOID_FACES[face.index()], center, voxel.face_color(face));
                }
            }
        }
        VoxelShape::Pyramid => {
            if !voxel.is_occluded(Face::Bottom) {
                push_corners(out, &PYRAMID_BASE, center, voxel.face_color(Face::Front));
            }
            // Sides take the next four face colours; they are never hidden.
            for (side, base_edge) in PYRAMID_SIDES.iter().enumerate() {
                let color = voxel.face_color(Face::ALL[side + 1]);
                push_corners(out, &[base_edge[0], base_edge[1], APEX], center, color);
            }
        }
    }
}

pub fn build_mesh(grid: &VoxelGrid) -> Vec<Vertex3> {
    let mut vertices = Vec::new();
    for ((x, y, z), voxel) in grid.iter() {
        append_voxel(&mut vertices, voxel, x, y, z);
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering_lib::geometry::cross3;
    use crate::voxel::builder::fill_block;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn assert_outward(vertices: &[Vertex3], center: [f32; 3]) {
        for tri in vertices.chunks_exact(3) {
            let (a, b, c) = (tri[0].position, tri[1].position, tri[2].position);
            let normal = cross3(sub(b, a), sub(c, a));
            let centroid = [(a[0] + b[0] + c[0]) / 3.0, (a[1] + b[1] + c[1]) / 3.0, (a[2] + b[2] + c[2]) / 3.0];
            let out = sub(centroid, center);
            let facing = normal[0] * out[0] + normal[1] * out[1] + normal[2] * out[2];
            assert!(facing > 0.0, "triangle {a:?} {b:?} {c:?} faces inward");
        }
    }

    fn single(shape: VoxelShape) -> Voxel {
        Voxel::new([0.4, 0.4, 0.4], shape, &mut StdRng::seed_from_u64(2))
    }

    #[test]
    fn lone_cuboid_emits_every_face_outward() {
        let mut out = Vec::new();
        append_voxel(&mut out, &single(VoxelShape::Cuboid), 3, -2, 7);
        assert_eq!(out.len(), 36);
        assert_outward(&out, [3.0, -2.0, 7.0]);
    }

    #[test]
    fn lone_pyramid_emits_base_and_sides_outward() {
        let mut out = Vec::new();
        append_voxel(&mut out, &single(VoxelShape::Pyramid), 0, 0, 0);
        assert_eq!(out.len(), 18);
        assert_outward(&out, [0.0, 0.0, 0.0]);
        assert!(out.iter().any(|v| v.position == APEX));
    }

    #[test]
    fn pyramid_on_cuboid_drops_only_the_base() {
        let mut voxel = single(VoxelShape::Pyramid);
        voxel.set_occlusion([true, true, true, true, true, false]);
        let mut out = Vec::new();
        append_voxel(&mut out, &voxel, 0, 0, 0);
        assert_eq!(out.len(), 12);
    }

    #[test]
    fn occluded_faces_are_skipped() {
        let mut voxel = single(VoxelShape::Cuboid);
        voxel.set_occlusion([true, false, true, false, false, false]);
        let mut out = Vec::new();
        append_voxel(&mut out, &voxel, 0, 0, 0);
        assert_eq!(out.len(), 24);

        voxel.set_occlusion([true; 6]);
        out.clear();
        append_voxel(&mut out, &voxel, 0, 0, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn adjacent_cuboids_share_no_faces() {
        let mut grid = VoxelGrid::new();
        fill_block(&mut grid, (0, 0, 0), (1, 0, 0), [0.5; 3], VoxelShape::Cuboid, &mut StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(build_mesh(&grid).len(), 60);
    }

    #[test]
    fn face_colours_come_from_the_cell() {
        let voxel = single(VoxelShape::Cuboid);
        let mut out = Vec::new();
        append_voxel(&mut out, &voxel, 0, 0, 0);
        assert_eq!(out[0].color, voxel.face_color(Face::Front));
        assert_eq!(out[35].color, voxel.face_color(Face::Left));
    }
}
