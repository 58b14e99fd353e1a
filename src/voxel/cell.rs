// src/voxel/cell.rs

use rand::Rng;

const COLOR_NOISE_MAGNITUDE: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VoxelShape {
    Cuboid,
    Pyramid,
}

/// The six faces of a cell. The discriminant indexes the per-face arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    Front = 0,
    Back = 1,
    Top = 2,
    Bottom = 3,
    Right = 4,
    Left = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::Front, Face::Back, Face::Top, Face::Bottom, Face::Right, Face::Left];

    /// Direction to the neighbour sharing this face.
    pub fn offset(self) -> (i32, i32, i32) {
        match self {
            Face::Front => (0, 0, 1),
            Face::Back => (0, 0, -1),
            Face::Top => (0, 1, 0),
            Face::Bottom => (0, -1, 0),
            Face::Right => (1, 0, 0),
            Face::Left => (-1, 0, 0),
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One occupied grid cell. Cells do not know their own position.
#[derive(Clone, Debug)]
pub struct Voxel {
    shape: VoxelShape,
    color: [f32; 3],
    face_colors: [[f32; 3]; 6],
    occluded: [bool; 6],
}

impl Voxel {
    pub fn new<R: Rng + ?Sized>(color: [f32; 3], shape: VoxelShape, rng: &mut R) -> Self {
        let mut voxel = Self {
            shape,
            color,
            face_colors: [color; 6],
            occluded: [false; 6],
        };
        voxel.set_color(color, rng);
        voxel
    }

    /// Sets the base colour and re-rolls the per-face shading jitter.
    pub fn set_color<R: Rng + ?Sized>(&mut self, color: [f32; 3], rng: &mut R) {
        self.color = color;
        for face_color in &mut self.face_colors {
            let jitter = rng.gen::<f32>() * COLOR_NOISE_MAGNITUDE - COLOR_NOISE_MAGNITUDE / 2.0;
            *face_color = [color[0] + jitter, color[1] + jitter, color[2] + jitter];
        }
    }

    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    pub fn face_color(&self, face: Face) -> [f32; 3] {
        self.face_colors[face.index()]
    }

    pub fn shape(&self) -> VoxelShape {
        self.shape
    }

    pub fn set_shape(&mut self, shape: VoxelShape) {
        self.shape = shape;
    }

    pub fn set_occlusion(&mut self, occluded: [bool; 6]) {
        self.occluded = occluded;
    }

    pub fn occlusion(&self) -> [bool; 6] {
        self.occluded
    }

    pub fn is_occluded(&self, face: Face) -> bool {
        self.occluded[face.index()]
    }

    pub fn is_fully_occluded(&self) -> bool {
        self.occluded.iter().all(|&o| o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn jitter_stays_within_magnitude() {
        let mut rng = StdRng::seed_from_u64(7);
        let base = [0.2, 0.6, 0.1];
        for _ in 0..64 {
            let voxel = Voxel::new(base, VoxelShape::Cuboid, &mut rng);
            assert_eq!(voxel.color(), base);
            for face in Face::ALL {
                let c = voxel.face_color(face);
                let jitter = c[0] - base[0];
                assert!(jitter >= -0.05 - 1e-6 && jitter <= 0.05 + 1e-6, "jitter {jitter}");
                // One offset shared by all three channels.
                assert!((c[1] - base[1] - jitter).abs() < 1e-6);
                assert!((c[2] - base[2] - jitter).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn full_occlusion_needs_all_faces() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut voxel = Voxel::new([0.5; 3], VoxelShape::Pyramid, &mut rng);
        assert!(!voxel.is_fully_occluded());

        voxel.set_occlusion([true, true, true, true, true, false]);
        assert!(voxel.is_occluded(Face::Top));
        assert!(!voxel.is_fully_occluded());

        voxel.set_occlusion([true; 6]);
        assert!(voxel.is_fully_occluded());
    }

    #[test]
    fn offsets_are_unit_steps() {
        for face in Face::ALL {
            let (x, y, z) = face.offset();
            assert_eq!(x.abs() + y.abs() + z.abs(), 1);
        }
        assert_eq!(Face::Front.offset(), (0, 0, 1));
        assert_eq!(Face::Left.offset(), (-1, 0, 0));
        assert_eq!(Face::Bottom.index(), 3);
    }
}
