// src/voxel/builder.rs
//
// Box-shaped edits on a VoxelGrid with brute-force occlusion upkeep, plus the
// hand-made level the voxel demo walks around in.

use rand::Rng;

use super::cell::{Voxel, VoxelShape};
use super::grid::{OutOfBounds, VoxelGrid};

pub type Coord = (i32, i32, i32);

fn ordered(a: Coord, b: Coord) -> (Coord, Coord) {
    (
        (a.0.min(b.0), a.1.min(b.1), a.2.min(b.2)),
        (a.0.max(b.0), a.1.max(b.1), a.2.max(b.2)),
    )
}

fn check_corners(min: Coord, max: Coord) -> Result<(), OutOfBounds> {
    for (x, y, z) in [min, max] {
        if !VoxelGrid::in_bounds(x, y, z) {
            return Err(OutOfBounds { x, y, z });
        }
    }
    Ok(())
}

fn for_each_in_box(min: Coord, max: Coord, mut f: impl FnMut(i32, i32, i32)) {
    for x in min.0..=max.0 {
        for y in min.1..=max.1 {
            for z in min.2..=max.2 {
                f(x, y, z);
            }
        }
    }
}

/// Recomputes occlusion for the box grown by one cell on every side.
fn refresh_with_shell(grid: &mut VoxelGrid, min: Coord, max: Coord) {
    let grown_min = (min.0 - 1, min.1 - 1, min.2 - 1);
    let grown_max = (max.0 + 1, max.1 + 1, max.2 + 1);
    for_each_in_box(grown_min, grown_max, |x, y, z| grid.refresh_occlusion(x, y, z));
}

/// Fills the inclusive box between two corners and returns the number of cells written.
///
/// Existing cells inside the box are replaced. Occlusion is refreshed for the
/// box and for the neighbours touching it, so shared faces are hidden on both sides.
pub fn fill_block<R: Rng + ?Sized>(
    grid: &mut VoxelGrid,
    a: Coord,
    b: Coord,
    color: [f32; 3],
    shape: VoxelShape,
    rng: &mut R,
) -> Result<usize, OutOfBounds> {
    let (min, max) = ordered(a, b);
    check_corners(min, max)?;

    let mut written = 0;
    let mut result = Ok(());
    for_each_in_box(min, max, |x, y, z| {
        if result.is_err() {
            return;
        }
        match grid.set(x, y, z, Some(Voxel::new(color, shape, &mut *rng))) {
            Ok(_) => written += 1,
            Err(e) => result = Err(e),
        }
    });
    result?;

    refresh_with_shell(grid, min, max);
    Ok(written)
}

/// Empties the inclusive box and re-exposes the faces around the hole.
pub fn slice_block(grid: &mut VoxelGrid, a: Coord, b: Coord) -> Result<usize, OutOfBounds> {
    let (min, max) = ordered(a, b);
    check_corners(min, max)?;

    let mut removed = 0;
    for_each_in_box(min, max, |x, y, z| {
        if let Ok(Some(_)) = grid.remove(x, y, z) {
            removed += 1;
        }
    });

    refresh_with_shell(grid, min, max);
    Ok(removed)
}

#[derive(Clone, Copy, Debug)]
pub enum BlockOp {
    Fill { min: Coord, max: Coord, color: [f32; 3], shape: VoxelShape },
    Slice { min: Coord, max: Coord },
}

const fn fill(min: Coord, max: Coord, color: [f32; 3]) -> BlockOp {
    BlockOp::Fill { min, max, color, shape: VoxelShape::Cuboid }
}

const fn hazard(min: Coord, max: Coord, color: [f32; 3]) -> BlockOp {
    BlockOp::Fill { min, max, color, shape: VoxelShape::Pyramid }
}

const WALL: [f32; 3] = [0.2, 0.2, 0.2];
const PLUM: [f32; 3] = [0.2, 0.1, 0.2];

/// A walled 41x41 room with a floor, a ceiling, a roof, platforms and a
/// layer of pyramids above the ceiling. Applied in order.
pub const LEVEL: &[BlockOp] = &[
    // Floor, ceiling, roof.
    fill((-20, 0, -20), (20, 0, 20), [0.2, 0.6, 0.1]),
    fill((-20, 10, -20), (20, 10, 20), [0.0, 0.8, 1.0]),
    fill((-20, 20, -20), (20, 20, 20), [0.1, 0.1, 0.1]),
    // Front and back walls.
    fill((-20, 1, -20), (20, 20, -20), WALL),
    fill((-20, 1, 20), (20, 20, 20), WALL),
    // Left and right walls.
    fill((-20, 1, -19), (-20, 19, 19), WALL),
    fill((20, 1, -19), (20, 19, 19), WALL),
    // Platforms.
    fill((-1, 1, -6), (1, 2, -4), [0.4, 0.1, 0.4]),
    fill((-4, 1, -6), (-4, 4, -4), [0.2, 0.1, 0.5]),
    fill((-8, 1, -7), (-5, 5, -5), [0.1, 0.4, 0.3]),
    fill((-8, 1, -1), (-8, 3, 1), [0.5, 0.5, 0.1]),
    fill((-6, 1, 3), (-4, 5, 5), [0.2, 0.4, 0.4]),
    fill((-6, 1, 8), (-4, 6, 13), PLUM),
    fill((-6, 5, 10), (-4, 7, 13), PLUM),
    hazard((-6, 7, 12), (-4, 9, 13), PLUM),
    hazard((-19, 11, -19), (19, 11, 19), [0.6, 0.0, 0.0]),
    fill((-6, 11, 0), (-4, 11, 10), PLUM),
    fill((-7, 11, -10), (-3, 13, -5), PLUM),
    fill((0, 11, -10), (5, 15, -5), PLUM),
    fill((5, 1, -10), (15, 5, 10), PLUM),
    fill((-7, 17, -7), (0, 17, 0), PLUM),
    // Passages.
    BlockOp::Slice { min: (-7, 1, -6), max: (-6, 5, -5) },
    BlockOp::Slice { min: (-7, 1, -7), max: (-6, 2, -7) },
    BlockOp::Slice { min: (-10, 10, 11), max: (0, 11, 13) },
];

pub fn apply<R: Rng + ?Sized>(grid: &mut VoxelGrid, ops: &[BlockOp], rng: &mut R) -> Result<(), OutOfBounds> {
    for op in ops {
        match *op {
            BlockOp::Fill { min, max, color, shape } => {
                fill_block(grid, min, max, color, shape, rng)?;
            }
            BlockOp::Slice { min, max } => {
                slice_block(grid, min, max)?;
            }
        }
    }
    Ok(())
}

pub fn generate_voxel_map<R: Rng + ?Sized>(grid: &mut VoxelGrid, rng: &mut R) -> Result<(), OutOfBounds> {
    apply(grid, LEVEL, rng)?;
    log::info!("Generated voxel grid: {} occupied cells", grid.len());
    Ok(())
}
