// src/voxel/grid.rs

use std::fmt;

use super::cell::{Face, Voxel, VoxelShape};

/// Cells per axis.
pub const GRID_SIZE: i32 = 128;
const HALF: i32 = GRID_SIZE / 2;

/// Lowest and highest valid world coordinate on every axis.
pub const MIN_COORD: i32 = -HALF;
pub const MAX_COORD: i32 = GRID_SIZE - HALF - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "voxel coordinate ({}, {}, {}) is outside {}..={}",
            self.x, self.y, self.z, MIN_COORD, MAX_COORD
        )
    }
}

impl std::error::Error for OutOfBounds {}

/// Dense cube of optional cells addressed by world coordinates centred on the origin.
pub struct VoxelGrid {
    cells: Vec<Option<Box<Voxel>>>,
    occupied: usize,
}

impl Default for VoxelGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl VoxelGrid {
    pub fn new() -> Self {
        let total = (GRID_SIZE * GRID_SIZE * GRID_SIZE) as usize;
        let mut cells = Vec::with_capacity(total);
        cells.resize_with(total, || None);
        Self { cells, occupied: 0 }
    }

    pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        (MIN_COORD..=MAX_COORD).contains(&x)
            && (MIN_COORD..=MAX_COORD).contains(&y)
            && (MIN_COORD..=MAX_COORD).contains(&z)
    }

    // x-major so that a flat walk visits cells in x, then y, then z order.
    fn index(x: i32, y: i32, z: i32) -> Option<usize> {
        if !Self::in_bounds(x, y, z) {
            return None;
        }
        let (ix, iy, iz) = ((x + HALF) as usize, (y + HALF) as usize, (z + HALF) as usize);
        let n = GRID_SIZE as usize;
        Some((ix * n + iy) * n + iz)
    }

    fn coords(index: usize) -> (i32, i32, i32) {
        let n = GRID_SIZE as usize;
        let iz = index % n;
        let iy = (index / n) % n;
        let ix = index / (n * n);
        (ix as i32 - HALF, iy as i32 - HALF, iz as i32 - HALF)
    }

    pub fn is_present(&self, x: i32, y: i32, z: i32) -> bool {
        self.get(x, y, z).is_some()
    }

    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<&Voxel> {
        Self::index(x, y, z).and_then(|i| self.cells[i].as_deref())
    }

    pub fn get_mut(&mut self, x: i32, y: i32, z: i32) -> Option<&mut Voxel> {
        Self::index(x, y, z).and_then(|i| self.cells[i].as_deref_mut())
    }

    /// Stores `voxel` (or clears the cell with `None`) and hands back the previous occupant.
    pub fn set(&mut self, x: i32, y: i32, z: i32, voxel: Option<Voxel>) -> Result<Option<Voxel>, OutOfBounds> {
        let index = Self::index(x, y, z).ok_or(OutOfBounds { x, y, z })?;
        let previous = std::mem::replace(&mut self.cells[index], voxel.map(Box::new));
        if previous.is_some() {
            self.occupied -= 1;
        }
        if self.cells[index].is_some() {
            self.occupied += 1;
        }
        Ok(previous.map(|b| *b))
    }

    pub fn remove(&mut self, x: i32, y: i32, z: i32) -> Result<Option<Voxel>, OutOfBounds> {
        self.set(x, y, z, None)
    }

    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Occupied cells with their world coordinates, x outermost, z innermost.
    pub fn iter(&self) -> impl Iterator<Item = ((i32, i32, i32), &Voxel)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.as_deref().map(|v| (Self::coords(i), v)))
    }

    /// A face is hidden when its neighbour exists and is a cuboid.
    pub fn occlusion_at(&self, x: i32, y: i32, z: i32) -> [bool; 6] {
        let mut occluded = [false; 6];
        for face in Face::ALL {
            let (dx, dy, dz) = face.offset();
            occluded[face.index()] = matches!(
                self.get(x + dx, y + dy, z + dz).map(Voxel::shape),
                Some(VoxelShape::Cuboid)
            );
        }
        occluded
    }

    /// Recomputes the occlusion flags of the cell at the coordinate, if any.
    pub fn refresh_occlusion(&mut self, x: i32, y: i32, z: i32) {
        let occluded = self.occlusion_at(x, y, z);
        if let Some(voxel) = self.get_mut(x, y, z) {
            voxel.set_occlusion(occluded);
        }
    }
}
