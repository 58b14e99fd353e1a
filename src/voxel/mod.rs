// src/voxel/mod.rs

pub mod builder;
pub mod cell;
pub mod grid;
pub mod mesh;

pub use builder::{fill_block, generate_voxel_map, slice_block};
pub use cell::{Face, Voxel, VoxelShape};
pub use grid::{OutOfBounds, VoxelGrid};
