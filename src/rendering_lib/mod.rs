// src/rendering_lib/mod.rs

pub mod depth;
pub mod flat_renderer;
pub mod geometry;
pub mod shader;
pub mod shadow;
pub mod vertex;
pub mod voxel_renderer;

pub use flat_renderer::{FlatFrame, FlatRenderer};
pub use geometry::{regular_polygon, ConvexPolygon, Point2, MAX_VERTICES};
pub use shadow::{shadow_quads, ShadowQuad};
pub use vertex::{Vertex, Vertex3};
pub use voxel_renderer::VoxelRenderer;
