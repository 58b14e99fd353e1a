// src/lib.rs

pub mod engine_lib;
pub mod platform;
pub mod rendering_lib;
pub mod settings;
pub mod shadows_app;
pub mod ui;
pub mod voxel;
pub mod voxel_app;
