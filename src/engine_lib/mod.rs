// src/engine_lib/mod.rs
pub mod camera;
pub mod clock;
pub mod controller;
pub mod player;

pub use camera::Camera;
pub use clock::FixedTimestep;
pub use controller::{KeyboardController, MovementInput};
pub use player::{MovementTuning, PlayerBody, StepOutcome};
