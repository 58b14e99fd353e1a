// src/engine_lib/player.rs
//
// First-person body with axis-separated collision against grid cells.
// All rates are per fixed tick.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::engine_lib::controller::MovementInput;
use crate::voxel::grid::{VoxelGrid, MAX_COORD, MIN_COORD};
use crate::voxel::VoxelShape;

// Cells further than this from the swept body cannot touch it within one tick.
const NEIGHBOURHOOD_MARGIN: i32 = 3;

#[derive(Debug, Clone, Copy)]
pub struct MovementTuning {
    pub acceleration: f32,
    pub turn_rate: f32,
    pub gravity: f32,
    pub drag: f32,
    pub jump_speed: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            acceleration: 0.01,
            turn_rate: 0.04,
            gravity: 0.01,
            drag: 1.05,
            jump_speed: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Airborne,
    Grounded,
    /// Touched down on a pyramid and was sent back to the respawn point.
    Respawned,
}

#[derive(Debug, Clone)]
pub struct PlayerBody {
    /// Horizontal centre; `y` is the top of the body, where the eye sits.
    pub position: Vec3,
    pub velocity: Vec3,
    /// Radians around +y, measured from +x towards +z.
    pub heading: f32,
    /// Width (x), height (y), length (z).
    pub size: Vec3,
    pub respawn: Vec3,
}

impl Default for PlayerBody {
    fn default() -> Self {
        let size = Vec3::new(1.0, 1.5, 1.0);
        Self {
            position: Vec3::new(0.0, 2.5, 0.0),
            velocity: Vec3::ZERO,
            heading: 0.0,
            size,
            respawn: Vec3::new(0.0, 0.5 + size.y, 0.0),
        }
    }
}

enum Contact {
    None,
    Floor,
    Hazard,
}

struct Region {
    min: (i32, i32, i32),
    max: (i32, i32, i32),
}

impl PlayerBody {
    pub fn at(position: Vec3) -> Self {
        Self { position, ..Self::default() }
    }

    pub fn eye(&self) -> Vec3 {
        self.position
    }

    pub fn look_target(&self) -> Vec3 {
        self.position + Vec3::new(self.heading.cos(), 0.0, self.heading.sin())
    }

    fn accelerate(&mut self, angle: f32, amount: f32) {
        self.velocity.x += angle.cos() * amount;
        self.velocity.z += angle.sin() * amount;
    }

    // Cells the body could reach this tick, clamped to the grid.
    fn neighbourhood(&self) -> Region {
        let half = self.size * 0.5;
        let next = self.position + self.velocity;
        let lo = Vec3::new(
            self.position.x.min(next.x) - half.x,
            self.position.y.min(next.y) - self.size.y,
            self.position.z.min(next.z) - half.z,
        );
        let hi = Vec3::new(
            self.position.x.max(next.x) + half.x,
            self.position.y.max(next.y),
            self.position.z.max(next.z) + half.z,
        );
        // Clamp before the cast so a body far outside the grid cannot overflow.
        let (lo_f, hi_f) = (MIN_COORD as f32, MAX_COORD as f32);
        let grow_lo = |v: f32| (v.floor().clamp(lo_f, hi_f) as i32 - NEIGHBOURHOOD_MARGIN).clamp(MIN_COORD, MAX_COORD);
        let grow_hi = |v: f32| (v.ceil().clamp(lo_f, hi_f) as i32 + NEIGHBOURHOOD_MARGIN).clamp(MIN_COORD, MAX_COORD);
        Region {
            min: (grow_lo(lo.x), grow_lo(lo.y), grow_lo(lo.z)),
            max: (grow_hi(hi.x), grow_hi(hi.y), grow_hi(hi.z)),
        }
    }

    fn reset_to_respawn(&mut self) {
        self.position = self.respawn;
        self.velocity = Vec3::ZERO;
    }

    /// Advances the body by one tick: steer, apply gravity and drag, resolve
    /// collisions cell by cell, then integrate.
    pub fn step(&mut self, grid: &VoxelGrid, input: MovementInput, tuning: &MovementTuning) -> StepOutcome {
        if input.turn_right {
            self.heading += tuning.turn_rate;
        }
        if input.turn_left {
            self.heading -= tuning.turn_rate;
        }

        if input.strafe_left {
            self.accelerate(self.heading - FRAC_PI_2, tuning.acceleration);
        }
        if input.strafe_right {
            self.accelerate(self.heading + FRAC_PI_2, tuning.acceleration);
        }
        if input.forward {
            self.accelerate(self.heading, tuning.acceleration);
        }
        if input.back {
            self.accelerate(self.heading, -tuning.acceleration);
        }

        self.velocity.y -= tuning.gravity;
        self.velocity.x /= tuning.drag;
        self.velocity.z /= tuning.drag;

        let mut outcome = StepOutcome::Airborne;

        // Cells are visited in ascending x, y, z order. A respawn teleports the
        // body, so the sweep resumes around the new position after the last
        // visited cell.
        let mut region = self.neighbourhood();
        let mut visited: Option<(i32, i32, i32)> = None;
        'sweep: loop {
            for x in region.min.0..=region.max.0 {
                for y in region.min.1..=region.max.1 {
                    for z in region.min.2..=region.max.2 {
                        if visited.is_some_and(|last| (x, y, z) <= last) {
                            continue;
                        }
                        let Some(voxel) = grid.get(x, y, z) else { continue };
                        if voxel.is_fully_occluded() {
                            continue;
                        }
                        match self.resolve_cell(x, y, z, voxel.shape(), input.jump, tuning) {
                            Contact::None => {}
                            Contact::Floor => {
                                if outcome == StepOutcome::Airborne {
                                    outcome = StepOutcome::Grounded;
                                }
                            }
                            Contact::Hazard => {
                                outcome = StepOutcome::Respawned;
                                visited = Some((x, y, z));
                                region = self.neighbourhood();
                                continue 'sweep;
                            }
                        }
                    }
                }
            }
            break;
        }

        self.position += self.velocity;
        outcome
    }

    // Overlap tests against the current position are strict; tests against the
    // next position include touching.
    fn resolve_cell(&mut self, x: i32, y: i32, z: i32, shape: VoxelShape, jump: bool, tuning: &MovementTuning) -> Contact {
        let cell = Vec3::new(x as f32, y as f32, z as f32);
        let half = self.size * 0.5;
        let pos = self.position;
        let next = self.position + self.velocity;

        let overlap_x = pos.x + half.x > cell.x - 0.5 && pos.x - half.x < cell.x + 0.5;
        let overlap_y = pos.y > cell.y - 0.5 && pos.y - self.size.y < cell.y + 0.5;
        let overlap_z = pos.z + half.z > cell.z - 0.5 && pos.z - half.z < cell.z + 0.5;
        let future_x = next.x + half.x >= cell.x - 0.5 && next.x - half.x <= cell.x + 0.5;
        let future_y = next.y >= cell.y - 0.5 && next.y - self.size.y <= cell.y + 0.5;
        let future_z = next.z + half.z >= cell.z - 0.5 && next.z - half.z <= cell.z + 0.5;

        let mut contact = Contact::None;

        if future_y && overlap_x && overlap_z {
            if self.velocity.y < 0.0 {
                self.position.y = cell.y + 0.5 + self.size.y;
                self.velocity.y = 0.0;
                contact = Contact::Floor;
                if shape == VoxelShape::Pyramid {
                    self.reset_to_respawn();
                    contact = Contact::Hazard;
                }
                if jump {
                    self.velocity.y = tuning.jump_speed;
                }
            } else if self.velocity.y > 0.0 {
                self.position.y = cell.y - 0.5;
                self.velocity.y = 0.0;
            }
        }

        if !overlap_z && future_z && overlap_y && overlap_x {
            // A body at rest against a face is already flush; leave it there.
            if self.velocity.z < 0.0 {
                self.position.z = cell.z + 0.5 + half.z;
                self.velocity.z = 0.0;
            } else if self.velocity.z > 0.0 {
                self.position.z = cell.z - 0.5 - half.z;
                self.velocity.z = 0.0;
            }
        }

        if !overlap_x && future_x && overlap_y && overlap_z {
            if self.velocity.x < 0.0 {
                self.position.x = cell.x + 0.5 + half.x;
                self.velocity.x = 0.0;
            } else if self.velocity.x > 0.0 {
                self.position.x = cell.x - 0.5 - half.x;
                self.velocity.x = 0.0;
            }
        }

        contact
    }
}
