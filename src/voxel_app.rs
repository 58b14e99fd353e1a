// src/voxel_app.rs

use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Mat4;
use rand::{rngs::StdRng, Rng, SeedableRng};
use winit::{dpi::PhysicalSize, event::WindowEvent, keyboard::KeyCode, window::Window};

use crate::engine_lib::camera::Camera;
use crate::engine_lib::clock::FixedTimestep;
use crate::engine_lib::controller::{is_fresh_press, KeyboardController, MovementInput};
use crate::engine_lib::player::{MovementTuning, PlayerBody, StepOutcome};
use crate::platform::{Demo, GpuContext};
use crate::rendering_lib::shader::VOXEL_SHADER_SOURCE;
use crate::rendering_lib::voxel_renderer::VoxelRenderer;
use crate::settings::DisplaySettings;
use crate::ui::{voxel_panel, UiOverlay, VoxelStats};
use crate::voxel::{builder::generate_voxel_map, mesh::build_mesh, OutOfBounds, VoxelGrid};

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color { r: 0.0, g: 0.5, b: 0.8, a: 1.0 };

/// The level, the player and the rules that move one through the other.
pub struct VoxelWorld {
    pub grid: VoxelGrid,
    pub player: PlayerBody,
    pub tuning: MovementTuning,
    respawns: u32,
}

impl VoxelWorld {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, OutOfBounds> {
        let mut grid = VoxelGrid::new();
        generate_voxel_map(&mut grid, rng)?;
        Ok(Self {
            grid,
            player: PlayerBody::default(),
            tuning: MovementTuning::default(),
            respawns: 0,
        })
    }

    pub fn step(&mut self, input: MovementInput) -> StepOutcome {
        let outcome = self.player.step(&self.grid, input, &self.tuning);
        if outcome == StepOutcome::Respawned {
            self.respawns += 1;
            log::info!("Touched a hazard, respawning (#{})", self.respawns);
        }
        outcome
    }

    pub fn respawns(&self) -> u32 {
        self.respawns
    }

    pub fn view_projection(&self, camera: &Camera, aspect: f32) -> Mat4 {
        camera.view_projection(self.player.eye(), self.player.look_target(), aspect)
    }
}

pub struct VoxelApp {
    gpu: GpuContext,
    renderer: VoxelRenderer,
    overlay: UiOverlay,
    world: VoxelWorld,
    camera: Camera,
    clock: FixedTimestep,
    keyboard: KeyboardController,
    triangles: usize,
    show_panel: bool,
    frame_ms: f32,
}

impl VoxelApp {
    pub async fn new(window: Arc<Window>, settings: &DisplaySettings) -> Result<Self> {
        let gpu = GpuContext::new(window.clone(), settings.vertical_retrace).await?;

        let mut rng = StdRng::from_entropy();
        let world = VoxelWorld::generate(&mut rng).context("failed to generate voxel map")?;
        let mesh = build_mesh(&world.grid);

        let mut renderer = VoxelRenderer::new(
            &gpu.device,
            gpu.format(),
            VOXEL_SHADER_SOURCE,
            gpu.config.width,
            gpu.config.height,
        );
        renderer.upload_mesh(&gpu.device, &mesh);
        let overlay = UiOverlay::new(&gpu, &window);

        Ok(Self {
            gpu,
            renderer,
            overlay,
            world,
            camera: Camera::default(),
            clock: FixedTimestep::default(),
            keyboard: KeyboardController::new(),
            triangles: mesh.len() / 3,
            show_panel: true,
            frame_ms: 0.0,
        })
    }
}

impl Demo for VoxelApp {
    fn handle_window_event(&mut self, event: &WindowEvent, window: &Window) -> bool {
        if self.show_panel && self.overlay.handle_window_event(window, event) {
            return true;
        }
        if is_fresh_press(event, KeyCode::F1) {
            self.show_panel = !self.show_panel;
            return true;
        }
        self.keyboard.handle_window_event(event)
    }

    fn update(&mut self, dt: f32) {
        let input = self.keyboard.input();
        for _ in 0..self.clock.advance(dt) {
            self.world.step(input);
        }
        self.frame_ms = self.frame_ms * 0.9 + dt * 1000.0 * 0.1;
    }

    fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Voxel Command Encoder"),
        });

        let view_proj = self.world.view_projection(&self.camera, self.gpu.aspect());
        self.renderer.render(&self.gpu.queue, &mut encoder, &view, view_proj, CLEAR_COLOR);

        if self.show_panel {
            let player = &self.world.player;
            let stats = VoxelStats {
                cells: self.world.grid.len(),
                triangles: self.triangles,
                position: player.position.to_array(),
                heading_deg: player.heading.to_degrees().rem_euclid(360.0),
                respawns: self.world.respawns(),
                frame_ms: self.frame_ms,
            };
            self.overlay.render(&self.gpu, &mut encoder, &view, window, |ctx| voxel_panel(ctx, &stats));
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if self.gpu.resize(new_size) {
            self.renderer.resize(&self.gpu.device, new_size.width, new_size.height);
        }
    }

    fn size(&self) -> PhysicalSize<u32> {
        self.gpu.size
    }

    fn exit_requested(&self) -> bool {
        self.keyboard.exit_requested()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> VoxelWorld {
        VoxelWorld::generate(&mut StdRng::seed_from_u64(42)).unwrap()
    }

    #[test]
    fn player_lands_on_the_spawn_floor() {
        let mut world = world();
        let outcomes: Vec<_> = (0..120).map(|_| world.step(MovementInput::default())).collect();
        assert_eq!(outcomes.last(), Some(&StepOutcome::Grounded));
        assert_eq!(world.player.position.y, 2.0);
        assert_eq!(world.respawns(), 0);
    }

    #[test]
    fn camera_looks_along_the_heading() {
        let world = world();
        let vp = world.view_projection(&Camera::default(), 740.0 / 480.0);
        let ahead = world.player.look_target() * 5.0 - world.player.eye() * 4.0;
        let clip = vp * ahead.extend(1.0);
        assert!(clip.w > 0.0);
        assert!((clip.x / clip.w).abs() < 1e-4 && (clip.y / clip.w).abs() < 1e-4);
    }
}
