// src/shadows_app.rs

use std::f32::consts::TAU;
use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use winit::{dpi::PhysicalSize, event::WindowEvent, keyboard::KeyCode, window::Window};

use crate::engine_lib::clock::FixedTimestep;
use crate::engine_lib::controller::{is_fresh_press, KeyboardController};
use crate::platform::{Demo, GpuContext};
use crate::rendering_lib::flat_renderer::{FlatFrame, FlatRenderer};
use crate::rendering_lib::geometry::{regular_polygon, Point2};
use crate::rendering_lib::shader::FLAT_SHADER_SOURCE;
use crate::rendering_lib::shadow::{shadow_quads, ShadowQuad, DEFAULT_EXTRUDE_DISTANCE, MAX_CASTERS};
use crate::settings::DisplaySettings;
use crate::ui::{shadows_panel, ShadowStats, UiOverlay};

pub const PIXELS_PER_UNIT: f32 = 700.0;
pub const PHASE_STEP: f32 = 0.01;

const LIGHT_RING_SEGMENTS: usize = 20;
const LIGHT_RING_RADIUS: f32 = 0.05;
const LIGHT_RING_WIDTH: f32 = 0.004;
const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

fn grey(level: f32) -> [f32; 4] {
    [level, level, level, 1.0]
}

/// Half the visible world extent for a window of `size` pixels.
pub fn half_extent_for(size: PhysicalSize<u32>) -> [f32; 2] {
    [size.width as f32 / PIXELS_PER_UNIT, size.height as f32 / PIXELS_PER_UNIT]
}

/// A regular polygon orbiting the origin. Its radius pulses with the scene phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Caster {
    pub sides: usize,
    pub size: f32,
    pub orbit_radius: f32,
    pub orbit_rate: f32,
}

impl Caster {
    pub fn position(&self, phase: f32) -> Point2 {
        let angle = phase * self.orbit_rate;
        Point2::new(angle.cos() * self.orbit_radius, angle.sin() * self.orbit_radius)
    }

    pub fn radius(&self, phase: f32) -> f32 {
        phase.cos() * self.size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneFull;

impl fmt::Display for SceneFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene already holds {} casters", MAX_CASTERS)
    }
}

impl std::error::Error for SceneFull {}

#[derive(Debug, Clone)]
pub struct ShadowScene {
    light: Point2,
    casters: Vec<Caster>,
    phase: f32,
    extrude: f32,
}

impl Default for ShadowScene {
    fn default() -> Self {
        Self::new()
    }
}

impl ShadowScene {
    pub fn new() -> Self {
        Self {
            light: Point2::ORIGIN,
            casters: Vec::new(),
            phase: 0.0,
            extrude: DEFAULT_EXTRUDE_DISTANCE,
        }
    }

    /// Two pulsing hexagons, one orbiting at twice the rate of the other.
    pub fn demo() -> Self {
        let mut scene = Self::new();
        scene.casters.push(Caster { sides: 6, size: 0.1, orbit_radius: 0.4, orbit_rate: 1.0 });
        scene.casters.push(Caster { sides: 6, size: 0.1, orbit_radius: 0.7, orbit_rate: 2.0 });
        scene
    }

    pub fn add_caster(&mut self, caster: Caster) -> Result<(), SceneFull> {
        if self.casters.len() >= MAX_CASTERS {
            return Err(SceneFull);
        }
        self.casters.push(caster);
        Ok(())
    }

    pub fn casters(&self) -> &[Caster] {
        &self.casters
    }

    pub fn light(&self) -> Point2 {
        self.light
    }

    pub fn set_light(&mut self, light: Point2) {
        self.light = light;
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn advance(&mut self) {
        self.phase += PHASE_STEP;
    }

    pub fn shadow_quads(&self) -> Vec<ShadowQuad> {
        self.casters
            .iter()
            .flat_map(|caster| {
                let polygon = regular_polygon(caster.sides, caster.radius(self.phase));
                shadow_quads(&polygon, caster.position(self.phase), self.light, self.extrude)
            })
            .collect()
    }

    /// Fills `frame` in draw order and returns the number of shadow quads.
    pub fn build_frame(&self, frame: &mut FlatFrame, half_extent: [f32; 2]) -> usize {
        frame.clear();
        let [w, h] = half_extent;

        let top_left = Point2::new(-w, h);
        let bottom_left = Point2::new(-w, -h);
        let bottom_right = Point2::new(w, -h);
        let top_right = Point2::new(w, h);
        frame.push_triangles(&[
            (top_left, grey(0.3)),
            (bottom_left, grey(0.2)),
            (bottom_right, grey(0.15)),
            (top_left, grey(0.3)),
            (bottom_right, grey(0.15)),
            (top_right, grey(0.4)),
        ]);

        let ring: Vec<Point2> = (0..LIGHT_RING_SEGMENTS)
            .map(|i| {
                let angle = i as f32 * TAU / LIGHT_RING_SEGMENTS as f32;
                self.light.add(&Point2::new(angle.cos(), angle.sin()).scale(LIGHT_RING_RADIUS))
            })
            .collect();
        frame.push_outline(&ring, LIGHT_RING_WIDTH, WHITE);

        for caster in &self.casters {
            let polygon = regular_polygon(caster.sides, caster.radius(self.phase))
                .translated(caster.position(self.phase));
            frame.push_solid_fan(polygon.vertices(), WHITE);
        }

        let quads = self.shadow_quads();
        for quad in &quads {
            let [a, b, c, d] = quad.fan();
            frame.push_fan(&[
                (a, ShadowQuad::near_color()),
                (b, ShadowQuad::near_color()),
                (c, ShadowQuad::far_color()),
                (d, ShadowQuad::far_color()),
            ]);
        }
        quads.len()
    }
}

pub struct ShadowsApp {
    gpu: GpuContext,
    renderer: FlatRenderer,
    overlay: UiOverlay,
    scene: ShadowScene,
    frame: FlatFrame,
    clock: FixedTimestep,
    keyboard: KeyboardController,
    show_panel: bool,
    stats: ShadowStats,
}

impl ShadowsApp {
    pub async fn new(window: Arc<Window>, settings: &DisplaySettings) -> Result<Self> {
        let gpu = GpuContext::new(window.clone(), settings.vertical_retrace).await?;
        let renderer = FlatRenderer::new(&gpu.device, gpu.format(), FLAT_SHADER_SOURCE, half_extent_for(gpu.size));
        let overlay = UiOverlay::new(&gpu, &window);
        let scene = ShadowScene::demo();
        log::info!("Shadow scene ready with {} casters", scene.casters().len());

        Ok(Self {
            gpu,
            renderer,
            overlay,
            scene,
            frame: FlatFrame::default(),
            clock: FixedTimestep::default(),
            keyboard: KeyboardController::new(),
            show_panel: true,
            stats: ShadowStats::default(),
        })
    }
}

impl Demo for ShadowsApp {
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
        for _ in 0..self.clock.advance(dt) {
            self.scene.advance();
        }
        self.stats.frame_ms = self.stats.frame_ms * 0.9 + dt * 1000.0 * 0.1;
    }

    fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Shadows Command Encoder"),
        });

        let quads = self.scene.build_frame(&mut self.frame, half_extent_for(self.gpu.size));
        self.renderer.render_frame(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &view,
            &self.frame,
            wgpu::Color::BLACK,
        );

        if self.show_panel {
            self.stats.casters = self.scene.casters().len();
            self.stats.shadow_quads = quads;
            self.stats.triangles = self.frame.triangle_count();
            let stats = self.stats;
            self.overlay.render(&self.gpu, &mut encoder, &view, window, |ctx| shadows_panel(ctx, &stats));
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if self.gpu.resize(new_size) {
            self.renderer.set_half_extent(&self.gpu.queue, half_extent_for(new_size));
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

    #[test]
    fn demo_matches_the_animation() {
        let mut scene = ShadowScene::demo();
        for _ in 0..50 {
            scene.advance();
        }
        let phase = scene.phase();
        assert!((phase - 0.5).abs() < 1e-4);

        let [first, second] = [scene.casters()[0], scene.casters()[1]];
        let p1 = first.position(phase);
        let p2 = second.position(phase);
        assert!((p1.x - phase.cos() * 0.4).abs() < 1e-6 && (p1.y - phase.sin() * 0.4).abs() < 1e-6);
        assert!((p2.x - (2.0 * phase).cos() * 0.7).abs() < 1e-6);
        assert!((first.radius(phase) - phase.cos() * 0.1).abs() < 1e-6);
    }

    #[test]
    fn adding_past_the_limit_fails() {
        let mut scene = ShadowScene::new();
        let caster = Caster { sides: 4, size: 0.1, orbit_radius: 0.5, orbit_rate: 1.0 };
        for _ in 0..MAX_CASTERS {
            scene.add_caster(caster).unwrap();
        }
        assert_eq!(scene.add_caster(caster), Err(SceneFull));
        assert_eq!(scene.casters().len(), MAX_CASTERS);
    }

    #[test]
    fn each_hexagon_casts_four_quads() {
        // Both hexagons point a vertex at the light, so only the two edges
        // nearest it face the light.
        let mut scene = ShadowScene::demo();
        scene.advance();
        assert_eq!(scene.shadow_quads().len(), 8);
    }

    #[test]
    fn frame_layers_in_draw_order() {
        let mut scene = ShadowScene::demo();
        scene.advance();
        let mut frame = FlatFrame::default();
        let quads = scene.build_frame(&mut frame, half_extent_for(PhysicalSize::new(640, 640)));

        // Background, the ring's edge quads, two hexagon fans, then two
        // triangles per shadow quad.
        assert_eq!(frame.triangle_count(), 2 + LIGHT_RING_SEGMENTS * 2 + 2 * 4 + quads * 2);

        let corner = frame.vertices[0];
        assert!((corner.position[0] + 640.0 / 700.0).abs() < 1e-6);
        assert_eq!(corner.color, grey(0.3));

        // The ring sits between the background and the first caster.
        let ring_start = 6;
        let caster_start = ring_start + LIGHT_RING_SEGMENTS * 4;
        let ring_point = frame.vertices[ring_start].position;
        assert!(Point2::new(ring_point[0], ring_point[1]).length() < LIGHT_RING_RADIUS + LIGHT_RING_WIDTH);
        let first = scene.casters()[0];
        let hexagon = regular_polygon(first.sides, first.radius(scene.phase())).translated(first.position(scene.phase()));
        let tip = hexagon.vertices()[0];
        assert_eq!(frame.vertices[caster_start].position, [tip.x, tip.y]);

        let last = frame.vertices[frame.vertices.len() - 1];
        assert_eq!(last.color, ShadowQuad::far_color());
    }

    #[test]
    fn ring_follows_the_light() {
        let mut scene = ShadowScene::new();
        scene.set_light(Point2::new(0.25, -0.1));
        let mut frame = FlatFrame::default();
        assert_eq!(scene.build_frame(&mut frame, [1.0, 1.0]), 0);
        // The first edge quad straddles the ring point at angle zero.
        let [a, b] = [frame.vertices[6].position, frame.vertices[7].position];
        let mid = [(a[0] + b[0]) * 0.5, (a[1] + b[1]) * 0.5];
        assert!((mid[0] - 0.30).abs() < 1e-6 && (mid[1] + 0.1).abs() < 1e-6);
    }
}
