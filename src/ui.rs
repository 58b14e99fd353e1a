// src/ui.rs

use winit::{event::WindowEvent, window::Window};

use crate::platform::GpuContext;

/// egui state plus its wgpu renderer, drawn on top of a finished frame.
pub struct UiOverlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl UiOverlay {
    pub fn new(gpu: &GpuContext, window: &Window) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
        );
        let renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.format(), None, 1);
        Self { ctx, state, renderer }
    }

    pub fn handle_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    pub fn render(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        window: &Window,
        build: impl FnOnce(&egui::Context),
    ) {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, build);
        self.state.handle_platform_output(window, full_output.platform_output);
        let tris = self.ctx.tessellate(full_output.shapes, self.ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };
        self.renderer.update_buffers(&gpu.device, &gpu.queue, encoder, &tris, &screen_descriptor);
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Overlay Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            self.renderer.render(&mut pass, &tris, &screen_descriptor);
        }
        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShadowStats {
    pub casters: usize,
    pub shadow_quads: usize,
    pub triangles: usize,
    pub frame_ms: f32,
}

pub fn shadows_panel(ctx: &egui::Context, stats: &ShadowStats) {
    egui::Window::new("Shadows")
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!("Casters: {}", stats.casters));
            ui.label(format!("Shadow quads: {}", stats.shadow_quads));
            ui.label(format!("Triangles: {}", stats.triangles));
            ui.label(format!("Frame: {:.2} ms", stats.frame_ms));
            ui.separator();
            ui.label("F1: hide this panel");
            ui.label("Escape: quit");
        });
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VoxelStats {
    pub cells: usize,
    pub triangles: usize,
    pub position: [f32; 3],
    pub heading_deg: f32,
    pub respawns: u32,
    pub frame_ms: f32,
}

pub fn voxel_panel(ctx: &egui::Context, stats: &VoxelStats) {
    egui::Window::new("Voxel Environment")
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!("Cells: {}  Triangles: {}", stats.cells, stats.triangles));
            let [x, y, z] = stats.position;
            ui.label(format!("Position: {x:.2}, {y:.2}, {z:.2}"));
            ui.label(format!("Heading: {:.0}°", stats.heading_deg));
            ui.label(format!("Respawns: {}", stats.respawns));
            ui.label(format!("Frame: {:.2} ms", stats.frame_ms));
            ui.separator();
            ui.label("W/S: forward/back  A/D: strafe");
            ui.label("Left/Right: turn  Space: jump");
            ui.label("F1: hide this panel  Escape: quit");
        });
}
