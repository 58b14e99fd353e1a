// src/rendering_lib/flat_renderer.rs

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::geometry::Point2;
use super::vertex::Vertex;

const INITIAL_MAX_VERTICES: usize = 1024;
const INITIAL_MAX_INDICES: usize = 3072;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ProjectionUniform {
    half_extent: [f32; 2],
    _padding: [f32; 2],
}

/// CPU-side geometry for one 2D frame, in submission order.
#[derive(Default, Debug)]
pub struct FlatFrame {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl FlatFrame {
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Triangle fan around the first point, one colour per point.
    pub fn push_fan(&mut self, points: &[(Point2, [f32; 4])]) {
        if points.len() < 3 {
            return;
        }
        let start = self.vertices.len() as u32;
        for (p, color) in points {
            self.vertices.push(Vertex::new([p.x, p.y], *color));
        }
        for i in 1..(points.len() as u32 - 1) {
            self.indices.push(start);
            self.indices.push(start + i);
            self.indices.push(start + i + 1);
        }
    }

    pub fn push_solid_fan(&mut self, points: &[Point2], color: [f32; 4]) {
        let colored: Vec<_> = points.iter().map(|p| (*p, color)).collect();
        self.push_fan(&colored);
    }

    /// Independent triangles, three points at a time.
    pub fn push_triangles(&mut self, points: &[(Point2, [f32; 4])]) {
        for tri in points.chunks_exact(3) {
            self.push_fan(tri);
        }
    }

    /// Closed outline, one quad of `width` per edge. Outlines share the
    /// triangle stream, so they layer with fills in submission order.
    pub fn push_outline(&mut self, points: &[Point2], width: f32, color: [f32; 4]) {
        if points.len() < 2 {
            return;
        }
        for (i, p) in points.iter().enumerate() {
            let next = points[(i + 1) % points.len()];
            let dir = next.sub(p);
            let side = Point2::new(-dir.y, dir.x).normalize().scale(width * 0.5);
            self.push_solid_fan(&[p.add(&side), p.sub(&side), next.sub(&side), next.add(&side)], color);
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

pub struct FlatRenderer {
    fill_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    index_buffer: wgpu::Buffer,
    index_capacity: usize,

    projection_buffer: wgpu::Buffer,
    projection_bind_group: wgpu::BindGroup,
}

impl FlatRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        shader_source: &str,
        half_extent: [f32; 2],
    ) -> Self {
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Flat Shader Module"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let projection = ProjectionUniform { half_extent, _padding: [0.0; 2] };
        let projection_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Flat Projection Uniform Buffer"),
            contents: bytemuck::bytes_of(&projection),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let projection_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("flat_projection_bind_group_layout"),
        });

        let projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &projection_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_buffer.as_entire_binding(),
            }],
            label: Some("flat_projection_bind_group"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Flat Pipeline Layout"),
            bind_group_layouts: &[&projection_bind_group_layout],
            push_constant_ranges: &[],
        });

        let fill_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Flat Fill Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vs_main",
                buffers: &[Vertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        Self {
            fill_pipeline,
            vertex_buffer: Self::create_buffer(device, "Flat Vertex Buffer", INITIAL_MAX_VERTICES * std::mem::size_of::<Vertex>(), wgpu::BufferUsages::VERTEX),
            vertex_capacity: INITIAL_MAX_VERTICES,
            index_buffer: Self::create_buffer(device, "Flat Index Buffer", INITIAL_MAX_INDICES * std::mem::size_of::<u32>(), wgpu::BufferUsages::INDEX),
            index_capacity: INITIAL_MAX_INDICES,
            projection_buffer,
            projection_bind_group,
        }
    }

    fn create_buffer(device: &wgpu::Device, label: &str, size: usize, usage: wgpu::BufferUsages) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: size as u64,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn set_half_extent(&self, queue: &wgpu::Queue, half_extent: [f32; 2]) {
        let projection = ProjectionUniform { half_extent, _padding: [0.0; 2] };
        queue.write_buffer(&self.projection_buffer, 0, bytemuck::bytes_of(&projection));
    }

    // Buffers only ever grow; a frame never shrinks them back.
    fn ensure_capacity(&mut self, device: &wgpu::Device, frame: &FlatFrame) {
        if frame.vertices.len() > self.vertex_capacity {
            self.vertex_capacity = frame.vertices.len().next_power_of_two();
            log::debug!("Growing flat vertex buffer to {} vertices", self.vertex_capacity);
            self.vertex_buffer = Self::create_buffer(device, "Flat Vertex Buffer", self.vertex_capacity * std::mem::size_of::<Vertex>(), wgpu::BufferUsages::VERTEX);
        }
        if frame.indices.len() > self.index_capacity {
            self.index_capacity = frame.indices.len().next_power_of_two();
            log::debug!("Growing flat index buffer to {} indices", self.index_capacity);
            self.index_buffer = Self::create_buffer(device, "Flat Index Buffer", self.index_capacity * std::mem::size_of::<u32>(), wgpu::BufferUsages::INDEX);
        }
    }

    /// Clears the target and draws the whole frame in submission order.
    pub fn render_frame(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        output_view: &wgpu::TextureView,
        frame: &FlatFrame,
        clear_color: wgpu::Color,
    ) {
        self.ensure_capacity(device, frame);

        if !frame.indices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&frame.vertices));
            queue.write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&frame.indices));
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Flat Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output_view,
                resolve_target: None,
                ops: wgpu::Operations { load: wgpu::LoadOp::Clear(clear_color), store: wgpu::StoreOp::Store },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_bind_group(0, &self.projection_bind_group, &[]);

        if !frame.indices.is_empty() {
            let vertex_bytes = (frame.vertices.len() * std::mem::size_of::<Vertex>()) as u64;
            let index_bytes = (frame.indices.len() * std::mem::size_of::<u32>()) as u64;
            render_pass.set_pipeline(&self.fill_pipeline);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..vertex_bytes));
            render_pass.set_index_buffer(self.index_buffer.slice(..index_bytes), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..frame.indices.len() as u32, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn fan_triangulates_around_first_point() {
        let mut frame = FlatFrame::default();
        let quad = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        frame.push_solid_fan(&quad, WHITE);
        frame.push_solid_fan(&quad, WHITE);
        assert_eq!(frame.vertices.len(), 8);
        assert_eq!(frame.indices, vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn degenerate_fan_is_skipped() {
        let mut frame = FlatFrame::default();
        frame.push_solid_fan(&[Point2::ORIGIN, Point2::new(1.0, 0.0)], WHITE);
        assert!(frame.vertices.is_empty());
        assert_eq!(frame.triangle_count(), 0);
    }

    #[test]
    fn triangles_are_independent() {
        let mut frame = FlatFrame::default();
        let p = (Point2::ORIGIN, WHITE);
        frame.push_triangles(&[p; 7]);
        // The trailing point does not form a triangle.
        assert_eq!(frame.triangle_count(), 2);
    }

    #[test]
    fn outline_closes_with_one_quad_per_edge() {
        let mut frame = FlatFrame::default();
        let tri = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)];
        frame.push_outline(&tri, 0.2, WHITE);
        assert_eq!(frame.vertices.len(), 12);
        assert_eq!(frame.triangle_count(), 6);

        // First edge runs along +x, so its quad spans y = ±0.1.
        assert_eq!(frame.vertices[0].position, [0.0, 0.1]);
        assert_eq!(frame.vertices[1].position, [0.0, -0.1]);
        // Last edge returns to the first point.
        let closing = frame.vertices[11].position;
        assert!((closing[0] - 0.1).abs() < 1e-6 && closing[1].abs() < 1e-6);

        frame.clear();
        assert!(frame.vertices.is_empty());
        assert_eq!(frame.triangle_count(), 0);
    }

    #[test]
    fn outline_layers_with_fills_in_order() {
        let mut frame = FlatFrame::default();
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        frame.push_solid_fan(&square, [0.0, 0.0, 0.0, 1.0]);
        frame.push_outline(&square, 0.1, WHITE);
        frame.push_solid_fan(&square, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(frame.triangle_count(), 2 + 4 * 2 + 2);
        assert_eq!(frame.vertices[4].color, WHITE);
        assert_eq!(frame.vertices[frame.vertices.len() - 1].color, [1.0, 0.0, 0.0, 1.0]);
    }
}
