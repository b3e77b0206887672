//! Rendering system with wgpu pipeline and point quad expansion.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::error::{TremoloError, TremoloResult};
use crate::motion::DrawPoint;
use crate::params::{OverlayPlacement, RenderConfig};
use crate::session::FrameSketch;

/// One vertex of an expanded point quad
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PointVertex {
    /// Image-space position of this quad corner (pixels)
    pub position: [f32; 2],

    /// Corner coordinate in -1..1 quad space; the fragment shader uses
    /// its length to round the quad into a dot
    pub corner: [f32; 2],

    /// Premultiplied-nothing linear RGBA
    pub color: [f32; 4],
}

/// Uniform buffer for one point layer (image-to-clip transform)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LayerUniforms {
    pub transform: [[f32; 4]; 4],
}

/// Two triangles covering the -1..1 quad
const QUAD_CORNERS: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

/// Expand resolved points into quad vertices, reusing the output vec
pub fn expand_points(points: &[DrawPoint], point_scale: f32, out: &mut Vec<PointVertex>) {
    out.clear();
    out.reserve(points.len() * QUAD_CORNERS.len());
    for point in points {
        let half = point.size * 0.5 * point_scale;
        for corner in QUAD_CORNERS {
            out.push(PointVertex {
                position: [
                    point.position.x + corner[0] * half,
                    point.position.y + corner[1] * half,
                ],
                corner,
                color: point.color,
            });
        }
    }
}

/// Pixel-space orthographic projection: origin top-left, y down
fn image_projection(width: f32, height: f32) -> Mat4 {
    Mat4::orthographic_rh(0.0, width, height, 0.0, -1.0, 1.0)
}

/// Overlay model matrix from its placement (scale, then rotate, then
/// translate, all in image space)
fn overlay_model(placement: &OverlayPlacement) -> Mat4 {
    Mat4::from_translation(Vec3::new(placement.offset[0], placement.offset[1], 0.0))
        * Mat4::from_rotation_z(placement.rotation_rad)
        * Mat4::from_scale(Vec3::new(placement.scale, placement.scale, 1.0))
}

fn vertex_buffer_size(points: usize) -> u64 {
    (points * QUAD_CORNERS.len() * std::mem::size_of::<PointVertex>()) as u64
}

/// Rendering system managing wgpu device, pipeline, and buffers
pub struct RenderSystem {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    field_vertices: wgpu::Buffer,
    field_bind_group: wgpu::BindGroup,
    overlay_vertices: wgpu::Buffer,
    overlay_bind_group: wgpu::BindGroup,
    field_count: u32,
    overlay_count: u32,
    scratch: Vec<PointVertex>,
    config: RenderConfig,
}

impl RenderSystem {
    /// Create the rendering system for a window.
    ///
    /// Buffers are sized for the given point counts and the layer
    /// transforms are written once up front; the view over the painting
    /// never moves, so only vertex data changes per frame.
    pub async fn new(
        window: Arc<winit::window::Window>,
        field_points: usize,
        overlay_points: usize,
        image_size: (u32, u32),
        overlay_placement: &OverlayPlacement,
        render_config: RenderConfig,
    ) -> TremoloResult<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Window must have 'static lifetime via Arc
        let surface = instance
            .create_surface(window)
            .map_err(|e| TremoloError::render(format!("Failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| TremoloError::render("Failed to find suitable GPU adapter"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(|e| TremoloError::render(format!("Failed to request device: {}", e)))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Point Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let field_vertices = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Field Vertex Buffer"),
            size: vertex_buffer_size(field_points),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let overlay_vertices = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Overlay Vertex Buffer"),
            size: vertex_buffer_size(overlay_points),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Static camera over the painting; written once
        let projection = image_projection(image_size.0 as f32, image_size.1 as f32);
        let field_uniforms = LayerUniforms {
            transform: projection.to_cols_array_2d(),
        };
        let overlay_uniforms = LayerUniforms {
            transform: (projection * overlay_model(overlay_placement)).to_cols_array_2d(),
        };

        let field_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Field Uniform Buffer"),
            contents: bytemuck::cast_slice(&[field_uniforms]),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let overlay_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Uniform Buffer"),
            contents: bytemuck::cast_slice(&[overlay_uniforms]),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Layer Bind Group Layout"),
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
        });

        let field_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Field Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: field_uniform_buffer.as_entire_binding(),
            }],
        });

        let overlay_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Overlay Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: overlay_uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Point Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Point Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<PointVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x2,
                        },
                        wgpu::VertexAttribute {
                            offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x2,
                        },
                        wgpu::VertexAttribute {
                            offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                            shader_location: 2,
                            format: wgpu::VertexFormat::Float32x4,
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
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
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            pipeline,
            field_vertices,
            field_bind_group,
            overlay_vertices,
            overlay_bind_group,
            field_count: 0,
            overlay_count: 0,
            scratch: Vec::new(),
            config: render_config,
        })
    }

    /// Upload this frame's resolved points into the vertex buffers
    pub fn prepare(&mut self, sketch: &FrameSketch) {
        expand_points(&sketch.field, self.config.point_scale, &mut self.scratch);
        self.field_count = self.scratch.len() as u32;
        if !self.scratch.is_empty() {
            self.queue
                .write_buffer(&self.field_vertices, 0, bytemuck::cast_slice(&self.scratch));
        }

        expand_points(&sketch.overlay, self.config.point_scale, &mut self.scratch);
        self.overlay_count = self.scratch.len() as u32;
        if !self.scratch.is_empty() {
            self.queue.write_buffer(
                &self.overlay_vertices,
                0,
                bytemuck::cast_slice(&self.scratch),
            );
        }
    }

    /// Render the prepared frame
    pub fn render(&self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let [r, g, b, a] = self.config.clear_color;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);

            if self.field_count > 0 {
                render_pass.set_bind_group(0, &self.field_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.field_vertices.slice(..));
                render_pass.draw(0..self.field_count, 0..1);
            }

            // Overlay draws last so the figure reads on top of the field
            if self.overlay_count > 0 {
                render_pass.set_bind_group(0, &self.overlay_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.overlay_vertices.slice(..));
                render_pass.draw(0..self.overlay_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn draw_point(x: f32, y: f32, size: f32) -> DrawPoint {
        DrawPoint {
            position: Vec2::new(x, y),
            color: [0.5, 0.25, 0.125, 1.0],
            size,
        }
    }

    #[test]
    fn expand_builds_six_vertices_per_point() {
        let points = vec![draw_point(10.0, 20.0, 4.0), draw_point(30.0, 40.0, 2.0)];
        let mut out = Vec::new();

        expand_points(&points, 1.0, &mut out);

        assert_eq!(out.len(), 12);
        // First corner of the first quad sits half a size up-left
        assert_eq!(out[0].position, [8.0, 18.0]);
        assert_eq!(out[0].corner, [-1.0, -1.0]);
        assert_eq!(out[0].color, points[0].color);
        // Last corner of the second quad
        assert_eq!(out[11].position, [29.0, 41.0]);
    }

    #[test]
    fn expand_applies_the_point_scale() {
        let points = vec![draw_point(0.0, 0.0, 4.0)];
        let mut out = Vec::new();

        expand_points(&points, 2.0, &mut out);

        // half = 4.0 * 0.5 * 2.0
        assert_eq!(out[0].position, [-4.0, -4.0]);
    }

    #[test]
    fn expand_reuses_and_clears_the_scratch() {
        let mut out = Vec::new();
        expand_points(&[draw_point(0.0, 0.0, 1.0)], 1.0, &mut out);
        expand_points(&[], 1.0, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn image_projection_maps_corners_to_clip_space() {
        let m = image_projection(300.0, 200.0);

        let top_left = m.transform_point3(Vec3::new(0.0, 0.0, 0.0));
        assert!((top_left.x - -1.0).abs() < 1e-6);
        assert!((top_left.y - 1.0).abs() < 1e-6);

        let bottom_right = m.transform_point3(Vec3::new(300.0, 200.0, 0.0));
        assert!((bottom_right.x - 1.0).abs() < 1e-6);
        assert!((bottom_right.y - -1.0).abs() < 1e-6);
    }

    #[test]
    fn default_placement_is_the_identity_model() {
        let model = overlay_model(&OverlayPlacement::default());
        assert_eq!(model, Mat4::IDENTITY);
    }

    #[test]
    fn placement_translates_after_scaling() {
        let placement = OverlayPlacement {
            scale: 2.0,
            rotation_rad: 0.0,
            offset: [10.0, 5.0],
        };
        let model = overlay_model(&placement);

        let p = model.transform_point3(Vec3::new(3.0, 4.0, 0.0));
        assert!((p.x - 16.0).abs() < 1e-6);
        assert!((p.y - 13.0).abs() < 1e-6);
    }

    #[test]
    fn point_vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<PointVertex>(), 32);
    }
}
