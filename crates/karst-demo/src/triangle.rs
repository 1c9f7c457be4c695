use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use karst_view::device::{Frame, GpuContext};
use karst_view::view::{Color, Presenter, Renderer, SurfaceConfig};

/// Presenter for the demo: dark clear color, default surface settings.
pub struct TrianglePresenter;

impl Presenter for TrianglePresenter {
    fn configure(&self, config: &mut SurfaceConfig) {
        config.clear_color = Color::new(0.012, 0.012, 0.02, 1.0);
    }

    fn make_renderer(&self, gpu: &GpuContext<'_>) -> Result<Box<dyn Renderer>> {
        Ok(Box::new(TriangleRenderer::new(gpu)))
    }
}

/// One pipeline, one vertex buffer, one viewport uniform.
///
/// Pipeline creation may fail (shader or descriptor validation); the failure
/// is logged and the renderer keeps empty state, in which case `draw` is a
/// no-op and only the host's clear pass reaches the screen.
pub struct TriangleRenderer {
    pipeline: Option<wgpu::RenderPipeline>,
    vertex_buffer: Option<wgpu::Buffer>,
    viewport_ubo: Option<wgpu::Buffer>,
    bind_group: Option<wgpu::BindGroup>,
}

impl TriangleRenderer {
    pub fn new(gpu: &GpuContext<'_>) -> Self {
        let mut renderer = Self {
            pipeline: None,
            vertex_buffer: None,
            viewport_ubo: None,
            bind_group: None,
        };

        // wgpu reports invalid shaders/descriptors through error scopes
        // rather than return values. Create everything inside one scope and
        // keep the handles only if it comes back clean.
        let scope = gpu.device().push_error_scope(wgpu::ErrorFilter::Validation);
        let state = build_state(gpu);
        let error = pollster::block_on(scope.pop());

        if let Some(state) = keep_if_clean(state, error) {
            renderer.pipeline = Some(state.pipeline);
            renderer.vertex_buffer = Some(state.vertex_buffer);
            renderer.viewport_ubo = Some(state.viewport_ubo);
            renderer.bind_group = Some(state.bind_group);
        }

        renderer
    }
}

impl Renderer for TriangleRenderer {
    fn resize(&mut self, gpu: &GpuContext<'_>, new_size: PhysicalSize<u32>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else {
            return;
        };
        let u = ViewportUniform::for_size(new_size);
        gpu.queue().write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    fn draw(&mut self, _gpu: &GpuContext<'_>, frame: &mut Frame) {
        let Some(pipeline) = self.pipeline.as_ref() else {
            return;
        };
        let Some(vertex_buffer) = self.vertex_buffer.as_ref() else {
            return;
        };
        let Some(bind_group) = self.bind_group.as_ref() else {
            return;
        };

        let mut rpass = frame
            .encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("triangle pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        // The host already cleared the frame.
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vertex_buffer.slice(..));
        rpass.draw(0..TRIANGLE.len() as u32, 0..1);
    }
}

/// Keeps freshly created GPU state only when the validation scope was clean.
///
/// On a validation error the handles are invalid; they are dropped and the
/// error is logged, leaving the renderer to no-op its draws.
fn keep_if_clean<T>(state: T, error: Option<wgpu::Error>) -> Option<T> {
    if let Some(err) = error {
        log::error!("triangle pipeline creation failed: {err}");
        return None;
    }
    Some(state)
}

struct TriangleState {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    viewport_ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

fn build_state(gpu: &GpuContext<'_>) -> TriangleState {
    let device = gpu.device();

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("triangle shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/triangle.wgsl").into()),
    });

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("triangle bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: ViewportUniform::min_binding_size(),
            },
            count: None,
        }],
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("triangle pipeline layout"),
        bind_group_layouts: &[&bind_group_layout],
        immediate_size: 0,
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("triangle pipeline"),
        layout: Some(&pipeline_layout),

        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[Vertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: gpu.surface_format(),
                blend: Some(wgpu::BlendState::REPLACE),
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
        multisample: wgpu::MultisampleState::default(),

        multiview_mask: None,
        cache: None,
    });

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("triangle vbo"),
        contents: bytemuck::cast_slice(&TRIANGLE),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let viewport_ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("triangle viewport ubo"),
        contents: bytemuck::bytes_of(&ViewportUniform::for_size(gpu.size())),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("triangle bind group"),
        layout: &bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: viewport_ubo.as_entire_binding(),
        }],
    });

    TriangleState {
        pipeline,
        vertex_buffer,
        viewport_ubo,
        bind_group,
    }
}

// ── vertex data ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 2],
    color: [f32; 4],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const TRIANGLE: [Vertex; 3] = [
    Vertex { position: [0.0, 0.5], color: [1.0, 0.0, 0.0, 1.0] },
    Vertex { position: [-0.5, -0.5], color: [0.0, 1.0, 0.0, 1.0] },
    Vertex { position: [0.5, -0.5], color: [0.0, 0.0, 1.0, 1.0] },
];

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    size: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

impl ViewportUniform {
    fn for_size(size: PhysicalSize<u32>) -> Self {
        Self {
            size: [size.width.max(1) as f32, size.height.max(1) as f32],
            _pad: [0.0; 2],
        }
    }

    fn min_binding_size() -> Option<std::num::NonZeroU64> {
        std::num::NonZeroU64::new(std::mem::size_of::<Self>() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── vertex layout ─────────────────────────────────────────────────────

    #[test]
    fn vertex_stride_matches_attributes() {
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
    }

    #[test]
    fn vertex_attributes_are_position_then_color() {
        assert_eq!(Vertex::ATTRS[0].offset, 0);
        assert_eq!(Vertex::ATTRS[0].format, wgpu::VertexFormat::Float32x2);
        assert_eq!(Vertex::ATTRS[1].offset, 8);
        assert_eq!(Vertex::ATTRS[1].format, wgpu::VertexFormat::Float32x4);
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn triangle_is_counter_clockwise() {
        let [a, b, c] = TRIANGLE.map(|v| v.position);
        let signed_area =
            (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]);
        assert!(signed_area > 0.0);
    }

    #[test]
    fn triangle_vertices_are_opaque_and_in_ndc() {
        for v in TRIANGLE {
            assert!(v.position[0].abs() <= 1.0 && v.position[1].abs() <= 1.0);
            assert_eq!(v.color[3], 1.0);
        }
    }

    // ── creation failure ──────────────────────────────────────────────────

    #[test]
    fn validation_error_discards_created_state() {
        let err = wgpu::Error::Validation {
            source: Box::new(std::io::Error::other("synthetic")),
            description: "synthetic validation failure".to_string(),
        };
        assert_eq!(keep_if_clean((), Some(err)), None);
    }

    #[test]
    fn clean_scope_keeps_state() {
        assert_eq!(keep_if_clean(42, None), Some(42));
    }

    // ── viewport uniform ──────────────────────────────────────────────────

    #[test]
    fn viewport_uniform_is_16_bytes() {
        assert_eq!(std::mem::size_of::<ViewportUniform>(), 16);
        assert_eq!(ViewportUniform::min_binding_size().map(|n| n.get()), Some(16));
    }

    #[test]
    fn viewport_uniform_clamps_zero_sizes() {
        let u = ViewportUniform::for_size(PhysicalSize::new(0, 0));
        assert_eq!(u.size, [1.0, 1.0]);
    }
}
