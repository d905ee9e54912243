//! Axis gizmo: three colored lines from the origin along +X/+Y/+Z.
//!
//! Drawn over the scene when the `gizmos` control is on, scaled to the
//! extent of the current mesh on each load.

use wgpu::util::DeviceExt;

use crate::gpu::render_context::RenderContext;
use crate::renderer::depth_stencil_state;

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct GizmoVertex {
    position: [f32; 3],
    color: [f32; 3],
}

impl GizmoVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

const AXIS_COLORS: [[f32; 3]; 3] = [
    [0.9, 0.2, 0.2], // X
    [0.2, 0.9, 0.2], // Y
    [0.2, 0.4, 0.9], // Z
];

fn axis_vertices(scale: f32) -> [GizmoVertex; 6] {
    let axes = [
        [scale, 0.0, 0.0],
        [0.0, scale, 0.0],
        [0.0, 0.0, scale],
    ];
    let mut vertices = [GizmoVertex {
        position: [0.0; 3],
        color: [0.0; 3],
    }; 6];
    for (i, (tip, color)) in axes.iter().zip(AXIS_COLORS).enumerate() {
        vertices[i * 2] = GizmoVertex {
            position: [0.0; 3],
            color,
        };
        vertices[i * 2 + 1] = GizmoVertex {
            position: *tip,
            color,
        };
    }
    vertices
}

/// Line-list pipeline and vertex buffer for the axis gizmo.
pub struct GizmoRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
}

impl GizmoRenderer {
    /// Create the gizmo pipeline against the given camera layout.
    pub fn new(
        context: &RenderContext,
        camera_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = context.device.create_shader_module(
            wgpu::ShaderModuleDescriptor {
                label: Some("Gizmo Shader"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!("shaders/gizmo.wgsl").into(),
                ),
            },
        );

        let pipeline_layout = context.device.create_pipeline_layout(
            &wgpu::PipelineLayoutDescriptor {
                label: Some("Gizmo Pipeline Layout"),
                bind_group_layouts: &[camera_layout],
                push_constant_ranges: &[],
            },
        );

        let pipeline = context.device.create_render_pipeline(
            &wgpu::RenderPipelineDescriptor {
                label: Some("Gizmo Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[GizmoVertex::layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: context.format(),
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::LineList,
                    ..Default::default()
                },
                depth_stencil: Some(depth_stencil_state()),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            },
        );

        let vertex_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Gizmo Vertex Buffer"),
                contents: bytemuck::cast_slice(&axis_vertices(1.0)),
                usage: wgpu::BufferUsages::VERTEX
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        Self {
            pipeline,
            vertex_buffer,
        }
    }

    /// Rescale the axis lines to match a new mesh extent.
    pub fn set_scale(&self, queue: &wgpu::Queue, scale: f32) {
        queue.write_buffer(
            &self.vertex_buffer,
            0,
            bytemuck::cast_slice(&axis_vertices(scale)),
        );
    }

    /// Record the gizmo draw.
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
    ) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..6, 0..1);
    }
}
