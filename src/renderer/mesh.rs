//! Forward renderer for the loaded mesh.
//!
//! Owns the mesh pipeline, the material uniform, and the current GPU
//! vertex buffer. On reload the previous vertex buffer is destroyed
//! before the new one is created.

use wgpu::util::DeviceExt;

use crate::gpu::render_context::RenderContext;
use crate::gpu::uniform::UniformBinding;
use crate::mesh::{MeshData, MeshVertex};
use crate::options::DisplayOptions;
use crate::renderer::depth_stencil_state;

/// Surface material parameters.
/// NOTE: Must match the WGSL struct layout exactly (32 bytes)
///
/// WGSL layout (auto-padded):
///   color: vec3<f32>      (offset 0, align 16)
///   metalness: f32        (offset 12)
///   roughness: f32        (offset 16)
///   Total: 32 bytes
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    /// Surface color, linear RGB.
    pub color: [f32; 3],
    /// Surface metalness.
    pub metalness: f32,
    /// Surface roughness.
    pub roughness: f32,
    pub(crate) _pad: [f32; 3],
}

impl MaterialUniform {
    /// Sample the material from the display options.
    #[must_use]
    pub fn from_display(display: &DisplayOptions) -> Self {
        Self {
            color: display.mesh_color,
            metalness: display.metalness,
            roughness: display.roughness,
            _pad: [0.0; 3],
        }
    }
}

/// The uploaded mesh: vertex buffer plus draw count.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
}

/// Mesh pipeline, material uniform, and current vertex buffer.
pub struct MeshRenderer {
    pipeline: wgpu::RenderPipeline,
    material: UniformBinding,
    mesh: Option<GpuMesh>,
}

impl MeshRenderer {
    /// Create the mesh pipeline against the given camera and lighting
    /// layouts.
    pub fn new(
        context: &RenderContext,
        camera_layout: &wgpu::BindGroupLayout,
        lighting_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let material = UniformBinding::new(
            &context.device,
            "Material",
            &MaterialUniform::from_display(&DisplayOptions::default()),
        );

        let shader = context.device.create_shader_module(
            wgpu::ShaderModuleDescriptor {
                label: Some("Mesh Shader"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!("shaders/mesh.wgsl").into(),
                ),
            },
        );

        let pipeline_layout = context.device.create_pipeline_layout(
            &wgpu::PipelineLayoutDescriptor {
                label: Some("Mesh Pipeline Layout"),
                bind_group_layouts: &[
                    camera_layout,
                    lighting_layout,
                    &material.layout,
                ],
                push_constant_ranges: &[],
            },
        );

        let pipeline = context.device.create_render_pipeline(
            &wgpu::RenderPipelineDescriptor {
                label: Some("Mesh Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[MeshVertex::layout()],
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
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    // Triangle soups from STL exports have unreliable
                    // winding; the shader flips normals instead.
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(depth_stencil_state()),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            },
        );

        Self {
            pipeline,
            material,
            mesh: None,
        }
    }

    /// Overwrite the material uniform from the display options.
    pub fn set_material(
        &self,
        queue: &wgpu::Queue,
        display: &DisplayOptions,
    ) {
        self.material
            .write(queue, &MaterialUniform::from_display(display));
    }

    /// Upload a new mesh, destroying the previous vertex buffer.
    pub fn upload_mesh(&mut self, context: &RenderContext, mesh: &MeshData) {
        self.dispose();

        let vertex_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        self.mesh = Some(GpuMesh {
            vertex_buffer,
            vertex_count: mesh.vertex_count(),
        });
    }

    /// Destroy the current vertex buffer, if any.
    pub fn dispose(&mut self) {
        if let Some(old) = self.mesh.take() {
            old.vertex_buffer.destroy();
        }
    }

    /// Record the mesh draw. No-op until a mesh has been uploaded.
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
        lighting_bind_group: &'a wgpu::BindGroup,
    ) {
        let Some(mesh) = &self.mesh else {
            return;
        };
        if mesh.vertex_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_bind_group(1, lighting_bind_group, &[]);
        render_pass.set_bind_group(2, &self.material.bind_group, &[]);
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        render_pass.draw(0..mesh.vertex_count, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_uniform_is_32_bytes() {
        assert_eq!(size_of::<MaterialUniform>(), 32);
    }

    #[test]
    fn material_samples_display_options() {
        let display = DisplayOptions {
            mesh_color: [0.1, 0.2, 0.3],
            metalness: 0.5,
            roughness: 0.25,
            ..Default::default()
        };
        let m = MaterialUniform::from_display(&display);
        assert_eq!(m.color, [0.1, 0.2, 0.3]);
        assert_eq!(m.metalness, 0.5);
        assert_eq!(m.roughness, 0.25);
    }
}
