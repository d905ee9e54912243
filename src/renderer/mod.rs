//! Forward renderers for the loaded mesh and the axis gizmo.

/// Axis gizmo line renderer.
pub mod gizmo;
/// Loaded-mesh forward renderer.
pub mod mesh;

use crate::gpu::depth::DEPTH_FORMAT;

/// Standard depth-stencil state used by both pipelines.
pub(crate) fn depth_stencil_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}
