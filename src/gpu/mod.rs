//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, the depth render
//! target, and uniform-binding boilerplate shared by the renderers.

/// Depth render target for the forward pass.
pub mod depth;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Uniform buffer + bind group boilerplate.
pub mod uniform;
