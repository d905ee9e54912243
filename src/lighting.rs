//! Scene lighting: a hemisphere fill plus one directional key light.

use crate::gpu::render_context::RenderContext;
use crate::gpu::uniform::UniformBinding;

/// Lighting configuration shared by the mesh shader.
/// NOTE: Must match the WGSL struct layout exactly (48 bytes)
///
/// WGSL layout (auto-padded):
///   sky_color: vec3<f32>       (offset 0,  align 16)
///   hemi_intensity: f32        (offset 12)
///   ground_color: vec3<f32>    (offset 16, align 16)
///   light_intensity: f32       (offset 28)
///   light_dir: vec3<f32>       (offset 32, align 16)
///   ambient: f32               (offset 44)
///   Total: 48 bytes
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// Hemisphere color from above.
    pub sky_color: [f32; 3],
    /// Hemisphere light intensity.
    pub hemi_intensity: f32,
    /// Hemisphere color from below.
    pub ground_color: [f32; 3],
    /// Directional light intensity.
    pub light_intensity: f32,
    /// Direction toward the directional light (normalized).
    pub light_dir: [f32; 3],
    /// Flat ambient floor.
    pub ambient: f32,
}

impl Default for LightingUniform {
    fn default() -> Self {
        Self {
            sky_color: [1.0, 1.0, 1.0],
            hemi_intensity: 1.2,
            ground_color: [0.267, 0.267, 0.267],
            light_intensity: 0.8,
            // Key light from the upper front-right corner
            light_dir: normalize([1.0, 1.0, 1.0]),
            ambient: 0.05,
        }
    }
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    [v[0] / len, v[1] / len, v[2] / len]
}

/// GPU lighting uniform and bind group.
pub struct Lighting {
    /// CPU copy of the lighting parameters.
    pub uniform: LightingUniform,
    /// Buffer, layout, and bind group for the uniform.
    pub binding: UniformBinding,
}

impl Lighting {
    /// Create the lighting uniform with default parameters.
    pub fn new(context: &RenderContext) -> Self {
        let uniform = LightingUniform::default();
        let binding =
            UniformBinding::new(&context.device, "Lighting", &uniform);
        Self { uniform, binding }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_48_bytes() {
        assert_eq!(size_of::<LightingUniform>(), 48);
    }

    #[test]
    fn default_light_dir_is_normalized() {
        let u = LightingUniform::default();
        let [x, y, z] = u.light_dir;
        let len = (x * x + y * y + z * z).sqrt();
        assert!((len - 1.0).abs() < 1e-6);
    }
}
