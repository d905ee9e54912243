use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Surface material and background parameters.
///
/// `mesh_color` is the presentation-layer bridge: the session samples it
/// once per load application, so changing it affects the next load, not
/// the mesh currently on screen.
pub struct DisplayOptions {
    /// Mesh surface color, linear RGB.
    pub mesh_color: [f32; 3],
    /// Surface metalness (0 = dielectric, 1 = metal).
    pub metalness: f32,
    /// Surface roughness (0 = mirror-like, 1 = matte).
    pub roughness: f32,
    /// Clear color, linear RGBA.
    pub background: [f32; 4],
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            mesh_color: [0.4, 0.6, 1.0],
            metalness: 0.1,
            roughness: 0.8,
            background: [0.0, 0.0, 0.0, 0.0],
        }
    }
}
