//! STL mesh loading and CPU-side mesh data.
//!
//! Parsing is delegated to the `stl_io` crate; this module flattens the
//! indexed result into a flat-shaded triangle soup (one normal per face,
//! repeated for its three vertices) and derives the bounding box in the
//! same pass over the emitted vertices.

/// Background mesh-loading thread.
pub mod loader;

use std::fs::File;
use std::io::{BufReader, Read, Seek};

use glam::Vec3;

use crate::camera::framing::BoundingBox;
use crate::error::ViewerError;

/// A single mesh vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Position in model space.
    pub position: [f32; 3],
    /// Flat-shading normal.
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Vertex buffer layout matching the mesh shader inputs.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// CPU-side mesh: triangle-soup vertices plus their bounding box.
///
/// The bounding box is computed once at load and recomputed only by
/// [`center_to_origin`](Self::center_to_origin).
#[derive(Debug, Clone)]
pub struct MeshData {
    /// Flat-shaded triangle vertices (3 per face).
    pub vertices: Vec<MeshVertex>,
    /// Tight axis-aligned bounds of the vertices.
    pub bounds: BoundingBox,
}

impl MeshData {
    /// Number of vertices to draw.
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Translate all vertices so the bounding-box center lands on the
    /// origin. Returns the translation that was applied.
    pub fn center_to_origin(&mut self) -> Vec3 {
        let translation = self.bounds.centering_translation();
        for v in &mut self.vertices {
            v.position = (Vec3::from_array(v.position) + translation)
                .to_array();
        }
        self.bounds.min += translation;
        self.bounds.max += translation;
        translation
    }
}

/// Load an STL file (binary or ASCII) from disk.
///
/// # Errors
///
/// Returns [`ViewerError::MeshLoad`] when the file cannot be opened or
/// parsed.
pub fn load_stl(path: &str) -> Result<MeshData, ViewerError> {
    let file = File::open(path).map_err(|e| {
        ViewerError::MeshLoad(format!("failed to open {path}: {e}"))
    })?;
    let mut reader = BufReader::new(file);
    read_stl(&mut reader)
        .map_err(|e| match e {
            ViewerError::MeshLoad(msg) => {
                ViewerError::MeshLoad(format!("{path}: {msg}"))
            }
            other => other,
        })
}

/// Parse STL data from any seekable reader.
///
/// # Errors
///
/// Returns [`ViewerError::MeshLoad`] when the data is not valid STL or
/// references out-of-range vertices.
pub fn read_stl<R: Read + Seek>(
    reader: &mut R,
) -> Result<MeshData, ViewerError> {
    let indexed = stl_io::read_stl(reader)
        .map_err(|e| ViewerError::MeshLoad(e.to_string()))?;
    indexed
        .validate()
        .map_err(|e| ViewerError::MeshLoad(e.to_string()))?;

    let mut vertices = Vec::with_capacity(indexed.faces.len() * 3);
    for face in &indexed.faces {
        let corners = [
            vertex_position(&indexed.vertices[face.vertices[0]]),
            vertex_position(&indexed.vertices[face.vertices[1]]),
            vertex_position(&indexed.vertices[face.vertices[2]]),
        ];
        let normal = face_normal(&face.normal, &corners);
        for corner in corners {
            vertices.push(MeshVertex {
                position: corner.to_array(),
                normal: normal.to_array(),
            });
        }
    }

    let bounds = BoundingBox::from_points(
        vertices.iter().map(|v| Vec3::from_array(v.position)),
    )
    .unwrap_or(BoundingBox {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    });

    log::debug!(
        "parsed STL: {} triangles, bounds {:?}..{:?}",
        indexed.faces.len(),
        bounds.min,
        bounds.max
    );

    Ok(MeshData { vertices, bounds })
}

fn vertex_position(v: &stl_io::Vertex) -> Vec3 {
    Vec3::new(v[0], v[1], v[2])
}

/// Use the stored face normal when it is usable, otherwise derive it
/// from the winding order. Exported normals are frequently zeroed.
fn face_normal(stored: &stl_io::Normal, corners: &[Vec3; 3]) -> Vec3 {
    let stored = Vec3::new(stored[0], stored[1], stored[2]);
    if stored.is_finite() && stored.length_squared() > 0.0 {
        return stored.normalize();
    }
    (corners[1] - corners[0])
        .cross(corners[2] - corners[0])
        .normalize_or(Vec3::Z)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use approx::assert_relative_eq;

    use super::*;

    /// One-triangle binary STL: header, count, then
    /// normal + 3 vertices + attribute bytes.
    fn single_triangle_stl() -> Vec<u8> {
        let mut data = vec![0_u8; 80];
        data.extend_from_slice(&1_u32.to_le_bytes());
        let floats: [f32; 12] = [
            0.0, 0.0, 1.0, // normal
            0.0, 0.0, 0.0, // v0
            2.0, 0.0, 0.0, // v1
            0.0, 4.0, 0.0, // v2
        ];
        for f in floats {
            data.extend_from_slice(&f.to_le_bytes());
        }
        data.extend_from_slice(&0_u16.to_le_bytes());
        data
    }

    #[test]
    fn reads_single_triangle() {
        let bytes = single_triangle_stl();
        let mesh = read_stl(&mut Cursor::new(bytes)).unwrap();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.bounds.min, Vec3::ZERO);
        assert_eq!(mesh.bounds.max, Vec3::new(2.0, 4.0, 0.0));
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn zero_stored_normal_falls_back_to_winding() {
        let corners = [
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let n = face_normal(&stl_io::Normal::new([0.0; 3]), &corners);
        assert_relative_eq!(n.z, 1.0);
    }

    #[test]
    fn truncated_data_is_a_load_error() {
        let mut bytes = single_triangle_stl();
        bytes.truncate(100);
        let err = read_stl(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, ViewerError::MeshLoad(_)));
    }

    #[test]
    fn centering_moves_bounds_onto_origin() {
        let bytes = single_triangle_stl();
        let mut mesh = read_stl(&mut Cursor::new(bytes)).unwrap();
        let translation = mesh.center_to_origin();

        assert_eq!(translation, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(mesh.bounds.center(), Vec3::ZERO);
        assert_eq!(mesh.vertices[0].position, [-1.0, -2.0, 0.0]);
    }
}
