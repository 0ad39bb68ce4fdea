//! # Vertex Module
//!
//! This module provides the `Vertex` struct used for the textured quad, and the static vertex
//! and index data for that quad.
//!
//! Each vertex carries three attributes which are interleaved in a single vertex buffer:
//!
//! | Location | Attribute    | Format      | Offset |
//! |----------|--------------|-------------|--------|
//! | 0        | `position`   | `Float32x3` | 0      |
//! | 1        | `color`      | `Float32x3` | 12     |
//! | 2        | `tex_coords` | `Float32x2` | 24     |
//!
//! The positions are local-space coordinates between `-0.5` and `0.5` with the origin at the
//! center of the quad. They are carried into world, view and clip space by the matrices in
//! [`crate::transform`].
//!
//! # Crate Dependencies
//!
//! - `wgpu` for the GPU attributes and layouts.
//! - `bytemuck` for casting the vertex array into a buffer.

/// A single vertex of the quad.
///
/// # Fields
///
/// - `position`: local-space position `[x, y, z]`.
/// - `color`: RGB color, each channel in `[0.0, 1.0]`.
/// - `tex_coords`: texture coordinates `[u, v]`, with `v` pointing up as in OpenGL.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Generates the vertex attributes layout for the `Vertex` struct.
    ///
    /// The shader locations match the `VertexInput` struct of the WGSL source.
    pub fn vertex_attributes() -> Vec<wgpu::VertexAttribute> {
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2].to_vec()
    }

    /// Returns the vertex buffer layout for the `Vertex` struct.
    ///
    /// The stride is the size of one `Vertex`, and the buffer advances once per vertex.
    pub fn description(attributes: &[wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        }
    }
}

/// The four corners of the quad.
pub const VERTICES: [Vertex; 4] = [
    // top right
    Vertex {
        position: [0.5, 0.5, 0.0],
        color: [1.0, 0.0, 0.0],
        tex_coords: [1.0, 1.0],
    },
    // bottom right
    Vertex {
        position: [0.5, -0.5, 0.0],
        color: [0.0, 1.0, 0.0],
        tex_coords: [1.0, 0.0],
    },
    // bottom left
    Vertex {
        position: [-0.5, -0.5, 0.0],
        color: [0.0, 0.0, 1.0],
        tex_coords: [0.0, 0.0],
    },
    // top left
    Vertex {
        position: [-0.5, 0.5, 0.0],
        color: [1.0, 1.0, 0.0],
        tex_coords: [0.0, 1.0],
    },
];

/// Two triangles sharing the bottom-right/top-left diagonal.
pub const INDICES: [u32; 6] = [
    0, 1, 3, // first triangle
    1, 2, 3, // second triangle
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn layout_matches_struct() {
        let attributes = Vertex::vertex_attributes();
        let layout = Vertex::description(&attributes);

        assert_eq!(layout.array_stride, 32);
        let offsets: Vec<_> = attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
        let locations: Vec<_> = attributes.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, vec![0, 1, 2]);
    }

    #[test]
    fn indices_reference_existing_vertices() {
        assert!(INDICES.iter().all(|&i| (i as usize) < VERTICES.len()));
    }

    #[test]
    fn quad_is_centered_on_origin() {
        let sum = VERTICES.iter().fold([0.0_f32; 3], |mut acc, v| {
            for (a, p) in acc.iter_mut().zip(v.position) {
                *a += p;
            }
            acc
        });
        assert_eq!(sum, [0.0, 0.0, 0.0]);
    }
}
