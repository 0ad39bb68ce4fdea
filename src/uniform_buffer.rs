//! # Uniform Buffer
//!
//! This module defines the `TransformUniforms` struct, the CPU-side image of the uniform block
//! declared in the WGSL source:
//!
//! ```wgsl
//! struct Transforms {
//!     model: mat4x4<f32>,
//!     view: mat4x4<f32>,
//!     projection: mat4x4<f32>,
//!     transform: mat4x4<f32>,
//!     time: f32,
//! };
//! ```
//!
//! ## Design
//!
//! The model, view and projection matrices are uploaded as three separate fields. They are never
//! multiplied together on the CPU; the vertex shader forms `projection * view * model` for every
//! vertex. The spin matrix travels in its own `transform` field, and `time` carries the elapsed
//! seconds for the fragment stage.
//!
//! ### Memory Layout and Traits
//!
//! - `#[repr(C)]` keeps the field order and offsets predictable.
//! - WGSL rounds the size of a uniform struct up to its 16-byte alignment, so `time` is followed
//!   by 12 bytes of explicit padding. The struct is 272 bytes on both sides.
//! - `bytemuck::Pod` and `bytemuck::Zeroable` allow casting the struct to bytes for
//!   `wgpu::Queue::write_buffer`.

use nalgebra_glm as glm;

use crate::transform::FrameTransforms;

/// Uniform data shared by the vertex and fragment stages.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniforms {
    /// Local space to world space.
    pub model: glm::Mat4,

    /// World space to view space.
    pub view: glm::Mat4,

    /// View space to clip space.
    pub projection: glm::Mat4,

    /// The spin transform, applied to local positions before `model`.
    pub transform: glm::Mat4,

    /// Seconds since the application clock started.
    pub time: f32,

    _padding: [f32; 3],
}

impl TransformUniforms {
    pub fn new(frame: &FrameTransforms, time: f32) -> Self {
        Self {
            model: frame.model,
            view: frame.view,
            projection: frame.projection,
            transform: frame.spin,
            time,
            _padding: [0.0; 3],
        }
    }
}

impl Default for TransformUniforms {
    fn default() -> Self {
        Self {
            model: glm::Mat4::identity(),
            view: glm::Mat4::identity(),
            projection: glm::Mat4::identity(),
            transform: glm::Mat4::identity(),
            time: 0.0,
            _padding: [0.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{TransformPipeline, Viewport};
    use pretty_assertions::assert_eq;

    #[test]
    fn size_matches_wgsl_struct() {
        assert_eq!(std::mem::size_of::<TransformUniforms>(), 272);
        assert_eq!(std::mem::size_of::<TransformUniforms>() % 16, 0);
    }

    #[test]
    fn matrices_are_uploaded_column_major() {
        let frame = TransformPipeline::new().frame(0.0, Viewport::new(800, 600));
        let uniforms = TransformUniforms::new(&frame, 0.0);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&uniforms));

        // The view translation sits in the fourth column, i.e. floats 12..15 of the view block.
        assert_eq!(&floats[16 + 12..16 + 15], &[0.0, 0.0, -3.0]);
        assert_eq!(floats[64], 0.0);
    }

    #[test]
    fn channels_are_kept_separate() {
        let frame = TransformPipeline::new().frame(3.0, Viewport::new(640, 480));
        let uniforms = TransformUniforms::new(&frame, 3.0);

        assert_eq!(uniforms.model, frame.model);
        assert_eq!(uniforms.view, frame.view);
        assert_eq!(uniforms.projection, frame.projection);
        assert_eq!(uniforms.transform, frame.spin);
        assert_eq!(uniforms.time, 3.0);
    }
}
