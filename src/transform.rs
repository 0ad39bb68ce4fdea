//! # Transform Pipeline
//!
//! This module computes the matrices that carry the quad's vertices through the coordinate
//! spaces of the rendering pipeline:
//!
//! ```text
//! local --model--> world --view--> view --projection--> clip --(divide by w)--> NDC --viewport--> screen
//! ```
//!
//! ## Overview
//!
//! - **Model matrix**: tilts the quad by -55° about the X axis so it looks like it is lying on
//!   the floor. It never changes.
//! - **View matrix**: moves the whole scene 3 units along -Z. Moving the camera backwards is
//!   the same as moving the scene forwards. It never changes.
//! - **Projection matrix**: a perspective frustum with a 45° vertical field of view and near and
//!   far planes at `0.1` and `100.0`. Only the aspect ratio changes, and it is recomputed every
//!   frame from the current [`Viewport`].
//! - **Spin matrix**: a rotation about Z by `time * 50°`. It is uploaded as its own uniform and
//!   is never folded into the other three on the CPU.
//!
//! The matrices are combined per vertex in the shader, read from right to left:
//!
//! ```text
//! clip = projection * view * model * local
//! ```
//!
//! ## Conventions
//!
//! Every matrix follows the OpenGL conventions used by GLM: right-handed coordinates, column-major
//! storage, and clip-space depth in `[-w, w]`. The vertex shader maps depth into the `[0, w]`
//! range `wgpu` expects after the product above has been formed, so nothing in this module
//! depends on the graphics backend.
//!
//! ## Example
//!
//! ```rust
//! use coordinate_core::{TransformPipeline, Viewport};
//!
//! let pipeline = TransformPipeline::new();
//! let frame = pipeline.frame(1.5, Viewport::new(800, 600));
//!
//! let clip = frame.clip_position(&nalgebra_glm::vec3(0.5, 0.5, 0.0));
//! assert!(clip.w > 0.0);
//! ```

use nalgebra_glm as glm;

/// Width and height of the drawable surface, in physical pixels.
///
/// The viewport is only ever changed by a resize notification from the window. It is read by the
/// projection step to compute the aspect ratio.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `width / height`.
    ///
    /// Both dimensions are clamped to at least one pixel before dividing. A minimized window
    /// reports a height of zero for a few frames, and dividing by it would fill the projection
    /// matrix with infinities.
    pub fn aspect_ratio(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    /// Returns `true` when either dimension is zero, e.g. while the window is minimized.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The matrices for a single frame.
///
/// A plain value: it is built from scratch every frame, uploaded, and dropped.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTransforms {
    /// Local space to world space.
    pub model: glm::Mat4,

    /// World space to view space.
    pub view: glm::Mat4,

    /// View space to clip space.
    pub projection: glm::Mat4,

    /// Rotation about Z driven by the frame time, applied to local positions in the shader.
    pub spin: glm::Mat4,
}

impl FrameTransforms {
    /// Transforms a local-space position to clip space with `projection * view * model`.
    ///
    /// This mirrors what the vertex shader does, minus the spin channel. It exists for the
    /// inspector overlay and for tests; the renderer never calls it.
    pub fn clip_position(&self, local: &glm::Vec3) -> glm::Vec4 {
        self.projection * self.view * self.model * glm::vec4(local.x, local.y, local.z, 1.0)
    }

    /// Returns a copy of these transforms with the spin replaced by the identity.
    pub fn without_spin(mut self) -> Self {
        self.spin = glm::Mat4::identity();
        self
    }
}

/// Produces the model, view, projection and spin matrices for each frame.
///
/// Model and view depend on nothing, so they are computed once in [`TransformPipeline::new`]
/// and copied out every frame. Projection and spin are recomputed from the frame inputs.
#[derive(Debug, Copy, Clone)]
pub struct TransformPipeline {
    model: glm::Mat4,
    view: glm::Mat4,
}

impl TransformPipeline {
    /// Tilt applied by the model matrix, in degrees about +X.
    pub const MODEL_TILT_DEGREES: f32 = -55.0;

    /// Offset applied by the view matrix.
    pub const VIEW_TRANSLATION: [f32; 3] = [0.0, 0.0, -3.0];

    /// Vertical field of view of the projection, in degrees.
    pub const FIELD_OF_VIEW_DEGREES: f32 = 45.0;

    /// Distance to the near clipping plane.
    pub const Z_NEAR: f32 = 0.1;

    /// Distance to the far clipping plane.
    pub const Z_FAR: f32 = 100.0;

    /// Angular speed of the spin transform.
    pub const SPIN_DEGREES_PER_SECOND: f32 = 50.0;

    /// Used in place of an aspect ratio that is not finite or not greater than `f32::EPSILON`.
    pub const FALLBACK_ASPECT_RATIO: f32 = 1.0;

    pub fn new() -> Self {
        Self {
            model: compute_model(),
            view: compute_view(),
        }
    }

    pub fn model(&self) -> glm::Mat4 {
        self.model
    }

    pub fn view(&self) -> glm::Mat4 {
        self.view
    }

    /// Builds the transforms for one frame.
    ///
    /// # Parameters
    ///
    /// - `time_seconds`: seconds elapsed since the application clock started.
    /// - `viewport`: the current size of the drawable surface.
    pub fn frame(&self, time_seconds: f32, viewport: Viewport) -> FrameTransforms {
        FrameTransforms {
            model: self.model,
            view: self.view,
            projection: compute_projection(viewport.aspect_ratio()),
            spin: compute_spin(time_seconds),
        }
    }
}

impl Default for TransformPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the identity matrix rotated by -55° about the X axis.
pub fn compute_model() -> glm::Mat4 {
    glm::rotate(
        &glm::Mat4::identity(),
        TransformPipeline::MODEL_TILT_DEGREES.to_radians(),
        &glm::Vec3::x(),
    )
}

/// Returns the identity matrix translated by `(0, 0, -3)`.
///
/// The scene is moved in the opposite direction of where the camera should go.
pub fn compute_view() -> glm::Mat4 {
    let [x, y, z] = TransformPipeline::VIEW_TRANSLATION;
    glm::translate(&glm::Mat4::identity(), &glm::vec3(x, y, z))
}

/// Returns a right-handed perspective projection with depth mapped to `[-1, 1]`.
///
/// An aspect ratio that is not finite, or not greater than `f32::EPSILON`, would produce a
/// degenerate matrix. It is replaced by [`TransformPipeline::FALLBACK_ASPECT_RATIO`].
pub fn compute_projection(aspect_ratio: f32) -> glm::Mat4 {
    // `glm::perspective` asserts the aspect ratio is not within `f32::EPSILON` of zero.
    let aspect_ratio = if aspect_ratio.is_finite() && aspect_ratio > f32::EPSILON {
        aspect_ratio
    } else {
        log::warn!(
            "Degenerate aspect ratio {aspect_ratio}, using {}",
            TransformPipeline::FALLBACK_ASPECT_RATIO
        );
        TransformPipeline::FALLBACK_ASPECT_RATIO
    };

    glm::perspective(
        aspect_ratio,
        TransformPipeline::FIELD_OF_VIEW_DEGREES.to_radians(),
        TransformPipeline::Z_NEAR,
        TransformPipeline::Z_FAR,
    )
}

/// Returns the identity matrix rotated about Z by `time_seconds * 50°`.
///
/// The angle grows without bound; `sin`/`cos` wrap it, so no explicit modulo is taken.
pub fn compute_spin(time_seconds: f32) -> glm::Mat4 {
    glm::rotate(
        &glm::Mat4::identity(),
        (time_seconds * TransformPipeline::SPIN_DEGREES_PER_SECOND).to_radians(),
        &glm::Vec3::z(),
    )
}

/// The spin angle at `time_seconds`, in degrees, wrapped to `[0, 360)`. Display only.
pub fn spin_angle_degrees(time_seconds: f32) -> f32 {
    (time_seconds * TransformPipeline::SPIN_DEGREES_PER_SECOND).rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn approx_eq(a: &glm::Mat4, b: &glm::Mat4, eps: f32) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < eps)
    }

    fn ndc_z(projection: &glm::Mat4, z: f32) -> f32 {
        let clip = projection * glm::vec4(0.0, 0.0, z, 1.0);
        clip.z / clip.w
    }

    #[test]
    fn spin_repeats_every_seven_point_two_seconds() {
        let period = 360.0 / TransformPipeline::SPIN_DEGREES_PER_SECOND;
        for t in [0.0_f32, 0.25, 1.0, 3.3, 12.0, 100.0] {
            assert!(
                approx_eq(&compute_spin(t), &compute_spin(t + period), 1e-4),
                "spin at {t}s does not match spin at {}s",
                t + period
            );
        }
    }

    #[test]
    fn spin_at_zero_is_identity() {
        assert!(approx_eq(&compute_spin(0.0), &glm::Mat4::identity(), 1e-6));
    }

    #[test]
    fn spin_quarter_turn_maps_x_to_y() {
        // 90° takes 1.8 seconds at 50°/s.
        let rotated = compute_spin(1.8) * glm::vec4(1.0, 0.0, 0.0, 1.0);
        assert!(rotated.x.abs() < 1e-5);
        assert!((rotated.y - 1.0).abs() < 1e-5);
        assert!(rotated.z.abs() < 1e-6);
    }

    #[test]
    fn model_and_view_do_not_depend_on_time() {
        let pipeline = TransformPipeline::new();
        let viewport = Viewport::new(800, 600);
        let early = pipeline.frame(0.0, viewport);
        let late = pipeline.frame(4321.5, viewport);

        assert_eq!(early.model, late.model);
        assert_eq!(early.view, late.view);
        assert_eq!(compute_model(), pipeline.model());
        assert_eq!(compute_view(), pipeline.view());
    }

    #[test]
    fn model_tilts_y_axis_toward_negative_z() {
        let up = compute_model() * glm::vec4(0.0, 1.0, 0.0, 0.0);
        let angle = 55_f32.to_radians();
        assert!((up.y - angle.cos()).abs() < 1e-6);
        assert!((up.z + angle.sin()).abs() < 1e-6);
    }

    #[test]
    fn view_moves_origin_three_units_back() {
        let origin = compute_view() * glm::vec4(0.0, 0.0, 0.0, 1.0);
        assert_eq!(origin, glm::vec4(0.0, 0.0, -3.0, 1.0));
    }

    #[test]
    fn near_and_far_planes_map_to_ndc_bounds() {
        let projection = compute_projection(Viewport::new(800, 600).aspect_ratio());
        assert!((ndc_z(&projection, -0.1) + 1.0).abs() < 1e-4);
        assert!((ndc_z(&projection, -100.0) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn projection_scale_matches_field_of_view() {
        let aspect = 800.0 / 600.0;
        let projection = compute_projection(aspect);
        let focal = 1.0 / 22.5_f32.to_radians().tan();

        assert!((projection[(1, 1)] - focal).abs() < 1e-5);
        assert!((projection[(0, 0)] - focal / aspect).abs() < 1e-5);
        assert_eq!(projection[(3, 2)], -1.0);
    }

    #[test]
    fn zero_height_viewport_yields_finite_projection() {
        let viewport = Viewport::new(800, 0);
        assert!(viewport.is_empty());
        assert_eq!(viewport.aspect_ratio(), 800.0);

        let frame = TransformPipeline::new().frame(1.0, viewport);
        assert!(frame.projection.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn degenerate_aspect_ratios_fall_back() {
        let fallback = compute_projection(TransformPipeline::FALLBACK_ASPECT_RATIO);
        for aspect in [0.0, -1.5, f32::NAN, f32::INFINITY, f32::MIN_POSITIVE, 1e-9, f32::EPSILON] {
            let projection = compute_projection(aspect);
            assert!(projection.iter().all(|v| v.is_finite()));
            assert_eq!(projection, fallback);
        }
    }

    #[test]
    fn extremely_tall_viewport_yields_finite_projection() {
        let viewport = Viewport::new(1, 10_000_000);
        assert!(viewport.aspect_ratio() < f32::EPSILON);

        let frame = TransformPipeline::new().frame(0.0, viewport);
        assert!(frame.projection.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn viewport_is_empty_when_either_dimension_is_zero() {
        assert!(Viewport::new(0, 0).is_empty());
        assert!(Viewport::new(0, 600).is_empty());
        assert!(Viewport::new(800, 0).is_empty());
        assert!(!Viewport::new(1, 1).is_empty());
    }

    #[test]
    fn composition_order_matters() {
        let frame = TransformPipeline::new().frame(0.0, Viewport::new(800, 600));
        let v = glm::vec4(0.5, 0.5, 0.0, 1.0);

        let expected = frame.projection * frame.view * frame.model * v;
        let reversed = frame.model * frame.view * frame.projection * v;

        assert_eq!(frame.clip_position(&glm::vec3(0.5, 0.5, 0.0)), expected);
        assert!((expected - reversed).norm() > 1e-3);
    }

    #[test]
    fn without_spin_keeps_other_channels() {
        let frame = TransformPipeline::new().frame(2.0, Viewport::new(1024, 768));
        let still = frame.without_spin();

        assert_eq!(still.spin, glm::Mat4::identity());
        assert_eq!(still.model, frame.model);
        assert_eq!(still.view, frame.view);
        assert_eq!(still.projection, frame.projection);
    }

    #[test]
    fn spin_angle_wraps_for_display() {
        assert_eq!(spin_angle_degrees(0.0), 0.0);
        assert!((spin_angle_degrees(7.2 + 1.0) - 50.0).abs() < 1e-3);
    }
}
