use coordinate_core::{
    compute_model, compute_projection, compute_spin, compute_view, TransformPipeline,
    TransformUniforms, Viewport, INDICES, VERTICES,
};
use nalgebra_glm as glm;
use pretty_assertions::assert_eq;

fn to_ndc(clip: glm::Vec4) -> glm::Vec3 {
    glm::vec3(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w)
}

#[test]
fn every_quad_corner_lands_inside_the_frustum() {
    let pipeline = TransformPipeline::new();
    let viewport = Viewport::new(800, 600);

    for t in [0.0, 1.0, 2.5, 6.0] {
        let frame = pipeline.frame(t, viewport);
        for vertex in VERTICES {
            let [x, y, z] = vertex.position;
            let spun = frame.spin * glm::vec4(x, y, z, 1.0);
            let clip = frame.clip_position(&glm::vec3(spun.x, spun.y, spun.z));
            let ndc = to_ndc(clip);

            assert!(clip.w > 0.0, "corner behind the viewer at t={t}");
            assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0 && ndc.z.abs() <= 1.0);
        }
    }
}

#[test]
fn wider_viewport_squeezes_x_only() {
    let pipeline = TransformPipeline::new();
    let square = pipeline.frame(0.0, Viewport::new(600, 600));
    let wide = pipeline.frame(0.0, Viewport::new(1200, 600));

    let point = glm::vec3(0.5, 0.5, 0.0);
    let a = to_ndc(square.clip_position(&point));
    let b = to_ndc(wide.clip_position(&point));

    assert!((b.x - a.x / 2.0).abs() < 1e-6);
    assert!((b.y - a.y).abs() < 1e-6);
    assert!((b.z - a.z).abs() < 1e-6);
}

#[test]
fn frame_matches_the_free_functions() {
    let frame = TransformPipeline::new().frame(4.0, Viewport::new(800, 600));

    assert_eq!(frame.model, compute_model());
    assert_eq!(frame.view, compute_view());
    assert_eq!(frame.projection, compute_projection(800.0 / 600.0));
    assert_eq!(frame.spin, compute_spin(4.0));
}

#[test]
fn minimized_window_still_produces_usable_uniforms() {
    let frame = TransformPipeline::new().frame(1.0, Viewport::new(0, 0));
    let uniforms = TransformUniforms::new(&frame, 1.0);
    let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&uniforms));

    assert!(floats.iter().all(|v| v.is_finite()));
}

#[test]
fn quad_is_two_triangles() {
    assert_eq!(INDICES.len(), 6);
    assert_eq!(VERTICES.len(), 4);
}
