//! # Scene
//!
//! The `scene` module owns everything needed to draw the textured quad: the vertex and index
//! buffers, the container texture and the shader program.
//!
//! ## Overview
//!
//! The scene itself does no math. Each frame it receives a [`TransformUniforms`] built from the
//! [`crate::transform::TransformPipeline`] output, hands it to the shader program, and records
//! one indexed draw call.
//!
//! ## Example Usage
//! ```rust,ignore
//! // 1. Create the scene once the device exists.
//! let mut scene = Scene::new(&device, &queue, surface_format);
//!
//! // 2. Upload this frame's transforms.
//! scene.update(&queue, TransformUniforms::new(&frame, time));
//!
//! // 3. Draw inside a render pass.
//! scene.render(&mut render_pass);
//! ```
//!
//! ## Fields
//! - **`vertex_buffer`**: the four corners of the quad.
//! - **`index_buffer`**: two triangles referencing those corners.
//! - **`texture`**: the decoded container image, or the fallback checker.
//! - **`program`**: the compiled shader, render pipeline and transform uniforms.

// The shader façade: compiles the WGSL source and owns the uniform binding.
use crate::shader::ShaderProgram;

// The decoded container image and its bind group.
use crate::texture::Texture;

use crate::uniform_buffer::TransformUniforms;

// The quad data; `INDICES` also sets the draw call's index count.
use crate::vertex::{INDICES, VERTICES};

use crate::TEXTURE_PATH;

/// The textured quad and the GPU state needed to draw it.
pub struct Scene {
    pub vertex_buffer: wgpu::Buffer,

    pub index_buffer: wgpu::Buffer,

    pub texture: Texture,

    pub program: ShaderProgram,
}

impl Scene {
    /// Uploads the quad, loads the texture from [`TEXTURE_PATH`] and builds the shader program.
    ///
    /// A texture that cannot be decoded is logged and replaced by the fallback checker; it never
    /// makes scene creation fail.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Quad Vertex Buffer"),
                contents: bytemuck::cast_slice(&VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Quad Index Buffer"),
                contents: bytemuck::cast_slice(&INDICES),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        let texture_layout = Texture::bind_group_layout(device);
        let texture = Texture::load_or_fallback(device, queue, &texture_layout, TEXTURE_PATH);

        let program = ShaderProgram::new(device, surface_format, &texture_layout);

        Self {
            vertex_buffer,
            index_buffer,
            texture,
            program,
        }
    }

    pub fn render<'rpass>(&'rpass self, renderpass: &mut wgpu::RenderPass<'rpass>) {
        self.program.use_program(renderpass);
        renderpass.set_bind_group(1, &self.texture.bind_group, &[]);

        renderpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        renderpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        renderpass.draw_indexed(0..(INDICES.len() as _), 0, 0..1);
    }

    /// Uploads this frame's transforms and time.
    pub fn update(&mut self, queue: &wgpu::Queue, uniforms: TransformUniforms) {
        self.program.set_transforms(queue, uniforms);
    }
}
