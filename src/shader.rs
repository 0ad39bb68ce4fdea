//! # Shader Program
//!
//! A thin wrapper around the WGSL source in [`crate::SHADER_SOURCE`] and the render pipeline
//! built from it.
//!
//! ## Responsibilities
//!
//! - Compile the shader module.
//! - Create the transform uniform binding once, so uploading the per-frame matrices never
//!   involves looking anything up by name.
//! - Build the render pipeline with the vertex layout, the two bind group layouts (transforms at
//!   group 0, texture at group 1) and a depth test.
//! - Expose [`ShaderProgram::use_program`], which has to be called on a render pass before the
//!   draw call, and [`ShaderProgram::set_transforms`], which uploads the frame's uniforms.
//!
//! ## Example Usage
//! ```rust,ignore
//! let program = ShaderProgram::new(&device, surface_format, &texture_layout);
//!
//! program.set_transforms(&queue, TransformUniforms::new(&frame, time));
//!
//! program.use_program(&mut render_pass);
//! render_pass.draw_indexed(0..6, 0, 0..1);
//! ```

use crate::renderer::Renderer;
use crate::uniform_binding::UniformBinding;
use crate::uniform_buffer::TransformUniforms;
use crate::vertex::Vertex;
use crate::SHADER_SOURCE;

pub struct ShaderProgram {
    /// Transform uniforms at group 0.
    uniform: UniformBinding,

    pipeline: wgpu::RenderPipeline,
}

impl ShaderProgram {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        texture_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let uniform = UniformBinding::new(device);
        let pipeline = Self::create_pipeline(device, surface_format, &uniform, texture_layout);

        Self { uniform, pipeline }
    }

    /// Binds the pipeline and the transform uniforms to `renderpass`.
    pub fn use_program<'rpass>(&'rpass self, renderpass: &mut wgpu::RenderPass<'rpass>) {
        renderpass.set_pipeline(&self.pipeline);
        renderpass.set_bind_group(0, &self.uniform.bind_group, &[]);
    }

    /// Uploads the uniforms for the next frame.
    pub fn set_transforms(&mut self, queue: &wgpu::Queue, uniforms: TransformUniforms) {
        self.uniform.update_buffer(queue, 0, uniforms);
    }

    fn create_pipeline(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        uniform: &UniformBinding,
        texture_layout: &wgpu::BindGroupLayout,
    ) -> wgpu::RenderPipeline {
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Coordinate Systems Shader"),
            source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(SHADER_SOURCE)),
        });

        // Group 0 holds the transforms, group 1 the container texture and its sampler.
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Coordinate Systems Pipeline Layout"),
            bind_group_layouts: &[&uniform.bind_group_layout, texture_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Coordinate Systems Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: Some("vertex_main"),
                buffers: &[Vertex::description(&Vertex::vertex_attributes())],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None, // the quad's back faces become visible as it tilts and spins
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
                unclipped_depth: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Renderer::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: Some("fragment_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        })
    }
}
