//! # Uniform Binding
//!
//! The `UniformBinding` struct owns the GPU buffer that holds [`TransformUniforms`] together with
//! the bind group layout and bind group that expose it to the shader at group 0, binding 0.
//!
//! The binding is created once, when the shader program is built. Every frame afterwards only
//! writes new bytes into the existing buffer, so no per-frame lookups or allocations happen.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut uniform = UniformBinding::new(&device);
//! uniform.update_buffer(&queue, 0, TransformUniforms::new(&frame, time));
//! render_pass.set_bind_group(0, &uniform.bind_group, &[]);
//! ```

use crate::uniform_buffer::TransformUniforms;

/// GPU resources backing the transform uniforms.
pub struct UniformBinding {
    /// The uniform buffer, sized for exactly one `TransformUniforms`.
    pub buffer: wgpu::Buffer,

    /// The bind group that attaches `buffer` to binding 0.
    pub bind_group: wgpu::BindGroup,

    /// Layout of `bind_group`, referenced by the pipeline layout.
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl UniformBinding {
    pub fn new(device: &wgpu::Device) -> Self {
        // Initialized with identity matrices so a frame drawn before the first update is still
        // well defined.
        let buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Transform Uniform Buffer"),
                contents: bytemuck::cast_slice(&[TransformUniforms::default()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        // The matrices are read by the vertex stage, `time` by the fragment stage.
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<TransformUniforms>() as u64,
                    ),
                },
                count: None,
            }],
            label: Some("transform_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("transform_bind_group"),
        });

        Self {
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Writes `uniforms` into the buffer at `offset`.
    ///
    /// The write is queued and becomes visible to the next submitted command buffer.
    pub fn update_buffer(
        &mut self,
        queue: &wgpu::Queue,
        offset: wgpu::BufferAddress,
        uniforms: TransformUniforms,
    ) {
        queue.write_buffer(&self.buffer, offset, bytemuck::cast_slice(&[uniforms]))
    }
}
