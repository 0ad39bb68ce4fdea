//! # Texture
//!
//! Decodes the container image and uploads it as a sampled texture bound at group 1.
//!
//! Decoding is done with the `image` crate and always produces RGBA8, whatever the channel count
//! of the source file. The sampler repeats in both directions and filters linearly.
//!
//! When the image cannot be decoded the caller logs the error and binds
//! [`Texture::fallback`] instead, a small magenta/black checker that makes the failure obvious
//! on screen without stopping the render loop.

use wgpu::util::DeviceExt;

/// A GPU texture with its view, sampler and bind group.
#[derive(Debug)]
pub struct Texture {
    pub(crate) bind_group: wgpu::BindGroup,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Texels of the fallback checker, row by row.
    const FALLBACK_TEXELS: [[u8; 4]; 4] = [
        [255, 0, 255, 255],
        [0, 0, 0, 255],
        [0, 0, 0, 255],
        [255, 0, 255, 255],
    ];

    /// Layout shared by every texture bind group: the texture at binding 0 and its sampler at
    /// binding 1, both visible to the fragment stage.
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    /// Create a texture from raw RGBA data.
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        data: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Self {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{label} Sampler")),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            // Single mip level; wgpu does not generate mipmaps.
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Bind Group")),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self {
            bind_group,
            width,
            height,
        }
    }

    /// Load a texture from an image file.
    pub fn from_file(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        path: &str,
    ) -> Result<Self, image::ImageError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self::from_rgba(device, queue, layout, &img, width, height, path))
    }

    /// A 2x2 magenta/black checker, bound when the real image fails to load.
    pub fn fallback(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self::from_rgba(
            device,
            queue,
            layout,
            Self::FALLBACK_TEXELS.as_flattened(),
            2,
            2,
            "Fallback Texture",
        )
    }

    /// Loads `path`, or logs the failure and returns the fallback texture.
    pub fn load_or_fallback(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        path: &str,
    ) -> Self {
        match Self::from_file(device, queue, layout, path) {
            Ok(texture) => {
                log::info!(
                    "Loaded texture {path} ({} x {})",
                    texture.width,
                    texture.height
                );
                texture
            }
            Err(err) => {
                log::error!("Failed to load texture {path}: {err}");
                Self::fallback(device, queue, layout)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_a_two_by_two_rgba_checker() {
        assert_eq!(Texture::FALLBACK_TEXELS.as_flattened().len(), 2 * 2 * 4);
        assert_eq!(Texture::FALLBACK_TEXELS[0], Texture::FALLBACK_TEXELS[3]);
        assert_ne!(Texture::FALLBACK_TEXELS[0], Texture::FALLBACK_TEXELS[1]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = image::open("does/not/exist/container.jpg");
        assert!(matches!(result, Err(image::ImageError::IoError(_))));
    }
}
