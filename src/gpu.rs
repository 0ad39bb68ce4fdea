//! # GPU Management Module
//!
//! The `gpu` module sets up and manages the surface, device and queue used for rendering.
//!
//! ## Overview
//!
//! [`Gpu::new_async`] walks through the usual `wgpu` startup sequence: instance, surface, adapter,
//! device and queue, then configures the surface for the window size. Each step that can fail
//! returns an [`AppError`]; none of them is retried.
//!
//! ## Features
//!
//! - **Surface Resizing**: reconfigures the surface when the window changes size, and leaves it
//!   alone while the window is minimized (zero-sized).
//! - **Depth Texture Creation**: the depth attachment used by the quad's depth test.
//! - **Frame Acquisition**: [`Gpu::acquire_frame`] turns surface errors into either a skipped
//!   frame or a fatal [`AppError`].
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! let gpu = Gpu::new_async(window, 800, 600).await?;
//! if let Some(frame) = gpu.acquire_frame()? {
//!     // record and submit, then
//!     frame.present();
//! }
//! ```

use wgpu::InstanceDescriptor;

use crate::error::AppError;
use crate::transform::Viewport;

/// What to do with the current frame after the surface reported an error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The surface was reconfigured; try again next frame.
    Reconfigured,
    /// Transient error; skip this frame.
    SkipFrame,
    /// Unrecoverable, the application should exit.
    Fatal,
}

impl SurfaceErrorAction {
    pub fn from_error(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigured,
            wgpu::SurfaceError::OutOfMemory => Self::Fatal,
            _ => Self::SkipFrame,
        }
    }
}

pub struct Gpu {
    pub surface: wgpu::Surface<'static>,

    pub device: wgpu::Device,

    pub queue: wgpu::Queue,

    pub surface_config: wgpu::SurfaceConfiguration,

    pub surface_format: wgpu::TextureFormat,
}

impl Gpu {
    /// Reconfigures the surface for the new size.
    ///
    /// A zero width or height means the window is minimized. Configuring a surface with a zero
    /// dimension is invalid, so the previous configuration is kept until a real size arrives.
    /// Returns `false` in that case.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if Viewport::new(width, height).is_empty() {
            log::debug!("Ignoring zero-sized surface ({width}, {height})");
            return false;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
        true
    }

    pub fn create_depth_texture(&self, width: u32, height: u32) -> wgpu::TextureView {
        let texture = self.device.create_texture(
            &(wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
                size: wgpu::Extent3d {
                    width: width.max(1),
                    height: height.max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: crate::renderer::Renderer::DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            }),
        );
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Acquires the next surface texture.
    ///
    /// Returns `Ok(None)` when the frame should be skipped: the surface was lost or outdated (it is
    /// reconfigured here), or acquisition timed out. Running out of memory is fatal.
    pub fn acquire_frame(&self) -> Result<Option<wgpu::SurfaceTexture>, AppError> {
        match self.surface.get_current_texture() {
            Ok(surface_texture) => Ok(Some(surface_texture)),
            Err(err) => match SurfaceErrorAction::from_error(&err) {
                SurfaceErrorAction::Reconfigured => {
                    log::warn!("Surface {err}, reconfiguring");
                    self.surface.configure(&self.device, &self.surface_config);
                    Ok(None)
                }
                SurfaceErrorAction::SkipFrame => {
                    log::warn!("Skipping frame: {err}");
                    Ok(None)
                }
                SurfaceErrorAction::Fatal => Err(AppError::SurfaceOutOfMemory),
            },
        }
    }

    pub async fn new_async(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self, AppError> {
        let instance = wgpu::Instance::new(&InstanceDescriptor::default());

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(AppError::NoAdapter)?;

        log::info!("Using adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("WGPU Device"),
                    memory_hints: wgpu::MemoryHints::default(),
                    required_features: wgpu::Features::default(),
                    #[cfg(not(target_arch = "wasm32"))]
                    required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                    #[cfg(all(target_arch = "wasm32", feature = "webgpu"))]
                    required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                    #[cfg(all(target_arch = "wasm32", feature = "webgl"))]
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                },
                None,
            )
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);

        let surface_format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb()) // egui wants a non-srgb surface texture
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(AppError::NoSurfaceFormat)?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: surface_capabilities.present_modes[0],
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &surface_config);

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            surface_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lost_and_outdated_surfaces_are_reconfigured() {
        assert_eq!(
            SurfaceErrorAction::from_error(&wgpu::SurfaceError::Lost),
            SurfaceErrorAction::Reconfigured
        );
        assert_eq!(
            SurfaceErrorAction::from_error(&wgpu::SurfaceError::Outdated),
            SurfaceErrorAction::Reconfigured
        );
    }

    #[test]
    fn timeouts_skip_and_oom_is_fatal() {
        assert_eq!(
            SurfaceErrorAction::from_error(&wgpu::SurfaceError::Timeout),
            SurfaceErrorAction::SkipFrame
        );
        assert_eq!(
            SurfaceErrorAction::from_error(&wgpu::SurfaceError::OutOfMemory),
            SurfaceErrorAction::Fatal
        );
    }
}
