//! # Coordinate Systems
//!
//! This library draws a single textured quad and walks its vertices through the coordinate
//! spaces of a rendering pipeline:
//!
//! 1. **Local space**: the quad's own coordinates, between `-0.5` and `0.5` around its origin.
//! 2. **World space**: the model matrix tilts the quad by -55° about X so it lies on the floor.
//! 3. **View space**: the view matrix moves the scene 3 units away from the viewer.
//! 4. **Clip space**: the perspective projection maps the frustum to homogeneous coordinates.
//! 5. **Screen space**: after perspective division the viewport transform maps NDC to pixels.
//!
//! A fourth matrix, the spin transform, turns the quad about Z by 50° per second. It is
//! uploaded as its own uniform next to model, view and projection.
//!
//! ## Modules
//!
//! - [`transform`]: computes the model, view, projection and spin matrices. No GPU involved.
//! - [`app`]: window, input, frame clock and inspector overlay.
//! - [`renderer`]: records and presents each frame.
//! - [`gpu`]: surface, device and queue setup.
//! - [`scene`]: the quad's buffers, texture and shader program.
//! - [`shader`]: compiles the WGSL source and owns the transform uniforms.
//! - [`texture`]: image decoding and the fallback texture.
//! - [`vertex`]: vertex layout and the quad data.
//! - [`uniform_buffer`] / [`uniform_binding`]: the uniform block and its GPU binding.
//! - [`error`]: fatal errors.
//! - [`logging`]: logger setup.
//!
//! ## Configuration
//!
//! The window size, title, texture path and clear color are the constants below. `RUST_LOG`
//! controls logging on desktop, and the `webgl` / `webgpu` features select the browser backend.
//!
//! ## Example
//!
//! ```rust,no_run
//! fn main() {
//!     if let Err(err) = coordinate_core::run() {
//!         eprintln!("{err}");
//!         std::process::exit(1);
//!     }
//! }
//! ```

mod app;
mod error;
mod gpu;
mod logging;
mod renderer;
mod scene;
mod shader;
mod texture;
mod transform;
mod uniform_binding;
mod uniform_buffer;
mod vertex;

use winit::event_loop::{ControlFlow, EventLoop};

pub use crate::app::App;
pub use crate::error::AppError;
pub use crate::gpu::{Gpu, SurfaceErrorAction};
pub use crate::renderer::Renderer;
pub use crate::scene::Scene;
pub use crate::shader::ShaderProgram;
pub use crate::texture::Texture;
pub use crate::transform::{
    compute_model, compute_projection, compute_spin, compute_view, FrameTransforms,
    TransformPipeline, Viewport,
};
pub use crate::uniform_binding::UniformBinding;
pub use crate::uniform_buffer::TransformUniforms;
pub use crate::vertex::{Vertex, INDICES, VERTICES};

/// Initial window width, in physical pixels.
pub const WINDOW_WIDTH: u32 = 800;

/// Initial window height, in physical pixels.
pub const WINDOW_HEIGHT: u32 = 600;

/// Title of the application window.
pub const WINDOW_TITLE: &str = "Coordinate Systems";

/// Image mapped onto the quad, relative to the working directory.
pub const TEXTURE_PATH: &str = "container.jpg";

/// Background color, RGBA.
pub const CLEAR_COLOR: [f64; 4] = [0.2, 0.3, 0.3, 1.0];

/// The WGSL source for the quad.
///
/// ### Bindings
///
/// - group 0, binding 0: the `Transforms` uniform block (`model`, `view`, `projection`,
///   `transform`, `time`), see [`TransformUniforms`].
/// - group 1, binding 0 and 1: the container texture and its sampler.
///
/// ### Vertex Stage
///
/// `vertex_main` applies the spin to the local position, then computes
/// `projection * view * model * position`, and finally remaps clip-space depth from `[-w, w]` to
/// `[0, w]`.
///
/// ### Fragment Stage
///
/// `fragment_main` samples the texture and tints it with the vertex color, fading the tint in and
/// out with `time`.
pub const SHADER_SOURCE: &str = include_str!("shader_source.wgsl");

/// Creates the event loop and runs the application until the window closes.
///
/// On desktop this blocks, and returns the first fatal error the application hit. In the browser
/// the event loop is handed to the page and this returns immediately.
pub fn run() -> Result<(), AppError> {
    logging::init_logging();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    #[cfg(not(target_arch = "wasm32"))]
    let result = {
        let mut app = App::default();
        event_loop.run_app(&mut app)?;
        match app.take_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    };

    #[cfg(target_arch = "wasm32")]
    let result = {
        use winit::platform::web::EventLoopExtWebSys;
        event_loop.spawn_app(App::default());
        Ok(())
    };

    result
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    if let Err(err) = run() {
        log::error!("{err}");
    }
}
