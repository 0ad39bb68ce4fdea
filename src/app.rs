//! # Application Core (`app.rs`)
//!
//! The `App` struct is the `winit` application handler. It owns the window, the renderer, the
//! `egui` state and the application clock, and turns window events into frames.
//!
//! ## Responsibilities
//!
//! - **Window Management**: creates the window on `resumed` and tracks its size.
//! - **Input**: `Escape` or a close request ends the event loop.
//! - **Frame Timing**: measures the seconds since the window was created. That value is the only
//!   input that animates the scene.
//! - **Transforms**: asks the [`TransformPipeline`] for the frame's matrices using the current
//!   [`Viewport`], and passes them to the renderer as [`TransformUniforms`].
//! - **Inspector**: an `egui` window showing the clock, the viewport and the four matrices, with a
//!   checkbox that suspends the spin transform.
//!
//! ## Platform-Specific Notes
//!
//! - **Desktop**: the renderer is created synchronously with `pollster`. A failure is stored
//!   in the app, the event loop exits, and [`crate::run`] returns the error.
//! - **WebAssembly**: the renderer is created on the browser's executor and handed back through a
//!   `oneshot` channel that is polled on every window event until it arrives.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use std::sync::Arc;

use nalgebra_glm as glm;

use web_time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    window::{Theme, Window},
};

use crate::error::AppError;
use crate::renderer::Renderer;
use crate::transform::{spin_angle_degrees, FrameTransforms, TransformPipeline, Viewport};
use crate::uniform_buffer::TransformUniforms;

pub struct App {
    window: Option<Arc<Window>>,

    renderer: Option<Renderer>,

    gui_state: Option<egui_winit::State>,

    /// Start of the application clock, set when the window is created.
    start_time: Option<Instant>,

    #[cfg(target_arch = "wasm32")]
    renderer_receiver: Option<futures::channel::oneshot::Receiver<Renderer>>,

    /// Latest size reported by the window, in physical pixels.
    last_size: (u32, u32),

    transforms: TransformPipeline,

    spin_enabled: bool,

    /// Fatal error that ended the event loop.
    error: Option<AppError>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            window: None,
            renderer: None,
            gui_state: None,
            start_time: None,
            #[cfg(target_arch = "wasm32")]
            renderer_receiver: None,
            last_size: (crate::WINDOW_WIDTH, crate::WINDOW_HEIGHT),
            transforms: TransformPipeline::new(),
            spin_enabled: true,
            error: None,
        }
    }
}

impl App {
    /// Takes the error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<AppError> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &winit::event_loop::ActiveEventLoop, err: AppError) {
        log::error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let mut attributes = Window::default_attributes().with_title(crate::WINDOW_TITLE);

        #[cfg(not(target_arch = "wasm32"))]
        {
            attributes = attributes.with_inner_size(PhysicalSize::new(
                crate::WINDOW_WIDTH,
                crate::WINDOW_HEIGHT,
            ));
        }

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;

            let canvas = wgpu::web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id("canvas"))
                .and_then(|element| element.dyn_into::<wgpu::web_sys::HtmlCanvasElement>().ok());

            match canvas {
                Some(canvas) => {
                    self.last_size = (canvas.width(), canvas.height());
                    log::info!("Canvas dimensions: ({} x {})", canvas.width(), canvas.height());
                    attributes = attributes.with_canvas(Some(canvas));
                }
                None => log::error!("No <canvas id=\"canvas\"> element found"),
            }
        }

        let window = match event_loop.create_window(attributes) {
            Ok(window) => window,
            Err(err) => {
                self.fail(event_loop, err.into());
                return;
            }
        };

        let first_window_handle = self.window.is_none();
        let window_handle = Arc::new(window);
        self.window = Some(window_handle.clone());

        if !first_window_handle {
            return;
        }

        let gui_context = egui::Context::default();

        #[cfg(not(target_arch = "wasm32"))]
        {
            let inner_size = window_handle.inner_size();
            self.last_size = (inner_size.width, inner_size.height);
        }

        #[cfg(target_arch = "wasm32")]
        {
            gui_context.set_pixels_per_point(window_handle.scale_factor() as f32);
        }

        let viewport_id = gui_context.viewport_id();

        let gui_state = egui_winit::State::new(
            gui_context,
            viewport_id,
            &window_handle,
            Some(window_handle.scale_factor() as _),
            Some(Theme::Dark),
            None,
        );

        let (width, height) = self.last_size;

        #[cfg(not(target_arch = "wasm32"))]
        {
            let renderer = pollster::block_on(async move {
                Renderer::new(window_handle.clone(), width, height).await
            });
            match renderer {
                Ok(renderer) => self.renderer = Some(renderer),
                Err(err) => {
                    self.fail(event_loop, err);
                    return;
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let (sender, receiver) = futures::channel::oneshot::channel();
            self.renderer_receiver = Some(receiver);
            wasm_bindgen_futures::spawn_local(async move {
                match Renderer::new(window_handle.clone(), width, height).await {
                    Ok(renderer) => {
                        if sender.send(renderer).is_err() {
                            log::error!("Failed to send renderer!");
                        }
                    }
                    Err(err) => log::error!("{err}"),
                }
            });
        }

        self.gui_state = Some(gui_state);
        self.start_time = Some(Instant::now());
        log::info!("Window created ({width} x {height})");
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: winit::event::WindowEvent,
    ) {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(receiver) = self.renderer_receiver.as_mut() {
                if let Ok(Some(renderer)) = receiver.try_recv() {
                    self.renderer = Some(renderer);
                    self.renderer_receiver = None;
                }
            }
        }

        let (Some(gui_state), Some(renderer), Some(window), Some(start_time)) = (
            self.gui_state.as_mut(),
            self.renderer.as_mut(),
            self.window.as_ref(),
            self.start_time.as_ref(),
        ) else {
            return;
        };

        if gui_state.on_window_event(window, &event).consumed {
            return;
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    log::info!("Escape pressed. Exiting...");
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                log::info!("Resizing renderer surface to: ({width}, {height})");
                renderer.resize(width, height);
                self.last_size = (width, height);
            }
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting...");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested if drawable_viewport(self.last_size).is_none() => {}
            WindowEvent::RedrawRequested => {
                let elapsed = start_time.elapsed().as_secs_f32();
                let (width, height) = self.last_size;
                let viewport = Viewport::new(width, height);

                let mut frame = self.transforms.frame(elapsed, viewport);
                if !self.spin_enabled {
                    frame = frame.without_spin();
                }

                let gui_input = gui_state.take_egui_input(window);
                gui_state.egui_ctx().begin_pass(gui_input);

                draw_inspector(
                    gui_state.egui_ctx(),
                    elapsed,
                    viewport,
                    &frame,
                    &mut self.spin_enabled,
                );

                let egui_winit::egui::FullOutput {
                    textures_delta,
                    shapes,
                    pixels_per_point,
                    platform_output,
                    ..
                } = gui_state.egui_ctx().end_pass();

                gui_state.handle_platform_output(window, platform_output);

                let paint_jobs = gui_state.egui_ctx().tessellate(shapes, pixels_per_point);

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [width, height],
                    pixels_per_point: window.scale_factor() as f32,
                };

                let uniforms = TransformUniforms::new(&frame, elapsed);

                if let Err(err) =
                    renderer.render_frame(screen_descriptor, paint_jobs, textures_delta, uniforms)
                {
                    self.fail(event_loop, err);
                    return;
                }
            }
            _ => (),
        }

        window.request_redraw();
    }
}

/// Returns the viewport to draw into, or `None` while the window is minimized.
///
/// The surface keeps its last configuration while minimized, so there is nothing worth drawing.
fn drawable_viewport((width, height): (u32, u32)) -> Option<Viewport> {
    let viewport = Viewport::new(width, height);
    (!viewport.is_empty()).then_some(viewport)
}

/// Shows the clock, the viewport and the frame's matrices.
fn draw_inspector(
    ctx: &egui::Context,
    elapsed: f32,
    viewport: Viewport,
    frame: &FrameTransforms,
    spin_enabled: &mut bool,
) {
    egui::Window::new("Coordinate Systems").show(ctx, |ui| {
        ui.label(format!("Time: {elapsed:.2} s"));
        ui.label(format!("Spin angle: {:.1}°", spin_angle_degrees(elapsed)));
        ui.label(format!("Viewport: {} x {}", viewport.width, viewport.height));
        ui.label(format!("Aspect ratio: {:.3}", viewport.aspect_ratio()));
        ui.checkbox(spin_enabled, "Apply spin transform");

        ui.separator();

        for (name, matrix) in [
            ("Model", &frame.model),
            ("View", &frame.view),
            ("Projection", &frame.projection),
            ("Spin", &frame.spin),
        ] {
            egui::CollapsingHeader::new(name).show(ui, |ui| matrix_grid(ui, name, matrix));
        }
    });
}

/// Lays a matrix out row by row.
fn matrix_grid(ui: &mut egui::Ui, id: &str, matrix: &glm::Mat4) {
    egui::Grid::new(id).striped(true).show(ui, |ui| {
        for row in 0..4 {
            for col in 0..4 {
                ui.monospace(format!("{:>8.3}", matrix[(row, col)]));
            }
            ui.end_row();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn minimized_window_is_not_drawn() {
        assert_eq!(drawable_viewport((0, 0)), None);
        assert_eq!(drawable_viewport((800, 0)), None);
        assert_eq!(drawable_viewport((0, 600)), None);
    }

    #[test]
    fn restored_window_is_drawn_at_its_size() {
        assert_eq!(drawable_viewport((800, 600)), Some(Viewport::new(800, 600)));
    }
}
