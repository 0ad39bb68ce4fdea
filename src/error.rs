//! Error types for fatal startup and frame failures.
//!
//! Anything in here ends the application: the event loop exits, and the native binary prints
//! the error and returns a non-zero status. Recoverable problems (a texture that fails to decode,
//! a lost surface, a minimized window) are logged where they happen and never become an
//! `AppError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to create or run the event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("No compatible graphics adapter found")]
    NoAdapter,

    #[error("Failed to request a device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("Surface does not support any texture format")]
    NoSurfaceFormat,

    #[error("Surface ran out of memory")]
    SurfaceOutOfMemory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        assert_eq!(
            AppError::NoAdapter.to_string(),
            "No compatible graphics adapter found"
        );
        assert_eq!(
            AppError::SurfaceOutOfMemory.to_string(),
            "Surface ran out of memory"
        );
    }
}
