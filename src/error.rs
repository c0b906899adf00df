//! Setup failures of the window, GPU and input collaborators
//!
//! None of these can happen once a session is running; they are raised while
//! the bootstrap wires up a display or GPU and are fatal to the process.

use thiserror::Error;

use crate::sim::ConfigError;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to create the event loop")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to open the game window")]
    Window(#[from] winit::error::OsError),
    #[error("failed to create a rendering surface for the window")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to open the GPU device")]
    Device(#[from] wgpu::RequestDeviceError),
}

impl SetupError {
    /// Actionable guidance printed next to the error
    pub fn hint(&self) -> &'static str {
        match self {
            SetupError::EventLoop(_) | SetupError::Window(_) => {
                "No display available. For a smoke test without a display, run: jumpy-fish --headless"
            }
            SetupError::Surface(_) => {
                "The window cannot be drawn to by any GPU backend. Try WGPU_BACKEND=gl, or run with --headless"
            }
            SetupError::Adapter(_) | SetupError::Device(_) => {
                "No usable GPU. Try WGPU_BACKEND=gl, install a software Vulkan driver (lavapipe), or pass --headless --no-render"
            }
        }
    }
}

/// Anything that stops a run before its first tick
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Setup(#[from] SetupError),
}
