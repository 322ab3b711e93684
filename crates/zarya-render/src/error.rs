//! Error types for the renderer

use thiserror::Error;

/// Result type alias using the renderer's error type
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors raised while setting up or driving the GPU
#[derive(Error, Debug)]
pub enum RenderError {
    /// Shader module or pipeline rejected by the backend.
    ///
    /// Carries the backend diagnostic and the full source of the offending
    /// program so the failure can be read without a debugger.
    #[error("Failed to build program '{label}': {diagnostic}\n--- source ---\n{code}")]
    ShaderCompilation {
        label: String,
        diagnostic: String,
        code: String,
    },

    /// No adapter matched the request
    #[error("No suitable GPU adapter: {0}")]
    AdapterUnavailable(#[from] wgpu::RequestAdapterError),

    /// Adapter refused to create a device
    #[error("Failed to create GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    /// Window surface could not be created or used
    #[error("Surface error: {0}")]
    Surface(String),

    /// Readback buffer could not be mapped
    #[error("Failed to map readback buffer: {0}")]
    BufferMap(String),
}

impl From<wgpu::CreateSurfaceError> for RenderError {
    fn from(err: wgpu::CreateSurfaceError) -> Self {
        Self::Surface(err.to_string())
    }
}
