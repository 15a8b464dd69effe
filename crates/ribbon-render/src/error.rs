use thiserror::Error;

/// Errors raised while bringing up a [`GraphicsContext`](crate::GraphicsContext).
#[derive(Debug, Error)]
pub enum GraphicsError {
    /// No adapter matched the requested backends and power preference.
    #[error("no suitable GPU adapter found: {0}")]
    AdapterNotFound(#[from] wgpu::RequestAdapterError),

    /// The adapter refused the requested features or limits.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
}
