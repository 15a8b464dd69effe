use thiserror::Error;

use crate::renderer::SeriesId;

/// Errors raised by the streaming renderer.
///
/// Resource and shader failures are fatal for the frame that hit them; the
/// renderer does not retry.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A configuration value cannot produce a usable segment layout.
    #[error("invalid renderer configuration: {0}")]
    InvalidConfig(String),

    /// A GPU resource could not be created.
    #[error("failed to create {resource}: {message}")]
    ResourceCreation {
        resource: &'static str,
        message: String,
    },

    /// A shader module failed validation (only checked in debug mode).
    #[error("shader `{label}` failed to compile: {message}")]
    ShaderCompilation { label: &'static str, message: String },

    /// A validation error was captured around a frame (debug mode).
    #[error("GPU error during frame: {0}")]
    Gpu(String),

    /// The series handle does not belong to this renderer.
    #[error("unknown series {0:?}")]
    UnknownSeries(SeriesId),
}

pub type RenderResult<T> = Result<T, RenderError>;
