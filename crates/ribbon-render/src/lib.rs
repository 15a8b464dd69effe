//! Ribbon Render
//!
//! Device setup and small GPU-facing value types shared by the streaming
//! renderer. The heavy lifting lives in `ribbon-stream`; this crate only owns
//! the wgpu context and its [`RenderContext`] implementation.

mod color;
mod context;
mod context_impl;
mod error;

pub use color::Color;
pub use context::{GraphicsContext, GraphicsContextDescriptor};
pub use error::GraphicsError;

pub use ribbon_test_utils::{
    BindGroupSpec, BindingSpec, DrawPass, GpuBindGroup, GpuBindGroupLayout, GpuBuffer,
    GpuRenderPipeline, GpuShaderModule, GpuTexture, RenderContext, RenderPipelineSpec,
    TextureRegion,
};

pub use wgpu;
