//! GPU abstraction for Ribbon, plus mocks for testing without a GPU.
//!
//! # Overview
//!
//! - [`RenderContext`] - Trait abstracting GPU resource operations
//! - [`DrawPass`] - Trait abstracting render pass commands
//! - `MockRenderContext` / `MockDrawPass` - Recording mocks (requires `mock` feature)
//! - GPU wrapper types (`GpuBuffer`, `GpuTexture`, etc.) - Can be real or mock
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use ribbon_test_utils::{MockRenderContext, RenderContext, TextureRegion};
//! use wgpu::*;
//!
//! let mock = MockRenderContext::new();
//! let texture = mock.create_texture(&TextureDescriptor {
//!     label: Some("segment"),
//!     size: Extent3d { width: 6, height: 1, depth_or_array_layers: 1 },
//!     mip_level_count: 1,
//!     sample_count: 1,
//!     dimension: TextureDimension::D2,
//!     format: TextureFormat::Rgba32Float,
//!     usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
//!     view_formats: &[],
//! });
//! mock.write_texture(&texture, TextureRegion::new(0, 0, 1, 1), &[0u8; 16]);
//!
//! assert_eq!(mock.count_texture_writes(), 1);
//! # }
//! ```
//!
//! Both traits are object safe; the streaming code only takes
//! `&dyn RenderContext` and `&mut dyn DrawPass`.

pub mod draw_pass;
pub mod gpu_types;
#[cfg(feature = "mock")]
pub mod mock_pass;
#[cfg(feature = "mock")]
pub mod mock_render;
pub mod render_context;

pub use draw_pass::*;
pub use gpu_types::*;
#[cfg(feature = "mock")]
pub use mock_pass::*;
#[cfg(feature = "mock")]
pub use mock_render::*;
pub use render_context::*;
