//! The GPU seam between the streaming renderer and wgpu.
//!
//! The `RenderContext` trait covers everything the streaming renderer asks of
//! a device: buffers, partially updated textures, shader modules, pipelines,
//! bind groups and validation error scopes.

use crate::gpu_types::*;
use wgpu::{
    BindGroupLayoutDescriptor, BlendState, BufferDescriptor, ErrorFilter, PrimitiveTopology,
    ShaderModuleDescriptor, TextureDescriptor, TextureFormat,
};

/// Rectangle of texels targeted by [`RenderContext::write_texture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TextureRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of texels covered.
    pub fn texel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// A resource bound at one slot of a bind group.
///
/// Entries are bound at the binding index equal to their position in
/// [`BindGroupSpec::entries`].
#[derive(Debug, Clone, Copy)]
pub enum BindingSpec<'a> {
    Buffer(&'a GpuBuffer),
    Texture(&'a GpuTexture),
}

/// Bind group descriptor expressed in wrapper types.
///
/// `wgpu::BindGroupDescriptor` borrows concrete wgpu resources, which a mock
/// context cannot produce, so bind groups are described with wrappers instead.
#[derive(Debug, Clone, Copy)]
pub struct BindGroupSpec<'a> {
    pub label: Option<&'a str>,
    pub layout: &'a GpuBindGroupLayout,
    pub entries: &'a [BindingSpec<'a>],
}

/// Render pipeline descriptor expressed in wrapper types.
///
/// Pipelines built from this spec read no vertex buffers; the vertex stage
/// fetches its data from bound resources using the vertex index.
#[derive(Debug, Clone, Copy)]
pub struct RenderPipelineSpec<'a> {
    pub label: Option<&'a str>,
    pub shader: &'a GpuShaderModule,
    pub vertex_entry: &'a str,
    pub fragment_entry: &'a str,
    pub bind_group_layouts: &'a [&'a GpuBindGroupLayout],
    pub topology: PrimitiveTopology,
    pub target_format: TextureFormat,
    pub blend: Option<BlendState>,
}

/// GPU operations the streaming renderer performs.
///
/// Every handle it returns is owned and reference counted, so the trait is
/// object safe and segments can outlive the call that created them. The
/// renderer only ever sees `&dyn RenderContext`.
///
/// # Example
///
/// ```rust,no_run
/// use ribbon_test_utils::RenderContext;
/// use wgpu::{BufferDescriptor, BufferUsages};
///
/// fn upload_uniform(ctx: &dyn RenderContext) {
///     let desc = BufferDescriptor {
///         label: None,
///         size: 16,
///         usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
///         mapped_at_creation: false,
///     };
///     let buffer = ctx.create_buffer(&desc);
///     ctx.write_buffer(&buffer, 0, &[0u8; 16]);
/// }
/// ```
pub trait RenderContext: Send + Sync {
    // Buffer operations

    /// Create a GPU buffer.
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer;

    /// Queue a write of `data` at `offset`.
    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]);

    // Texture operations

    /// Create a GPU texture.
    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture;

    /// Upload tightly packed texel data into a region of mip level 0.
    ///
    /// `data` holds `region.height` rows of `region.width` texels each.
    fn write_texture(&self, texture: &GpuTexture, region: TextureRegion, data: &[u8]);

    /// Release the texture's GPU memory immediately.
    fn destroy_texture(&self, texture: &GpuTexture);

    // Shader operations

    /// Create a shader module from source code.
    fn create_shader_module(&self, desc: &ShaderModuleDescriptor) -> GpuShaderModule;

    // Pipeline operations

    /// Create a render pipeline with its layout.
    fn create_render_pipeline(&self, spec: &RenderPipelineSpec) -> GpuRenderPipeline;

    // Bind group operations

    /// Create a bind group layout.
    fn create_bind_group_layout(&self, desc: &BindGroupLayoutDescriptor) -> GpuBindGroupLayout;

    /// Create a bind group.
    fn create_bind_group(&self, spec: &BindGroupSpec) -> GpuBindGroup;

    // Limits and validation

    /// Largest width or height accepted for a 2D texture.
    fn max_texture_dimension_2d(&self) -> u32;

    /// Start capturing errors of the given kind.
    fn push_error_scope(&self, filter: ErrorFilter);

    /// Stop capturing and return the first captured error message, if any.
    fn pop_error_scope(&self) -> Option<String>;
}
