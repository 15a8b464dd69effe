//! In-memory [`RenderContext`].
//!
//! Every call is logged and every buffer and texture keeps a CPU copy, so
//! tests can decode exactly what a sync uploaded.

use crate::{
    gpu_types::*,
    render_context::{BindGroupSpec, BindingSpec, RenderContext, RenderPipelineSpec, TextureRegion},
};
use parking_lot::Mutex;
use wgpu::*;

/// One logged GPU operation.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    CreateBuffer {
        size: u64,
        usage: BufferUsages,
    },
    WriteBuffer {
        buffer_id: usize,
        offset: u64,
        size: usize,
    },
    CreateTexture {
        texture_id: usize,
        width: u32,
        height: u32,
        format: TextureFormat,
    },
    WriteTexture {
        texture_id: usize,
        region: TextureRegion,
    },
    DestroyTexture {
        texture_id: usize,
    },
    CreateShaderModule {
        label: Option<String>,
    },
    CreateRenderPipeline {
        label: Option<String>,
        topology: PrimitiveTopology,
    },
    CreateBindGroupLayout {
        label: Option<String>,
    },
    CreateBindGroup {
        label: Option<String>,
    },
    PushErrorScope,
    PopErrorScope,
}

#[derive(Debug, Clone)]
struct MockBuffer {
    data: Vec<u8>,
}

#[derive(Debug, Clone)]
struct MockTexture {
    width: u32,
    texel_size: usize,
    data: Vec<u8>,
    destroyed: bool,
}

/// Texture ids referenced by a bind group.
#[derive(Debug, Clone)]
struct MockBindGroup {
    textures: Vec<usize>,
}

/// GPU context backed by plain memory.
///
/// State sits behind `parking_lot::Mutex` since the trait takes `&self` and
/// requires `Send + Sync`. Handles are indices into the per-kind vectors, so
/// ids are stable and start at zero.
///
/// ```rust
/// use ribbon_test_utils::{MockRenderContext, RenderContext};
/// use wgpu::*;
///
/// let mock = MockRenderContext::new();
/// let uniform = mock.create_buffer(&BufferDescriptor {
///     label: Some("frame"),
///     size: 80,
///     usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
///     mapped_at_creation: false,
/// });
/// mock.write_buffer(&uniform, 0, &[0u8; 80]);
///
/// assert_eq!(uniform.mock_id(), Some(0));
/// assert_eq!(mock.count_buffer_writes(), 1);
/// ```
pub struct MockRenderContext {
    calls: Mutex<Vec<RenderCall>>,
    buffers: Mutex<Vec<MockBuffer>>,
    textures: Mutex<Vec<MockTexture>>,
    bind_groups: Mutex<Vec<MockBindGroup>>,
    pipelines: Mutex<Vec<PrimitiveTopology>>,

    /// Shader modules and bind group layouts hold no state; they share one
    /// id counter.
    next_handle_id: Mutex<usize>,

    /// Open error scopes, innermost last
    error_scopes: Mutex<Vec<Option<String>>>,
    max_texture_dimension: u32,
}

impl MockRenderContext {
    /// Create a new mock render context with default wgpu limits.
    pub fn new() -> Self {
        Self::with_max_texture_dimension(Limits::default().max_texture_dimension_2d)
    }

    /// Create a mock context reporting a custom 2D texture size limit.
    pub fn with_max_texture_dimension(max_texture_dimension: u32) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            buffers: Mutex::new(Vec::new()),
            textures: Mutex::new(Vec::new()),
            bind_groups: Mutex::new(Vec::new()),
            pipelines: Mutex::new(Vec::new()),
            next_handle_id: Mutex::new(0),
            error_scopes: Mutex::new(Vec::new()),
            max_texture_dimension,
        }
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }

    fn count_matching(&self, predicate: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }

    pub fn count_buffer_writes(&self) -> usize {
        self.count_matching(|call| matches!(call, RenderCall::WriteBuffer { .. }))
    }

    pub fn count_texture_creates(&self) -> usize {
        self.count_matching(|call| matches!(call, RenderCall::CreateTexture { .. }))
    }

    /// Count partial texture uploads.
    pub fn count_texture_writes(&self) -> usize {
        self.count_matching(|call| matches!(call, RenderCall::WriteTexture { .. }))
    }

    /// Total number of texels uploaded through `write_texture`.
    pub fn texels_written(&self) -> u64 {
        self.calls
            .lock()
            .iter()
            .map(|call| match call {
                RenderCall::WriteTexture { region, .. } => region.texel_count() as u64,
                _ => 0,
            })
            .sum()
    }

    pub fn count_texture_destroys(&self) -> usize {
        self.count_matching(|call| matches!(call, RenderCall::DestroyTexture { .. }))
    }

    pub fn count_shader_creates(&self) -> usize {
        self.count_matching(|call| matches!(call, RenderCall::CreateShaderModule { .. }))
    }

    pub fn count_render_pipeline_creates(&self) -> usize {
        self.count_matching(|call| matches!(call, RenderCall::CreateRenderPipeline { .. }))
    }

    /// Number of textures created and not yet destroyed.
    pub fn live_texture_count(&self) -> usize {
        self.textures.lock().iter().filter(|t| !t.destroyed).count()
    }

    /// CPU copy of a mock buffer's contents.
    pub fn buffer_data(&self, buffer: &GpuBuffer) -> Option<Vec<u8>> {
        let id = buffer.mock_id()?;
        self.buffers.lock().get(id).map(|b| b.data.clone())
    }

    /// CPU copy of a mock texture's contents, row-major, tightly packed.
    pub fn texture_data(&self, texture: &GpuTexture) -> Option<Vec<u8>> {
        self.texture_data_by_id(texture.mock_id()?)
    }

    /// CPU copy of a mock texture's contents by mock ID.
    pub fn texture_data_by_id(&self, texture_id: usize) -> Option<Vec<u8>> {
        self.textures.lock().get(texture_id).map(|t| t.data.clone())
    }

    /// Whether the texture with this mock ID has been destroyed.
    pub fn is_texture_destroyed(&self, texture_id: usize) -> bool {
        self.textures
            .lock()
            .get(texture_id)
            .is_some_and(|t| t.destroyed)
    }

    /// Mock IDs of the textures referenced by a bind group.
    pub fn bind_group_textures(&self, bind_group_id: usize) -> Vec<usize> {
        self.bind_groups
            .lock()
            .get(bind_group_id)
            .map(|g| g.textures.clone())
            .unwrap_or_default()
    }

    /// Primitive topology a mock pipeline was created with.
    pub fn pipeline_topology(&self, pipeline_id: usize) -> Option<PrimitiveTopology> {
        self.pipelines.lock().get(pipeline_id).copied()
    }

    /// Report a validation error to the innermost open error scope.
    ///
    /// Ignored when no scope is open, like an uncaptured error would be.
    pub fn inject_error(&self, message: impl Into<String>) {
        if let Some(slot) = self.error_scopes.lock().last_mut() {
            slot.get_or_insert_with(|| message.into());
        }
    }

    /// Forget the call log; stored contents and ids are kept.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl MockRenderContext {
    fn next_handle(&self) -> usize {
        let mut next = self.next_handle_id.lock();
        *next += 1;
        *next - 1
    }
}

impl Default for MockRenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext for MockRenderContext {
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer {
        let mut buffers = self.buffers.lock();
        let id = buffers.len();
        buffers.push(MockBuffer {
            data: vec![0; desc.size as usize],
        });

        self.calls.lock().push(RenderCall::CreateBuffer {
            size: desc.size,
            usage: desc.usage,
        });

        GpuBuffer::mock(id)
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        let Some(buffer_id) = buffer.mock_id() else {
            return;
        };

        if let Some(mock) = self.buffers.lock().get_mut(buffer_id) {
            let start = offset as usize;
            let end = (start + data.len()).min(mock.data.len());
            mock.data[start..end].copy_from_slice(&data[..end - start]);
        }

        self.calls.lock().push(RenderCall::WriteBuffer {
            buffer_id,
            offset,
            size: data.len(),
        });
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture {
        let texel_size = desc.format.block_copy_size(None).unwrap_or(4) as usize;
        let mut textures = self.textures.lock();
        let id = textures.len();
        textures.push(MockTexture {
            width: desc.size.width,
            texel_size,
            data: vec![0; desc.size.width as usize * desc.size.height as usize * texel_size],
            destroyed: false,
        });

        self.calls.lock().push(RenderCall::CreateTexture {
            texture_id: id,
            width: desc.size.width,
            height: desc.size.height,
            format: desc.format,
        });

        GpuTexture::mock(id, desc.format)
    }

    fn write_texture(&self, texture: &GpuTexture, region: TextureRegion, data: &[u8]) {
        let Some(texture_id) = texture.mock_id() else {
            return;
        };

        if let Some(mock) = self.textures.lock().get_mut(texture_id) {
            let row_bytes = region.width as usize * mock.texel_size;
            for row in 0..region.height as usize {
                let src = &data[row * row_bytes..(row + 1) * row_bytes];
                let dst_texel = (region.y as usize + row) * mock.width as usize + region.x as usize;
                let dst = dst_texel * mock.texel_size;
                mock.data[dst..dst + row_bytes].copy_from_slice(src);
            }
        }

        self.calls
            .lock()
            .push(RenderCall::WriteTexture { texture_id, region });
    }

    fn destroy_texture(&self, texture: &GpuTexture) {
        let Some(texture_id) = texture.mock_id() else {
            return;
        };

        if let Some(mock) = self.textures.lock().get_mut(texture_id) {
            mock.destroyed = true;
        }

        self.calls
            .lock()
            .push(RenderCall::DestroyTexture { texture_id });
    }

    fn create_shader_module(&self, desc: &ShaderModuleDescriptor) -> GpuShaderModule {
        self.calls.lock().push(RenderCall::CreateShaderModule {
            label: desc.label.map(str::to_owned),
        });
        GpuShaderModule::mock(self.next_handle())
    }

    fn create_render_pipeline(&self, spec: &RenderPipelineSpec) -> GpuRenderPipeline {
        let mut pipelines = self.pipelines.lock();
        let pipeline_id = pipelines.len();
        pipelines.push(spec.topology);

        self.calls.lock().push(RenderCall::CreateRenderPipeline {
            label: spec.label.map(str::to_owned),
            topology: spec.topology,
        });

        GpuRenderPipeline::mock(pipeline_id)
    }

    fn create_bind_group_layout(&self, desc: &BindGroupLayoutDescriptor) -> GpuBindGroupLayout {
        self.calls.lock().push(RenderCall::CreateBindGroupLayout {
            label: desc.label.map(str::to_owned),
        });
        GpuBindGroupLayout::mock(self.next_handle())
    }

    fn create_bind_group(&self, spec: &BindGroupSpec) -> GpuBindGroup {
        let textures = spec
            .entries
            .iter()
            .filter_map(|entry| match entry {
                BindingSpec::Texture(texture) => texture.mock_id(),
                BindingSpec::Buffer(_) => None,
            })
            .collect();

        let mut bind_groups = self.bind_groups.lock();
        let bind_group_id = bind_groups.len();
        bind_groups.push(MockBindGroup { textures });

        self.calls.lock().push(RenderCall::CreateBindGroup {
            label: spec.label.map(str::to_owned),
        });

        GpuBindGroup::mock(bind_group_id)
    }

    fn max_texture_dimension_2d(&self) -> u32 {
        self.max_texture_dimension
    }

    fn push_error_scope(&self, _filter: ErrorFilter) {
        self.error_scopes.lock().push(None);
        self.calls.lock().push(RenderCall::PushErrorScope);
    }

    fn pop_error_scope(&self) -> Option<String> {
        self.calls.lock().push(RenderCall::PopErrorScope);
        self.error_scopes.lock().pop().flatten()
    }
}
