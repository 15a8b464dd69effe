//! GPU handles that are either a real wgpu object or a mock id.
//!
//! Everything above [`RenderContext`](crate::RenderContext) holds these
//! instead of wgpu types, so segments and pipelines can be created by
//! [`MockRenderContext`](crate::MockRenderContext) in tests. wgpu objects are
//! reference counted, so cloning a handle is cheap.

macro_rules! gpu_handle {
    ($(#[$meta:meta])* $name:ident, $inner:ident, $wgpu:ty) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name {
            inner: $inner,
        }

        #[derive(Clone, Debug)]
        enum $inner {
            Real($wgpu),
            #[cfg(feature = "mock")]
            Mock(usize),
        }

        impl $name {
            pub fn from_wgpu(handle: $wgpu) -> Self {
                Self {
                    inner: $inner::Real(handle),
                }
            }

            #[cfg(feature = "mock")]
            pub fn mock(id: usize) -> Self {
                Self {
                    inner: $inner::Mock(id),
                }
            }

            /// # Panics
            /// Panics on a mock handle; only the wgpu backend calls this.
            pub fn as_wgpu(&self) -> &$wgpu {
                match &self.inner {
                    $inner::Real(handle) => handle,
                    #[cfg(feature = "mock")]
                    $inner::Mock(id) => {
                        panic!(concat!("mock ", stringify!($name), " {} has no wgpu object"), id)
                    }
                }
            }

            #[cfg(feature = "mock")]
            pub fn is_mock(&self) -> bool {
                matches!(self.inner, $inner::Mock(_))
            }

            #[cfg(feature = "mock")]
            pub fn mock_id(&self) -> Option<usize> {
                match &self.inner {
                    $inner::Mock(id) => Some(*id),
                    $inner::Real(_) => None,
                }
            }
        }
    };
}

gpu_handle!(
    /// Uniform buffer handle.
    GpuBuffer, BufferInner, wgpu::Buffer
);
gpu_handle!(GpuShaderModule, ShaderModuleInner, wgpu::ShaderModule);
gpu_handle!(
    /// Render pipeline handle; one exists per primitive topology.
    GpuRenderPipeline, RenderPipelineInner, wgpu::RenderPipeline
);
gpu_handle!(GpuBindGroupLayout, BindGroupLayoutInner, wgpu::BindGroupLayout);
gpu_handle!(GpuBindGroup, BindGroupInner, wgpu::BindGroup);

/// Segment texture handle.
///
/// The real variant keeps its default view alongside, so the segment bind
/// group can be built without going back to the device.
#[derive(Clone, Debug)]
pub struct GpuTexture {
    inner: TextureInner,
}

#[derive(Clone, Debug)]
enum TextureInner {
    Real {
        texture: wgpu::Texture,
        view: wgpu::TextureView,
    },
    #[cfg(feature = "mock")]
    Mock {
        id: usize,
        format: wgpu::TextureFormat,
    },
}

impl GpuTexture {
    pub fn from_wgpu(texture: wgpu::Texture) -> Self {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            inner: TextureInner::Real { texture, view },
        }
    }

    #[cfg(feature = "mock")]
    pub fn mock(id: usize, format: wgpu::TextureFormat) -> Self {
        Self {
            inner: TextureInner::Mock { id, format },
        }
    }

    /// # Panics
    /// Panics on a mock texture.
    pub fn as_wgpu(&self) -> &wgpu::Texture {
        match &self.inner {
            TextureInner::Real { texture, .. } => texture,
            #[cfg(feature = "mock")]
            TextureInner::Mock { id, .. } => panic!("mock texture {id} has no wgpu object"),
        }
    }

    /// # Panics
    /// Panics on a mock texture.
    pub fn view(&self) -> &wgpu::TextureView {
        match &self.inner {
            TextureInner::Real { view, .. } => view,
            #[cfg(feature = "mock")]
            TextureInner::Mock { id, .. } => panic!("mock texture {id} has no view"),
        }
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        match &self.inner {
            TextureInner::Real { texture, .. } => texture.format(),
            #[cfg(feature = "mock")]
            TextureInner::Mock { format, .. } => *format,
        }
    }

    #[cfg(feature = "mock")]
    pub fn mock_id(&self) -> Option<usize> {
        match &self.inner {
            TextureInner::Mock { id, .. } => Some(*id),
            TextureInner::Real { .. } => None,
        }
    }
}
