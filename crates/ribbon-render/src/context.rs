use std::sync::Arc;

use crate::GraphicsError;

/// Device and queue shared between the streaming renderer and its host.
///
/// Handed out as `Arc<Self>`; the renderer takes it as
/// `Arc<dyn RenderContext>`:
///
/// ```rust,no_run
/// use ribbon_render::GraphicsContext;
///
/// let ctx = GraphicsContext::new_owned_sync().expect("no GPU");
/// println!("segments may be up to {} texels wide", ctx.limits().max_texture_dimension_2d);
/// ```
pub struct GraphicsContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GraphicsContext {
    pub async fn new_owned() -> Result<Arc<Self>, GraphicsError> {
        Self::new_owned_with_descriptor(GraphicsContextDescriptor::default()).await
    }

    /// Blocks the current thread until the device is ready.
    pub fn new_owned_sync() -> Result<Arc<Self>, GraphicsError> {
        pollster::block_on(Self::new_owned())
    }

    pub async fn new_owned_with_descriptor(
        descriptor: GraphicsContextDescriptor,
    ) -> Result<Arc<Self>, GraphicsError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: descriptor.backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: descriptor.power_preference,
                compatible_surface: None,
                force_fallback_adapter: descriptor.force_fallback_adapter,
            })
            .await?;

        let required_limits = descriptor.required_limits(&adapter.limits());
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits,
                label: descriptor.label,
                ..Default::default()
            })
            .await?;

        let info = adapter.get_info();
        tracing::info!(
            adapter = %info.name,
            backend = ?info.backend,
            max_texture_dimension = device.limits().max_texture_dimension_2d,
            "Created graphics context"
        );

        Ok(Arc::new(Self {
            instance,
            adapter,
            device,
            queue,
        }))
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn limits(&self) -> wgpu::Limits {
        self.device.limits()
    }
}

/// Adapter and device selection.
///
/// Device limits start from the downlevel defaults; the 2D texture dimension
/// is raised to whatever the adapter supports, since it bounds the segment
/// texture size.
pub struct GraphicsContextDescriptor {
    pub backends: wgpu::Backends,
    pub power_preference: wgpu::PowerPreference,
    /// Use the software adapter (headless CI machines).
    pub force_fallback_adapter: bool,
    /// Cap on the 2D texture dimension; `None` takes the adapter's maximum.
    pub max_texture_dimension: Option<u32>,
    pub label: Option<&'static str>,
}

impl Default for GraphicsContextDescriptor {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            max_texture_dimension: None,
            label: Some("Ribbon Device"),
        }
    }
}

impl GraphicsContextDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn power_preference(mut self, preference: wgpu::PowerPreference) -> Self {
        self.power_preference = preference;
        self
    }

    pub fn backends(mut self, backends: wgpu::Backends) -> Self {
        self.backends = backends;
        self
    }

    pub fn force_fallback_adapter(mut self, force: bool) -> Self {
        self.force_fallback_adapter = force;
        self
    }

    pub fn max_texture_dimension(mut self, dimension: u32) -> Self {
        self.max_texture_dimension = Some(dimension);
        self
    }

    fn required_limits(&self, adapter: &wgpu::Limits) -> wgpu::Limits {
        let supported = adapter.max_texture_dimension_2d;
        let dimension = self
            .max_texture_dimension
            .map_or(supported, |cap| cap.min(supported));
        wgpu::Limits {
            max_texture_dimension_2d: dimension,
            ..wgpu::Limits::downlevel_defaults()
        }
    }
}
