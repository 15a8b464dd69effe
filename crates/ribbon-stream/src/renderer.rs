//! Per-frame orchestration of every series.

use std::sync::Arc;

use ribbon_core::alloc::IndexMap;
use ribbon_core::profiling::{profile_function, profile_scope};
use ribbon_test_utils::{
    BindGroupSpec, BindingSpec, DrawPass, GpuBindGroup, GpuBuffer, RenderContext,
};

use crate::{
    RenderError, RenderResult,
    config::RendererConfig,
    layout::SegmentLayout,
    program::Programs,
    scale::{LinearScale, Scale},
    segment::SegmentAllocator,
    sequence::{SampleBuffer, SampleSequence},
    style::{SeriesColor, SeriesConfig},
    transform::{FrameUniform, SeriesUniform, visible_domain},
    window::{SegmentWindow, SyncSource, WindowStats},
};

/// Handle to a series owned by a [`Renderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId(u64);

/// Notifications the renderer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererEvent {
    /// One or more sequences were mutated; resync before the next draw.
    DataChanged,
    /// The render target changed size.
    Resized { width: u32, height: u32 },
}

bitflags::bitflags! {
    /// What changed since the last rendered frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RendererDirtyFlags: u8 {
        const DATA_CHANGED = 0b0000_0001;
        const RESIZED = 0b0000_0010;
        /// Scales, series styles or colors changed.
        const STYLE_CHANGED = 0b0000_0100;
    }
}

/// Draw statistics of one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub series_drawn: usize,
    pub draw_calls: usize,
}

/// Snapshot of the renderer's GPU state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererStats {
    pub series: usize,
    pub segments: usize,
    pub samples: usize,
    pub texels_uploaded: u64,
    pub segments_allocated: u64,
    pub segments_released: u64,
    pub rebuilds: u64,
    pub frames: u64,
    pub last_frame: FrameStats,
}

struct SeriesEntry<S> {
    data: S,
    config: SeriesConfig,
    window: SegmentWindow,
    uniform: GpuBuffer,
    bind_group: GpuBindGroup,
}

/// Streaming renderer for any number of series sharing one pair of scales.
///
/// ```no_run
/// use std::sync::Arc;
/// use ribbon_render::GraphicsContext;
/// use ribbon_stream::{Renderer, RendererConfig, Sample, SampleBuffer, SeriesConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let context = GraphicsContext::new_owned_sync()?;
/// let mut renderer = Renderer::new(context, RendererConfig::default())?;
/// let id = renderer.add_series(SeriesConfig::default(), SampleBuffer::with_max_len(10_000))?;
///
/// if let Some(data) = renderer.series_data_mut(id) {
///     data.push_back(Sample::new(0.0, 1.0));
///     data.push_back(Sample::new(1.0, 2.0));
/// }
/// renderer.sync_buffers()?;
/// # Ok(())
/// # }
/// ```
pub struct Renderer<S: SampleSequence = SampleBuffer> {
    gpu: Arc<dyn RenderContext>,
    config: RendererConfig,
    programs: Programs,
    frame_buffer: GpuBuffer,
    frame_bind_group: GpuBindGroup,
    series: IndexMap<SeriesId, SeriesEntry<S>>,
    next_id: u64,
    x_scale: Box<dyn Scale>,
    y_scale: Box<dyn Scale>,
    width: u32,
    height: u32,
    dirty: RendererDirtyFlags,
    frames: u64,
    last_frame: FrameStats,
}

impl<S: SampleSequence> Renderer<S> {
    pub fn new(gpu: Arc<dyn RenderContext>, config: RendererConfig) -> RenderResult<Self> {
        profile_function!();
        config.validate()?;

        let programs = Programs::new(gpu.as_ref(), config.target_format, config.debug)?;

        let frame_buffer = gpu.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Ribbon Frame Uniform Buffer"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = gpu.create_bind_group(&BindGroupSpec {
            label: Some("Ribbon Frame Bind Group"),
            layout: programs.frame_layout(),
            entries: &[BindingSpec::Buffer(&frame_buffer)],
        });

        tracing::info!(
            texture_width = config.texture_width,
            texture_height = config.texture_height,
            debug = config.debug,
            "Created streaming renderer"
        );

        Ok(Self {
            gpu,
            config,
            programs,
            frame_buffer,
            frame_bind_group,
            series: IndexMap::default(),
            next_id: 0,
            x_scale: Box::new(LinearScale::default()),
            y_scale: Box::new(LinearScale::default()),
            width: 1,
            height: 1,
            dirty: RendererDirtyFlags::all(),
            frames: 0,
            last_frame: FrameStats::default(),
        })
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Register a series. Its window is created on the next sync once the
    /// sequence holds at least two samples.
    pub fn add_series(&mut self, config: SeriesConfig, data: S) -> RenderResult<SeriesId> {
        let layout = self.segment_layout(&config)?;

        let uniform = self.gpu.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Ribbon Series Uniform Buffer"),
            size: std::mem::size_of::<SeriesUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = self.gpu.create_bind_group(&BindGroupSpec {
            label: Some("Ribbon Series Bind Group"),
            layout: self.programs.series_layout(),
            entries: &[BindingSpec::Buffer(&uniform)],
        });

        let id = SeriesId(self.next_id);
        self.next_id += 1;
        tracing::debug!(?id, style = ?config.style, "Added series");

        self.series.insert(
            id,
            SeriesEntry {
                data,
                config,
                window: SegmentWindow::new(layout),
                uniform,
                bind_group,
            },
        );
        self.dirty |= RendererDirtyFlags::DATA_CHANGED;
        Ok(id)
    }

    /// Remove a series, releasing its segments, and hand back its data.
    pub fn remove_series(&mut self, id: SeriesId) -> RenderResult<S> {
        let mut entry = self
            .series
            .shift_remove(&id)
            .ok_or(RenderError::UnknownSeries(id))?;
        entry.window.teardown(self.gpu.as_ref());
        tracing::debug!(?id, "Removed series");
        self.dirty |= RendererDirtyFlags::DATA_CHANGED;
        Ok(entry.data)
    }

    pub fn series_ids(&self) -> impl Iterator<Item = SeriesId> + '_ {
        self.series.keys().copied()
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn series_data(&self, id: SeriesId) -> Option<&S> {
        self.series.get(&id).map(|entry| &entry.data)
    }

    /// Mutable access to a series' sequence. Marks data as changed.
    pub fn series_data_mut(&mut self, id: SeriesId) -> Option<&mut S> {
        let entry = self.series.get_mut(&id)?;
        self.dirty |= RendererDirtyFlags::DATA_CHANGED;
        Some(&mut entry.data)
    }

    pub fn series_config(&self, id: SeriesId) -> Option<&SeriesConfig> {
        self.series.get(&id).map(|entry| &entry.config)
    }

    /// Replace a series' configuration.
    ///
    /// Width, step fraction, visibility and solid colors only touch the
    /// series uniform. A new style or a colormap re-encodes the whole series
    /// on the next sync.
    pub fn set_series_config(&mut self, id: SeriesId, config: SeriesConfig) -> RenderResult<()> {
        let layout = self.segment_layout(&config)?;
        let gpu = self.gpu.as_ref();
        let entry = self
            .series
            .get_mut(&id)
            .ok_or(RenderError::UnknownSeries(id))?;

        let solid_both = matches!(
            (&entry.config.color, &config.color),
            (SeriesColor::Solid(_), SeriesColor::Solid(_))
        );
        if config.style != entry.config.style || !solid_both {
            entry.window.teardown(gpu);
            entry.window = SegmentWindow::new(layout);
            tracing::debug!(?id, style = ?config.style, "Series re-encoding scheduled");
        }
        entry.config = config;
        self.dirty |= RendererDirtyFlags::STYLE_CHANGED;
        Ok(())
    }

    /// Replace both scales.
    pub fn set_scales(&mut self, x: impl Scale + 'static, y: impl Scale + 'static) {
        self.x_scale = Box::new(x);
        self.y_scale = Box::new(y);
        self.dirty |= RendererDirtyFlags::STYLE_CHANGED;
    }

    pub fn x_scale(&self) -> &dyn Scale {
        self.x_scale.as_ref()
    }

    pub fn y_scale(&self) -> &dyn Scale {
        self.y_scale.as_ref()
    }

    /// Render target size in pixels.
    pub fn viewport_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn handle_event(&mut self, event: RendererEvent) {
        match event {
            RendererEvent::DataChanged => self.dirty |= RendererDirtyFlags::DATA_CHANGED,
            RendererEvent::Resized { width, height } => {
                self.width = width.max(1);
                self.height = height.max(1);
                self.dirty |= RendererDirtyFlags::RESIZED;
                tracing::trace!(width, height, "Viewport resized");
            }
        }
    }

    pub fn dirty_flags(&self) -> RendererDirtyFlags {
        self.dirty
    }

    /// Whether anything changed since the last frame.
    pub fn needs_redraw(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Apply every sequence's pending deltas to its window and reset them.
    ///
    /// A window that fails to sync is torn down before the error is
    /// returned, so the next sync rebuilds it from scratch.
    pub fn sync_buffers(&mut self) -> RenderResult<()> {
        profile_function!();
        let alloc = SegmentAllocator {
            gpu: self.gpu.as_ref(),
            bind_group_layout: self.programs.segment_layout(),
            debug: self.config.debug,
        };

        for (id, entry) in self.series.iter_mut() {
            profile_scope!("sync_series");
            let source = SyncSource {
                samples: &entry.data,
                style: entry.config.style,
                color: &entry.config.color,
            };
            if let Err(err) = entry.window.sync(&alloc, &source) {
                tracing::error!(?id, %err, "Failed to sync series");
                entry.window.teardown(alloc.gpu);
                return Err(err);
            }
            entry.data.reset_deltas();
        }

        self.dirty.remove(RendererDirtyFlags::DATA_CHANGED);
        Ok(())
    }

    /// Sync and draw every visible series into `pass`.
    pub fn render(&mut self, pass: &mut dyn DrawPass) -> RenderResult<FrameStats> {
        profile_function!();
        if self.config.debug {
            self.gpu.push_error_scope(wgpu::ErrorFilter::Validation);
        }

        let result = self.render_series(pass);

        if self.config.debug
            && let Some(message) = self.gpu.pop_error_scope()
        {
            tracing::error!(%message, "GPU error during frame");
            return Err(RenderError::Gpu(message));
        }

        let stats = result?;
        self.frames += 1;
        self.last_frame = stats;
        self.dirty = RendererDirtyFlags::empty();
        Ok(stats)
    }

    fn render_series(&mut self, pass: &mut dyn DrawPass) -> RenderResult<FrameStats> {
        self.sync_buffers()?;

        let width = self.width as f32;
        let height = self.height as f32;
        let padding = self.config.padding;
        let frame = FrameUniform::for_frame(
            self.x_scale.as_ref(),
            self.y_scale.as_ref(),
            width,
            height,
            padding,
        );
        self.gpu
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));

        let (min, max) = visible_domain(self.x_scale.as_ref(), width, padding);
        let mut stats = FrameStats::default();

        for entry in self.series.values() {
            if !entry.config.visible || entry.window.segment_count() == 0 {
                continue;
            }
            let style = entry.config.style;
            let uniform = SeriesUniform::new(
                &entry.config,
                entry.window.origin(),
                self.x_scale.as_ref(),
                entry.window.layout().width(),
            );
            self.gpu
                .write_buffer(&entry.uniform, 0, bytemuck::bytes_of(&uniform));

            pass.push_debug_group("Ribbon Series");
            pass.set_pipeline(self.programs.pipeline_for(style));
            pass.set_bind_group(0, &self.frame_bind_group);
            pass.set_bind_group(1, &entry.bind_group);
            let draws = entry.window.draw(pass, &entry.data, style, min, max);
            pass.pop_debug_group();

            stats.series_drawn += 1;
            stats.draw_calls += draws;
        }

        tracing::trace!(
            series = stats.series_drawn,
            draw_calls = stats.draw_calls,
            min,
            max,
            "Rendered frame"
        );
        Ok(stats)
    }

    pub fn window_stats(&self, id: SeriesId) -> Option<WindowStats> {
        self.series.get(&id).map(|entry| entry.window.stats())
    }

    pub fn stats(&self) -> RendererStats {
        let mut stats = RendererStats {
            series: self.series.len(),
            frames: self.frames,
            last_frame: self.last_frame,
            ..Default::default()
        };
        for entry in self.series.values() {
            let window = entry.window.stats();
            stats.segments += window.segments;
            stats.samples += window.samples;
            stats.texels_uploaded += window.texels_uploaded;
            stats.segments_allocated += window.segments_allocated;
            stats.segments_released += window.segments_released;
            stats.rebuilds += window.rebuilds;
        }
        stats
    }

    fn segment_layout(&self, config: &SeriesConfig) -> RenderResult<SegmentLayout> {
        SegmentLayout::new(
            self.config.texture_width,
            self.config.texture_height,
            config.style,
        )
    }
}

impl<S: SampleSequence> Drop for Renderer<S> {
    fn drop(&mut self) {
        for entry in self.series.values_mut() {
            entry.window.teardown(self.gpu.as_ref());
        }
    }
}
