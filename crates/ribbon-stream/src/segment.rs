//! A single fixed-capacity texture holding a contiguous run of sample slots.

use std::ops::Range;

use ribbon_core::profiling::profile_function;
use ribbon_test_utils::{
    BindGroupSpec, BindingSpec, DrawPass, GpuBindGroup, GpuBindGroupLayout, GpuTexture,
    RenderContext,
};

use crate::{
    RenderError, RenderResult,
    layout::SegmentLayout,
    record::{Record, RecordEncoder},
    style::SeriesStyle,
};

/// Texel format of segment textures: one `[f32; 4]` record per texel.
pub const SEGMENT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

/// Everything needed to create segments.
#[derive(Clone, Copy)]
pub struct SegmentAllocator<'a> {
    pub gpu: &'a dyn RenderContext,
    /// Layout of bind group 2 (the record texture).
    pub bind_group_layout: &'a GpuBindGroupLayout,
    /// Check creation inside a validation error scope.
    pub debug: bool,
}

/// One GPU segment.
///
/// Owned by exactly one window. The texture is released with
/// [`Segment::release`] when the window evicts the segment.
#[derive(Debug)]
pub struct Segment {
    texture: GpuTexture,
    bind_group: GpuBindGroup,
    layout: SegmentLayout,
}

impl Segment {
    pub fn new(alloc: &SegmentAllocator, layout: SegmentLayout) -> RenderResult<Self> {
        profile_function!();
        let gpu = alloc.gpu;

        let max = gpu.max_texture_dimension_2d();
        if layout.width() > max || layout.height() > max {
            return Err(RenderError::ResourceCreation {
                resource: "segment texture",
                message: format!(
                    "{}x{} exceeds the device limit of {max}",
                    layout.width(),
                    layout.height()
                ),
            });
        }

        if alloc.debug {
            gpu.push_error_scope(wgpu::ErrorFilter::Validation);
        }

        let texture = gpu.create_texture(&wgpu::TextureDescriptor {
            label: Some("Ribbon Segment Texture"),
            size: wgpu::Extent3d {
                width: layout.width(),
                height: layout.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SEGMENT_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let bind_group = gpu.create_bind_group(&BindGroupSpec {
            label: Some("Ribbon Segment Bind Group"),
            layout: alloc.bind_group_layout,
            entries: &[BindingSpec::Texture(&texture)],
        });

        if alloc.debug
            && let Some(message) = gpu.pop_error_scope()
        {
            gpu.destroy_texture(&texture);
            return Err(RenderError::ResourceCreation {
                resource: "segment texture",
                message,
            });
        }

        Ok(Self {
            texture,
            bind_group,
            layout,
        })
    }

    pub fn layout(&self) -> SegmentLayout {
        self.layout
    }

    pub fn texture(&self) -> &GpuTexture {
        &self.texture
    }

    pub fn bind_group(&self) -> &GpuBindGroup {
        &self.bind_group
    }

    /// Re-encode `count` slots starting at local slot `dest_offset`.
    ///
    /// Slot `dest_offset + i` receives sequence index `source_start + i`.
    /// Slots past the end of the segment are ignored. Returns the number of
    /// texels uploaded.
    pub fn encode(
        &self,
        gpu: &dyn RenderContext,
        encoder: &RecordEncoder,
        source_start: isize,
        count: usize,
        dest_offset: usize,
    ) -> usize {
        profile_function!();
        let end = (dest_offset + count).min(self.layout.point_capacity());
        if dest_offset >= end {
            return 0;
        }

        let mut records: Vec<Record> =
            Vec::with_capacity((end - dest_offset) * self.layout.records_per_sample());
        for i in 0..(end - dest_offset) {
            encoder.encode_into(source_start + i as isize, &mut records);
        }

        for (region, range) in self.layout.upload_regions(dest_offset..end) {
            gpu.write_texture(&self.texture, region, bytemuck::cast_slice(&records[range]));
        }

        tracing::trace!(
            slots = end - dest_offset,
            dest_offset,
            source_start,
            "Encoded segment slots"
        );
        records.len()
    }

    /// Draw local intervals `[start, end)`, clipped to this segment.
    ///
    /// Returns whether a draw call was issued.
    pub fn draw(&self, pass: &mut dyn DrawPass, style: SeriesStyle, start: isize, end: isize) -> bool {
        let Some(vertices) =
            segment_vertex_range(style, self.layout.interval_capacity(), start, end)
        else {
            return false;
        };

        pass.set_bind_group(2, &self.bind_group);
        pass.draw(vertices);
        true
    }

    /// Destroy the texture.
    pub fn release(self, gpu: &dyn RenderContext) {
        gpu.destroy_texture(&self.texture);
    }
}

/// Vertex range that draws intervals `[start, end)` of a segment with
/// `interval_capacity` intervals, or `None` when nothing is visible.
///
/// An `end` beyond the capacity means the next segment continues the data, so
/// the seam join is drawn here.
pub fn segment_vertex_range(
    style: SeriesStyle,
    interval_capacity: usize,
    start: isize,
    end: isize,
) -> Option<Range<u32>> {
    let cap = interval_capacity as isize;
    let first = start.max(0);
    let last = end.min(cap);
    if first >= last {
        return None;
    }

    let right_clipped = end > cap;
    let count = (last - first) as u32;
    let first = first as u32;
    let seam = if right_clipped { 2 } else { 0 };

    let (v0, n) = match style {
        SeriesStyle::Line => (4 * first, 4 * count + seam),
        SeriesStyle::Step => {
            // The riser into the first interval belongs to the previous one.
            let lookback = if first > 0 { 2 } else { 0 };
            (4 * first - lookback, 4 * count + lookback + seam)
        }
        SeriesStyle::Bar => {
            let left = u32::from(first > 0);
            let right = u32::from(!right_clipped);
            (6 * (first - left), 6 * (count + left + right))
        }
        SeriesStyle::NativeLine | SeriesStyle::NativePoint => (first, count + 1),
    };

    Some(v0..v0 + n)
}
