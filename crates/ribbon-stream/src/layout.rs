//! Slot-to-texel addressing inside a segment texture.

use std::ops::Range;

use ribbon_test_utils::TextureRegion;

use crate::{RenderError, RenderResult, style::SeriesStyle};

/// Geometry of one segment texture for a given style.
///
/// A segment stores `point_capacity` slots. Consecutive segments overlap by
/// two slots, so each one contributes `interval_capacity = point_capacity - 2`
/// intervals to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentLayout {
    width: u32,
    height: u32,
    records_per_sample: usize,
}

impl SegmentLayout {
    pub fn new(width: u32, height: u32, style: SeriesStyle) -> RenderResult<Self> {
        let layout = Self {
            width,
            height,
            records_per_sample: style.records_per_sample(),
        };
        if width as usize % layout.records_per_sample != 0 {
            return Err(RenderError::InvalidConfig(format!(
                "texture width {width} cannot hold whole {:?} samples",
                style
            )));
        }
        if layout.point_capacity() < 3 {
            return Err(RenderError::InvalidConfig(format!(
                "a {width}x{height} texture holds fewer than 3 {:?} samples",
                style
            )));
        }
        Ok(layout)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn records_per_sample(&self) -> usize {
        self.records_per_sample
    }

    /// Number of sample slots in one segment.
    pub fn point_capacity(&self) -> usize {
        self.width as usize * self.height as usize / self.records_per_sample
    }

    /// Number of intervals one segment is responsible for drawing.
    pub fn interval_capacity(&self) -> usize {
        self.point_capacity() - 2
    }

    /// Split the records of `slots` into at most three row-aligned rectangles.
    ///
    /// Each entry pairs a texture region with the range of record indices,
    /// relative to the first slot, whose data fills it.
    pub fn upload_regions(&self, slots: Range<usize>) -> Vec<(TextureRegion, Range<usize>)> {
        let w = self.width as usize;
        let t0 = slots.start * self.records_per_sample;
        let t1 = slots.end * self.records_per_sample;
        let mut regions = Vec::with_capacity(3);
        let mut t = t0;

        let row = |t: usize, len: usize, rows: usize| {
            TextureRegion::new((t % w) as u32, (t / w) as u32, len as u32, rows as u32)
        };

        if t < t1 && t % w != 0 {
            let end = t1.min((t / w + 1) * w);
            regions.push((row(t, end - t, 1), t - t0..end - t0));
            t = end;
        }

        let full_rows = (t1 - t) / w;
        if full_rows > 0 {
            let end = t + full_rows * w;
            regions.push((row(t, w, full_rows), t - t0..end - t0));
            t = end;
        }

        if t < t1 {
            regions.push((row(t, t1 - t, 1), t - t0..t1 - t0));
        }

        regions
    }
}
