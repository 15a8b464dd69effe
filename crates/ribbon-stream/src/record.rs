//! Conversion of samples into the four-float texel records the shaders read.
//!
//! Record layout: `[x - origin, y, opacity, packed_rgb]`. `packed_rgb` is
//! `-1.0` when the series color should be used.

use std::ops::Range;

use crate::{
    sample::Sample,
    sequence::SampleSequence,
    style::{SeriesColor, SeriesStyle},
};

pub type Record = [f32; 4];

/// Marker in the color channel meaning "use the series color".
pub const NO_RECORD_COLOR: f32 = -1.0;

/// Corner offsets of a bar's two triangles relative to `(x, y)`.
///
/// `dx` is in data units; `dy` runs from `-0.5` (baseline) to `0.5` (value).
pub fn bar_vertex_offsets(sample: &Sample) -> [(f32, f32); 6] {
    let (l, r) = (-sample.lb, sample.rb);
    [
        (l, -0.5),
        (l, 0.5),
        (r, 0.5),
        (r, 0.5),
        (l, -0.5),
        (r, -0.5),
    ]
}

/// Encodes samples of one sequence for one series.
pub struct RecordEncoder<'a> {
    samples: &'a dyn SampleSequence,
    style: SeriesStyle,
    color: &'a SeriesColor,
    origin: f64,
    /// Sequence indices currently represented; others are padding.
    live: Range<usize>,
}

impl<'a> RecordEncoder<'a> {
    pub fn new(
        samples: &'a dyn SampleSequence,
        style: SeriesStyle,
        color: &'a SeriesColor,
        origin: f64,
        live: Range<usize>,
    ) -> Self {
        Self {
            samples,
            style,
            color,
            origin,
            live,
        }
    }

    pub fn style(&self) -> SeriesStyle {
        self.style
    }

    /// Append the records of sequence index `index` to `out`.
    ///
    /// Indices outside the live range encode the nearest live sample; for
    /// styles that would draw the duplicate it is made transparent.
    pub fn encode_into(&self, index: isize, out: &mut Vec<Record>) {
        if self.live.is_empty() {
            out.extend(std::iter::repeat_n([0.0; 4], self.style.records_per_sample()));
            return;
        }

        let first = self.live.start as isize;
        let last = self.live.end as isize - 1;
        let clamped = index.clamp(first, last);
        let padding = clamped != index;

        let Some(sample) = self.samples.get(clamped as usize) else {
            out.extend(std::iter::repeat_n([0.0; 4], self.style.records_per_sample()));
            return;
        };

        let (mut opacity, packed) = self.channels(&sample);
        if padding && self.style.hides_padding() {
            opacity = 0.0;
        }

        let x = (sample.x - self.origin) as f32;
        match self.style {
            SeriesStyle::Bar => {
                for (dx, dy) in bar_vertex_offsets(&sample) {
                    let y = sample.y as f32 * (dy + 0.5);
                    out.push([x + dx, y, opacity, packed]);
                }
            }
            _ => out.push([x, sample.y as f32, opacity, packed]),
        }
    }

    fn channels(&self, sample: &Sample) -> (f32, f32) {
        match (self.color, sample.a) {
            (_, None) => (0.0, NO_RECORD_COLOR),
            (SeriesColor::Solid(_), Some(a)) => (a, NO_RECORD_COLOR),
            (SeriesColor::Colormap(map), Some(a)) => (1.0, map(a).to_packed_rgb() as f32),
        }
    }
}
