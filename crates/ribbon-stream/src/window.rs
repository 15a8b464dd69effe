//! Sliding window of GPU segments over a sample sequence.
//!
//! # Slot model
//!
//! Segment `k` covers absolute slots `[k * I, k * I + P)` where `P` is the
//! point capacity and `I = P - 2`, so neighbours share two slots. Sample `i`
//! lives at absolute slot `valid_start + i`; the slot before the first sample
//! and the slot after the last one hold padding copies. Every slot is written
//! into each segment that contains it, which keeps the shared slots of
//! neighbouring segments identical.
//!
//! ```text
//! segment 0: [pad s0 s1 s2 s3 s4 | s5 s6]
//! segment 1:                      [s5 s6 s7 pad  .  . | .  .]
//!                ^ valid_start = 1           ^ valid_end = 3
//! ```

use std::collections::VecDeque;

use ribbon_core::profiling::{profile_function, profile_scope};
use ribbon_test_utils::{DrawPass, RenderContext};

use crate::{
    RenderResult,
    layout::SegmentLayout,
    record::RecordEncoder,
    segment::{Segment, SegmentAllocator},
    sequence::{SampleSequence, partition_point},
    style::{SeriesColor, SeriesStyle},
};

/// The series data and appearance a window encodes from.
#[derive(Clone, Copy)]
pub struct SyncSource<'a> {
    pub samples: &'a dyn SampleSequence,
    pub style: SeriesStyle,
    pub color: &'a SeriesColor,
}

/// Counters describing a window's GPU activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowStats {
    /// Segments currently alive.
    pub segments: usize,
    /// Samples currently represented.
    pub samples: usize,
    /// Texels uploaded since creation.
    pub texels_uploaded: u64,
    pub segments_allocated: u64,
    pub segments_released: u64,
    /// Full rebuilds performed.
    pub rebuilds: u64,
}

/// An ordered set of segments representing one series on the GPU.
#[derive(Debug)]
pub struct SegmentWindow {
    layout: SegmentLayout,
    segments: VecDeque<Segment>,
    /// Local slot of the first sample in the first segment, `1..=I`.
    valid_start: usize,
    /// Local slot of the last sample in the last segment, `1..=I`.
    valid_end: usize,
    /// Samples represented.
    len: usize,
    /// Subtracted from every `x` before it is narrowed to `f32`.
    origin: f64,
    /// Front samples of the sequence not yet represented during a sync.
    pending_front: usize,
    stats: WindowStats,
}

impl SegmentWindow {
    pub fn new(layout: SegmentLayout) -> Self {
        Self {
            layout,
            segments: VecDeque::new(),
            valid_start: 1,
            valid_end: 0,
            len: 0,
            origin: 0.0,
            pending_front: 0,
            stats: WindowStats::default(),
        }
    }

    pub fn layout(&self) -> SegmentLayout {
        self.layout
    }

    pub fn segments(&self) -> impl ExactSizeIterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn valid_start(&self) -> usize {
        self.valid_start
    }

    pub fn valid_end(&self) -> usize {
        self.valid_end
    }

    /// Number of samples represented on the GPU.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn origin(&self) -> f64 {
        self.origin
    }

    pub fn stats(&self) -> WindowStats {
        WindowStats {
            segments: self.segments.len(),
            samples: self.len,
            ..self.stats
        }
    }

    /// Every `(segment index, local slot)` that holds sample `index`.
    pub fn slot_locations(&self, index: usize) -> Vec<(usize, usize)> {
        if index >= self.len {
            return Vec::new();
        }
        self.locate(self.valid_start + index)
    }

    fn locate(&self, abs: usize) -> Vec<(usize, usize)> {
        let i = self.layout.interval_capacity();
        let p = self.layout.point_capacity();
        (abs.saturating_sub(p - 1) / i..=abs / i)
            .filter(|&k| k < self.segments.len() && abs >= k * i && abs < k * i + p)
            .map(|k| (k, abs - k * i))
            .collect()
    }

    /// Bring the window in line with the sequence's recorded deltas.
    ///
    /// Applies evict-front, evict-back, push-front, push-back in that order.
    /// Falls back to a full rebuild when fewer than two samples survive the
    /// evictions or the deltas do not add up to the sequence length. Does not
    /// reset the sequence's counters.
    pub fn sync(&mut self, alloc: &SegmentAllocator, source: &SyncSource) -> RenderResult<()> {
        profile_function!();
        let deltas = source.samples.deltas();
        let total = source.samples.len();

        if deltas.is_empty() && (self.len == total || (self.segments.is_empty() && total < 2)) {
            return Ok(());
        }

        let kept = self.len as isize - deltas.evicted() as isize;
        let consistent = kept >= 0 && kept as usize + deltas.pushed() == total;
        if !consistent && !self.segments.is_empty() {
            tracing::warn!(
                represented = self.len,
                total,
                ?deltas,
                "Sequence deltas do not match the window, rebuilding"
            );
        }

        if self.segments.is_empty() || !consistent || kept < 2 {
            return self.rebuild(alloc, source);
        }

        self.pending_front = deltas.pushed_front;
        self.pop_front(alloc.gpu, source, deltas.evicted_front);
        self.pop_back(alloc.gpu, source, deltas.evicted_back);
        self.push_front(alloc, source, deltas.pushed_front)?;
        self.push_back(alloc, source, deltas.pushed_back)?;
        debug_assert_eq!(self.pending_front, 0);
        debug_assert_eq!(self.len, total);
        Ok(())
    }

    /// Release every segment.
    pub fn teardown(&mut self, gpu: &dyn RenderContext) {
        if !self.segments.is_empty() {
            tracing::debug!(segments = self.segments.len(), "Tearing down segment window");
        }
        for segment in self.segments.drain(..) {
            segment.release(gpu);
            self.stats.segments_released += 1;
        }
        self.valid_start = 1;
        self.valid_end = 0;
        self.len = 0;
        self.pending_front = 0;
    }

    fn rebuild(&mut self, alloc: &SegmentAllocator, source: &SyncSource) -> RenderResult<()> {
        profile_scope!("rebuild");
        self.teardown(alloc.gpu);

        let total = source.samples.len();
        if total < 2 {
            return Ok(());
        }

        self.origin = source.samples.get(0).map_or(0.0, |s| s.x);
        self.pending_front = 0;
        self.push_back(alloc, source, total)?;
        self.stats.rebuilds += 1;
        tracing::debug!(
            samples = total,
            segments = self.segments.len(),
            "Rebuilt segment window"
        );
        Ok(())
    }

    fn encoder<'a>(&self, source: &SyncSource<'a>) -> RecordEncoder<'a> {
        RecordEncoder::new(
            source.samples,
            source.style,
            source.color,
            self.origin,
            self.pending_front..self.pending_front + self.len,
        )
    }

    /// Encode absolute slots `[lo, hi)` into every segment containing them.
    fn encode_abs(&mut self, gpu: &dyn RenderContext, source: &SyncSource, lo: usize, hi: usize) {
        if lo >= hi {
            return;
        }
        let encoder = self.encoder(source);
        let i = self.layout.interval_capacity();
        let p = self.layout.point_capacity();

        let mut texels = 0;
        let first = lo.saturating_sub(p - 1) / i;
        let last = ((hi - 1) / i).min(self.segments.len().saturating_sub(1));
        for k in first..=last {
            let Some(segment) = self.segments.get(k) else {
                break;
            };
            let a = lo.max(k * i);
            let b = hi.min(k * i + p);
            if a >= b {
                continue;
            }
            let source_start = a as isize - self.valid_start as isize + self.pending_front as isize;
            texels += segment.encode(gpu, &encoder, source_start, b - a, a - k * i);
        }
        self.stats.texels_uploaded += texels as u64;
    }

    fn allocate(&mut self, alloc: &SegmentAllocator) -> RenderResult<Segment> {
        let segment = Segment::new(alloc, self.layout)?;
        self.stats.segments_allocated += 1;
        tracing::debug!(
            width = self.layout.width(),
            height = self.layout.height(),
            "Allocated segment"
        );
        Ok(segment)
    }

    fn pop_front(&mut self, gpu: &dyn RenderContext, source: &SyncSource, count: usize) {
        if count == 0 {
            return;
        }
        let i = self.layout.interval_capacity();
        self.valid_start += count;
        self.len -= count;
        while self.valid_start > i {
            if let Some(segment) = self.segments.pop_front() {
                segment.release(gpu);
                self.stats.segments_released += 1;
            }
            self.valid_start -= i;
        }
        self.encode_abs(gpu, source, self.valid_start - 1, self.valid_start);
    }

    fn pop_back(&mut self, gpu: &dyn RenderContext, source: &SyncSource, count: usize) {
        if count == 0 {
            return;
        }
        let i = self.layout.interval_capacity() as isize;
        let mut end = self.valid_end as isize - count as isize;
        self.len -= count;
        while end < 1 {
            if let Some(segment) = self.segments.pop_back() {
                segment.release(gpu);
                self.stats.segments_released += 1;
            }
            end += i;
        }
        self.valid_end = end as usize;
        let pad = self.valid_start + self.len;
        self.encode_abs(gpu, source, pad, pad + 1);
    }

    fn push_front(
        &mut self,
        alloc: &SegmentAllocator,
        source: &SyncSource,
        count: usize,
    ) -> RenderResult<()> {
        if count == 0 {
            return Ok(());
        }
        let i = self.layout.interval_capacity();
        if self.segments.is_empty() {
            let segment = self.allocate(alloc)?;
            self.segments.push_back(segment);
            self.valid_start = i + 1;
            self.valid_end = i;
            self.len = 0;
        }
        let was_empty = self.len == 0;

        let mut added = 0;
        while self.valid_start <= count {
            let segment = self.allocate(alloc)?;
            self.segments.push_front(segment);
            self.valid_start += i;
            added += 1;
        }
        self.valid_start -= count;
        self.len += count;
        self.pending_front -= count;

        // New front segments also hold the first slots of the old front one.
        let mut hi = self.valid_start + count;
        if added > 0 {
            let last_new_end = (added - 1) * i + self.layout.point_capacity();
            hi = hi.max(last_new_end.min(self.valid_start + self.len + 1));
        }
        self.encode_abs(alloc.gpu, source, self.valid_start - 1, hi);
        if was_empty {
            let pad = self.valid_start + self.len;
            self.encode_abs(alloc.gpu, source, pad, pad + 1);
        }
        Ok(())
    }

    fn push_back(
        &mut self,
        alloc: &SegmentAllocator,
        source: &SyncSource,
        count: usize,
    ) -> RenderResult<()> {
        if count == 0 {
            return Ok(());
        }
        let i = self.layout.interval_capacity();
        if self.segments.is_empty() {
            let segment = self.allocate(alloc)?;
            self.segments.push_back(segment);
            self.valid_start = 1;
            self.valid_end = 0;
            self.len = 0;
        }
        let was_empty = self.len == 0;
        let first_new = self.valid_start + self.len;
        let old_segments = self.segments.len();

        self.valid_end += count;
        while self.valid_end > i {
            let segment = self.allocate(alloc)?;
            self.segments.push_back(segment);
            self.valid_end -= i;
        }
        self.len += count;

        let mut lo = if was_empty { first_new - 1 } else { first_new };
        if self.segments.len() > old_segments {
            // The first new back segment starts on a slot the old last one holds.
            lo = lo.min(old_segments * i);
        }
        self.encode_abs(alloc.gpu, source, lo, self.valid_start + self.len + 1);
        Ok(())
    }

    /// Draw the part of the window whose samples fall in `[min, max]`.
    ///
    /// Includes the interval entering the domain from the left. Returns the
    /// number of draw calls issued.
    pub fn draw(
        &self,
        pass: &mut dyn DrawPass,
        samples: &dyn SampleSequence,
        style: SeriesStyle,
        min: f64,
        max: f64,
    ) -> usize {
        profile_function!();
        let n = samples.len();
        if self.segments.is_empty() || n < 2 || min > max {
            return 0;
        }
        if n != self.len {
            tracing::trace!(samples = n, represented = self.len, "Window drawn before sync");
            return 0;
        }

        let (Some(first), Some(last)) = (samples.get(0), samples.get(n - 1)) else {
            return 0;
        };
        if max < first.x || min > last.x {
            return 0;
        }

        let i0 = partition_point(samples, |s| s.x < min);
        let i1 = partition_point(samples, |s| s.x <= max);
        let a = i0.saturating_sub(1);
        let b = i1.min(n - 1);
        if a >= b {
            return 0;
        }

        let i = self.layout.interval_capacity();
        let (abs_a, abs_b) = (self.valid_start + a, self.valid_start + b);
        let k_end = abs_b.div_ceil(i).min(self.segments.len());

        let mut draws = 0;
        for k in abs_a / i..k_end {
            let base = (k * i) as isize;
            if self.segments[k].draw(pass, style, abs_a as isize - base, abs_b as isize - base) {
                draws += 1;
            }
        }
        tracing::trace!(intervals = b - a, draws, "Drew segment window");
        draws
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Sample, SampleBuffer};
    use ribbon_test_utils::{GpuBindGroupLayout, MockDrawPass, MockRenderContext};

    struct Harness {
        gpu: MockRenderContext,
        layout: GpuBindGroupLayout,
        color: SeriesColor,
    }

    impl Harness {
        fn new() -> Self {
            let gpu = MockRenderContext::new();
            let layout = gpu.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("segment"),
                entries: &[],
            });
            Self {
                gpu,
                layout,
                color: SeriesColor::default(),
            }
        }

        fn sync(&self, window: &mut SegmentWindow, samples: &mut SampleBuffer, style: SeriesStyle) {
            let alloc = SegmentAllocator {
                gpu: &self.gpu,
                bind_group_layout: &self.layout,
                debug: false,
            };
            let source = SyncSource {
                samples: &*samples,
                style,
                color: &self.color,
            };
            window.sync(&alloc, &source).unwrap();
            samples.reset_deltas();
        }

        fn records(&self, segment: &Segment) -> Vec<[f32; 4]> {
            let bytes = self.gpu.texture_data(segment.texture()).unwrap();
            bytes
                .chunks_exact(16)
                .map(|texel| {
                    let mut record = [0.0; 4];
                    for (value, chunk) in record.iter_mut().zip(texel.chunks_exact(4)) {
                        *value = f32::from_ne_bytes(chunk.try_into().unwrap());
                    }
                    record
                })
                .collect()
        }

        /// Assert every sample appears, with the right coordinates, in every
        /// segment slot that covers it.
        fn assert_represents(&self, window: &SegmentWindow, samples: &SampleBuffer) {
            assert_eq!(window.len(), samples.len());
            let per_segment: Vec<_> = window.segments().map(|s| self.records(s)).collect();
            for (index, sample) in samples.iter().enumerate() {
                let locations = window.slot_locations(index);
                assert!(!locations.is_empty(), "sample {index} has no slot");
                for (k, slot) in locations {
                    let record = per_segment[k][slot];
                    assert_eq!(record[0], (sample.x - window.origin()) as f32, "x of sample {index}");
                    assert_eq!(record[1], sample.y as f32, "y of sample {index}");
                }
            }
        }
    }

    fn small_line_layout() -> SegmentLayout {
        // P = 6, I = 4
        SegmentLayout::new(6, 1, SeriesStyle::Line).unwrap()
    }

    fn ramp(range: std::ops::Range<i32>) -> impl DoubleEndedIterator<Item = Sample> {
        range.map(|i| Sample::new(i as f64, (i * 10) as f64))
    }

    #[test]
    fn test_three_points_then_evict_one() {
        let h = Harness::new();
        let mut window = SegmentWindow::new(SegmentLayout::new(60, 1, SeriesStyle::Line).unwrap());
        let mut samples = SampleBuffer::from_samples([
            Sample::new(0.0, 0.0),
            Sample::new(1.0, 1.0),
            Sample::new(2.0, 0.0),
        ]);

        h.sync(&mut window, &mut samples, SeriesStyle::Line);
        assert_eq!(window.segment_count(), 1);
        assert_eq!(window.valid_start(), 1);
        assert_eq!(window.valid_end(), 3);

        let mut pass = MockDrawPass::new();
        assert_eq!(window.draw(&mut pass, &samples, SeriesStyle::Line, -1.0, 3.0), 1);
        // Two intervals, four vertices each.
        assert_eq!(pass.draws()[0].vertices, 4..12);

        samples.pop_front();
        h.sync(&mut window, &mut samples, SeriesStyle::Line);
        assert_eq!(window.valid_start(), 2);

        let records = h.records(window.segments().next().unwrap());
        // Left padding now repeats the new first sample.
        assert_eq!(records[1][..2], [1.0, 1.0]);

        pass.clear();
        assert_eq!(window.draw(&mut pass, &samples, SeriesStyle::Line, -1.0, 3.0), 1);
        assert_eq!(pass.draws()[0].vertices, 8..12);
    }

    #[test]
    fn test_padding_slots_around_data() {
        let h = Harness::new();
        let mut window = SegmentWindow::new(small_line_layout());
        let mut samples: SampleBuffer = ramp(0..3).collect();
        h.sync(&mut window, &mut samples, SeriesStyle::Line);

        let records = h.records(window.segments().next().unwrap());
        assert_eq!(records[0][..2], [0.0, 0.0]);
        assert_eq!(records[4][..2], [2.0, 20.0]);
        assert_eq!(records[0][2], 1.0);
    }

    #[test]
    fn test_large_push_spans_segments() {
        let h = Harness::new();
        let mut window = SegmentWindow::new(small_line_layout());
        let mut samples: SampleBuffer = ramp(0..23).collect();
        h.sync(&mut window, &mut samples, SeriesStyle::Line);

        // Slots 0..=24 span six segments of four intervals.
        assert_eq!(window.segment_count(), 6);
        assert_eq!(window.valid_end(), 3);
        h.assert_represents(&window, &samples);
    }

    #[test]
    fn test_shared_slots_match_between_neighbours() {
        let h = Harness::new();
        let mut window = SegmentWindow::new(small_line_layout());
        let mut samples: SampleBuffer = ramp(0..10).collect();
        h.sync(&mut window, &mut samples, SeriesStyle::Line);
        samples.extend_back(ramp(10..17));
        samples.evict_front(3);
        h.sync(&mut window, &mut samples, SeriesStyle::Line);

        let per_segment: Vec<_> = window.segments().map(|s| h.records(s)).collect();
        for pair in per_segment.windows(2) {
            assert_eq!(pair[0][4..6], pair[1][0..2]);
        }
        h.assert_represents(&window, &samples);
    }

    #[test]
    fn test_large_push_front_allocates_ahead() {
        let h = Harness::new();
        let mut window = SegmentWindow::new(small_line_layout());
        let mut samples: SampleBuffer = ramp(20..23).collect();
        h.sync(&mut window, &mut samples, SeriesStyle::Line);

        for sample in ramp(0..20).rev() {
            samples.push_front(sample);
        }
        h.sync(&mut window, &mut samples, SeriesStyle::Line);

        assert_eq!(window.stats().rebuilds, 1);
        assert!((1..=4).contains(&window.valid_start()));
        h.assert_represents(&window, &samples);
    }

    #[test]
    fn test_push_back_fills_inherited_slot_of_new_segment() {
        let h = Harness::new();
        let mut window = SegmentWindow::new(small_line_layout());
        let mut samples: SampleBuffer = ramp(0..4).collect();
        h.sync(&mut window, &mut samples, SeriesStyle::Line);
        assert_eq!(window.valid_end(), 4);

        samples.push_back(Sample::new(4.0, 40.0));
        h.sync(&mut window, &mut samples, SeriesStyle::Line);

        assert_eq!(window.segment_count(), 2);
        // Sample 3 sits at absolute slot 4: local 4 of segment 0, local 0 of segment 1.
        assert_eq!(window.slot_locations(3), vec![(0, 4), (1, 0)]);
        h.assert_represents(&window, &samples);
    }

    #[test]
    fn test_push_front_fills_inherited_slot_of_new_segment() {
        let h = Harness::new();
        let mut window = SegmentWindow::new(small_line_layout());
        let mut samples: SampleBuffer = ramp(1..4).collect();
        h.sync(&mut window, &mut samples, SeriesStyle::Line);
        assert_eq!(window.valid_start(), 1);

        samples.push_front(Sample::new(0.0, 0.0));
        h.sync(&mut window, &mut samples, SeriesStyle::Line);

        assert_eq!(window.segment_count(), 2);
        // The old first sample is the seam slot of the new front segment.
        assert!(window.slot_locations(1).contains(&(0, 5)));
        h.assert_represents(&window, &samples);
    }

    #[test]
    fn test_draw_before_sync_is_a_no_op() {
        let h = Harness::new();
        let mut window = SegmentWindow::new(small_line_layout());
        let mut samples: SampleBuffer = ramp(0..6).collect();
        h.sync(&mut window, &mut samples, SeriesStyle::Line);

        samples.push_back(Sample::new(6.0, 60.0));
        let mut pass = MockDrawPass::new();
        assert_eq!(window.draw(&mut pass, &samples, SeriesStyle::Line, 0.0, 6.0), 0);
        assert_eq!(pass.draw_count(), 0);
    }

    #[test]
    fn test_eviction_releases_segments() {
        let h = Harness::new();
        let mut window = SegmentWindow::new(small_line_layout());
        let mut samples: SampleBuffer = ramp(0..20).collect();
        h.sync(&mut window, &mut samples, SeriesStyle::Line);
        let before = window.segment_count();

        samples.evict_front(9);
        samples.evict_back(5);
        h.sync(&mut window, &mut samples, SeriesStyle::Line);

        assert!(window.segment_count() < before);
        assert_eq!(h.gpu.live_texture_count(), window.segment_count());
        h.assert_represents(&window, &samples);
    }

    #[test]
    fn test_shrinking_below_two_tears_down() {
        let h = Harness::new();
        let mut window = SegmentWindow::new(small_line_layout());
        let mut samples: SampleBuffer = ramp(0..8).collect();
        h.sync(&mut window, &mut samples, SeriesStyle::Line);

        samples.evict_front(7);
        h.sync(&mut window, &mut samples, SeriesStyle::Line);
        assert_eq!(window.segment_count(), 0);
        assert_eq!(h.gpu.live_texture_count(), 0);

        // Growing again recreates the window lazily.
        samples.push_back(Sample::new(8.0, 80.0));
        h.sync(&mut window, &mut samples, SeriesStyle::Line);
        assert_eq!(window.len(), 2);
        h.assert_represents(&window, &samples);
    }

    #[test]
    fn test_evicting_all_but_one_then_refilling_rebuilds() {
        let h = Harness::new();
        let mut window = SegmentWindow::new(small_line_layout());
        let mut samples: SampleBuffer = ramp(0..8).collect();
        h.sync(&mut window, &mut samples, SeriesStyle::Line);

        samples.evict_front(7);
        samples.extend_back(ramp(8..12));
        h.sync(&mut window, &mut samples, SeriesStyle::Line);

        assert_eq!(window.stats().rebuilds, 2);
        h.assert_represents(&window, &samples);
    }

    #[test]
    fn test_sync_without_changes_uploads_nothing() {
        let h = Harness::new();
        let mut window = SegmentWindow::new(small_line_layout());
        let mut samples: SampleBuffer = ramp(0..9).collect();
        h.sync(&mut window, &mut samples, SeriesStyle::Line);

        let mut pass = MockDrawPass::new();
        window.draw(&mut pass, &samples, SeriesStyle::Line, 0.0, 8.0);
        let first_draws = pass.draws().to_vec();

        h.gpu.clear_calls();
        h.sync(&mut window, &mut samples, SeriesStyle::Line);
        h.sync(&mut window, &mut samples, SeriesStyle::Line);
        assert_eq!(h.gpu.call_count(), 0);

        pass.clear();
        window.draw(&mut pass, &samples, SeriesStyle::Line, 0.0, 8.0);
        assert_eq!(pass.draws(), &first_draws[..]);
    }

    #[test]
    fn test_incremental_push_uploads_only_new_slots() {
        let h = Harness::new();
        let mut window = SegmentWindow::new(SegmentLayout::new(60, 1, SeriesStyle::Line).unwrap());
        let mut samples: SampleBuffer = ramp(0..10).collect();
        h.sync(&mut window, &mut samples, SeriesStyle::Line);

        h.gpu.clear_calls();
        samples.push_back(Sample::new(10.0, 100.0));
        h.sync(&mut window, &mut samples, SeriesStyle::Line);

        // The new sample and the right padding after it.
        assert_eq!(h.gpu.texels_written(), 2);
        assert_eq!(h.gpu.count_texture_creates(), 0);
    }

    #[test]
    fn test_draw_outside_domain_is_empty() {
        let h = Harness::new();
        let mut window = SegmentWindow::new(small_line_layout());
        let mut samples: SampleBuffer = ramp(0..12).collect();
        h.sync(&mut window, &mut samples, SeriesStyle::Line);

        let mut pass = MockDrawPass::new();
        assert_eq!(window.draw(&mut pass, &samples, SeriesStyle::Line, -10.0, -0.5), 0);
        assert_eq!(window.draw(&mut pass, &samples, SeriesStyle::Line, 11.5, 40.0), 0);
        assert_eq!(window.draw(&mut pass, &samples, SeriesStyle::Line, 5.0, 4.0), 0);
        assert_eq!(pass.draw_count(), 0);
    }

    #[test]
    fn test_draw_dispatches_to_covering_segments() {
        let h = Harness::new();
        let mut window = SegmentWindow::new(small_line_layout());
        let mut samples: SampleBuffer = ramp(0..12).collect();
        h.sync(&mut window, &mut samples, SeriesStyle::Line);

        // Samples 2..=5 are inside, plus the intervals entering and leaving
        // the domain: absolute intervals 2..7. Segment 0 draws 2..4 with the
        // seam join, segment 1 draws its local 0..3.
        let mut pass = MockDrawPass::new();
        assert_eq!(window.draw(&mut pass, &samples, SeriesStyle::Line, 1.5, 5.5), 2);
        assert_eq!(pass.draws()[0].vertices, 8..18);
        assert_eq!(pass.draws()[1].vertices, 0..12);
        assert_ne!(pass.draws()[0].bind_groups[2], pass.draws()[1].bind_groups[2]);
    }

    #[test]
    fn test_bar_window_hides_padding() {
        let h = Harness::new();
        let mut window = SegmentWindow::new(SegmentLayout::new(24, 1, SeriesStyle::Bar).unwrap());
        let mut samples: SampleBuffer = ramp(0..2).collect();
        h.sync(&mut window, &mut samples, SeriesStyle::Bar);

        let records = h.records(window.segments().next().unwrap());
        // Slot 0 is left padding: six transparent records.
        assert!(records[0..6].iter().all(|r| r[2] == 0.0));
        assert!(records[6..12].iter().all(|r| r[2] == 1.0));
        // Right padding after the second sample.
        assert!(records[18..24].iter().all(|r| r[2] == 0.0));
    }
}
