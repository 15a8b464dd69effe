//! Sliding window behaviour against a mock GPU (no GPU required).
//!
//! Segment textures are read back from the mock context and compared with a
//! fresh encoding of the sequence, so every check covers both the slot
//! bookkeeping and the uploaded bytes.

use rand::{Rng, SeedableRng, rngs::StdRng};
use ribbon_stream::{
    Record, RecordEncoder, Sample, SampleBuffer, SampleSequence, SegmentAllocator, SegmentLayout,
    SegmentWindow, SeriesColor, SeriesStyle, SyncSource, bar_vertex_offsets,
};
use ribbon_test_utils::{
    GpuBindGroupLayout, MockDrawPass, MockRenderContext, RenderContext,
};

struct Fixture {
    gpu: MockRenderContext,
    segment_layout: GpuBindGroupLayout,
    color: SeriesColor,
    style: SeriesStyle,
    window: SegmentWindow,
    samples: SampleBuffer,
}

impl Fixture {
    fn new(width: u32, height: u32, style: SeriesStyle) -> Self {
        let gpu = MockRenderContext::new();
        let segment_layout = gpu.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("segment"),
            entries: &[],
        });
        Self {
            gpu,
            segment_layout,
            color: SeriesColor::default(),
            style,
            window: SegmentWindow::new(SegmentLayout::new(width, height, style).unwrap()),
            samples: SampleBuffer::new(),
        }
    }

    fn sync(&mut self) {
        let alloc = SegmentAllocator {
            gpu: &self.gpu,
            bind_group_layout: &self.segment_layout,
            debug: false,
        };
        let source = SyncSource {
            samples: &self.samples,
            style: self.style,
            color: &self.color,
        };
        self.window.sync(&alloc, &source).unwrap();
        self.samples.reset_deltas();
    }

    fn segment_records(&self) -> Vec<Vec<Record>> {
        self.window
            .segments()
            .map(|segment| decode(&self.gpu.texture_data(segment.texture()).unwrap()))
            .collect()
    }

    fn expected(&self, index: isize) -> Vec<Record> {
        let encoder = RecordEncoder::new(
            &self.samples,
            self.style,
            &self.color,
            self.window.origin(),
            0..self.samples.len(),
        );
        let mut out = Vec::new();
        encoder.encode_into(index, &mut out);
        out
    }

    /// Every sample and both padding slots sit in every segment covering
    /// them, and shared slots agree between neighbours.
    fn check(&self) {
        let len = self.samples.len();
        if len < 2 {
            assert_eq!(self.window.segment_count(), 0);
            assert_eq!(self.gpu.live_texture_count(), 0);
            return;
        }

        let layout = self.window.layout();
        let rps = layout.records_per_sample();
        let i = layout.interval_capacity();
        let p = layout.point_capacity();
        let valid_start = self.window.valid_start();

        assert_eq!(self.window.len(), len);
        assert!((1..=i).contains(&valid_start));
        assert!((1..=i).contains(&self.window.valid_end()));
        assert_eq!(
            (self.window.segment_count() - 1) * i + self.window.valid_end(),
            valid_start + len - 1
        );
        assert_eq!(self.gpu.live_texture_count(), self.window.segment_count());

        let records = self.segment_records();
        for index in -1..=len as isize {
            let abs = (valid_start as isize + index) as usize;
            let expected = self.expected(index);
            let mut seen = 0;
            for (k, segment) in records.iter().enumerate() {
                if abs < k * i || abs >= k * i + p {
                    continue;
                }
                let local = abs - k * i;
                assert_eq!(
                    segment[local * rps..(local + 1) * rps],
                    expected[..],
                    "slot {abs} (sample {index}) in segment {k}"
                );
                seen += 1;
            }
            assert!(seen > 0, "slot {abs} is not stored");
        }
    }
}

fn decode(bytes: &[u8]) -> Vec<Record> {
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

fn sample(x: i64, rng: &mut StdRng) -> Sample {
    let y = rng.random_range(-100.0..100.0);
    if rng.random_bool(0.1) {
        Sample::gap(x as f64, y)
    } else {
        Sample::new(x as f64, y).with_value(rng.random_range(0.0..1.0))
    }
}

fn run_random_batches(seed: u64, width: u32, height: u32, style: SeriesStyle) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut fx = Fixture::new(width, height, style);
    let (mut lo, mut hi) = (0i64, 0i64);

    for _ in 0..60 {
        for _ in 0..rng.random_range(1..4) {
            let count = rng.random_range(0..25);
            match rng.random_range(0..4) {
                0 => {
                    for _ in 0..count {
                        let s = sample(hi, &mut rng);
                        fx.samples.push_back(s);
                        hi += 1;
                    }
                }
                1 => {
                    for _ in 0..count {
                        lo -= 1;
                        let s = sample(lo, &mut rng);
                        fx.samples.push_front(s);
                    }
                }
                2 => lo += fx.samples.evict_front(count / 2) as i64,
                _ => hi -= fx.samples.evict_back(count / 2) as i64,
            }
            if fx.samples.is_empty() {
                (lo, hi) = (0, 0);
            }
        }
        fx.sync();
        fx.check();
    }
}

#[test]
fn test_random_batches_line() {
    for seed in 0..8 {
        run_random_batches(seed, 6, 1, SeriesStyle::Line);
    }
}

#[test]
fn test_random_batches_step_multirow() {
    for seed in 100..108 {
        run_random_batches(seed, 4, 3, SeriesStyle::Step);
    }
}

#[test]
fn test_random_batches_bar() {
    for seed in 200..208 {
        run_random_batches(seed, 24, 1, SeriesStyle::Bar);
    }
}

#[test]
fn test_random_batches_native_points() {
    for seed in 300..308 {
        run_random_batches(seed, 6, 2, SeriesStyle::NativePoint);
    }
}

#[test]
fn test_push_many_segments_at_each_end() {
    let mut fx = Fixture::new(6, 1, SeriesStyle::Line);
    fx.samples.extend_back((0..3).map(|i| Sample::new(i as f64, 1.0)));
    fx.sync();

    fx.samples.extend_back((3..40).map(|i| Sample::new(i as f64, 2.0)));
    for i in (-40..0).rev() {
        fx.samples.push_front(Sample::new(i as f64, 3.0));
    }
    fx.sync();

    assert_eq!(fx.window.stats().rebuilds, 1);
    fx.check();
}

#[test]
fn test_new_back_segment_holds_shared_slot() {
    for style in [SeriesStyle::Line, SeriesStyle::Step, SeriesStyle::NativeLine] {
        let mut fx = Fixture::new(6, 1, style);
        fx.samples.extend_back((0..4).map(|i| Sample::new(i as f64, 1.0 + i as f64)));
        fx.sync();
        assert_eq!(fx.window.valid_end(), 4);

        fx.samples.push_back(Sample::new(4.0, 5.0));
        fx.sync();
        assert_eq!(fx.window.segment_count(), 2);
        fx.check();
    }
}

#[test]
fn test_new_front_segment_holds_shared_slot() {
    for style in [SeriesStyle::Line, SeriesStyle::Step, SeriesStyle::NativeLine] {
        let mut fx = Fixture::new(6, 1, style);
        fx.samples.extend_back((1..4).map(|i| Sample::new(i as f64, 1.0 + i as f64)));
        fx.sync();
        assert_eq!(fx.window.valid_start(), 1);

        fx.samples.push_front(Sample::new(0.0, 1.0));
        fx.sync();
        assert_eq!(fx.window.segment_count(), 2);
        fx.check();
    }
}

#[test]
fn test_evict_across_segment_boundaries() {
    let mut fx = Fixture::new(6, 1, SeriesStyle::Line);
    fx.samples.extend_back((0..30).map(|i| Sample::new(i as f64, i as f64)));
    fx.sync();

    fx.samples.evict_front(13);
    fx.samples.evict_back(9);
    fx.sync();

    assert_eq!(fx.window.stats().rebuilds, 1);
    assert_eq!(
        fx.window.stats().segments_released,
        fx.window.stats().segments_allocated - fx.window.segment_count() as u64
    );
    fx.check();
}

#[test]
fn test_sliding_window_with_max_len() {
    ribbon_core::logging::init_with_filter("ribbon_stream=trace");
    let mut fx = Fixture::new(12, 1, SeriesStyle::Line);
    fx.samples.set_max_len(Some(25));

    for i in 0..200 {
        fx.samples.push_back(Sample::new(i as f64, (i % 7) as f64));
        if i % 9 == 0 {
            fx.sync();
            fx.check();
        }
    }
    fx.sync();
    fx.check();
    assert_eq!(fx.window.stats().rebuilds, 1);
}

#[test]
fn test_bar_offsets_are_uploaded() {
    let mut fx = Fixture::new(24, 1, SeriesStyle::Bar);
    fx.samples.push_back(Sample::new(0.0, 2.0).with_bar_width(0.3, 0.7));
    fx.samples.push_back(Sample::new(1.0, 4.0));
    fx.sync();

    let records = &fx.segment_records()[0];
    let bar = &records[6..12];
    let offsets = bar_vertex_offsets(&Sample::new(0.0, 2.0).with_bar_width(0.3, 0.7));
    assert_eq!(
        offsets,
        [
            (-0.3, -0.5),
            (-0.3, 0.5),
            (0.7, 0.5),
            (0.7, 0.5),
            (-0.3, -0.5),
            (0.7, -0.5)
        ]
    );
    for (record, (dx, dy)) in bar.iter().zip(offsets) {
        assert_eq!(record[0], dx);
        // From the baseline to the value.
        assert_eq!(record[1], 2.0 * (dy + 0.5));
    }
}

#[test]
fn test_draws_stay_inside_window() {
    let mut fx = Fixture::new(6, 1, SeriesStyle::Step);
    fx.samples.extend_back((0..50).map(|i| Sample::new(i as f64 * 0.5, 0.0)));
    fx.sync();

    let segment_groups: Vec<_> = fx
        .window
        .segments()
        .map(|s| s.bind_group().mock_id())
        .collect();

    let mut pass = MockDrawPass::new();
    let draws = fx.window.draw(&mut pass, &fx.samples, SeriesStyle::Step, 0.0, 24.5);
    assert_eq!(draws, pass.draw_count());
    assert!(draws <= fx.window.segment_count());
    for draw in pass.draws() {
        assert!(segment_groups.contains(&draw.bind_groups[2]));
        assert!(draw.vertices.end <= 4 * 6);
    }

    pass.clear();
    assert_eq!(fx.window.draw(&mut pass, &fx.samples, SeriesStyle::Step, 30.0, 40.0), 0);
    assert_eq!(fx.window.draw(&mut pass, &fx.samples, SeriesStyle::Step, -3.0, -0.1), 0);
    assert_eq!(pass.draw_count(), 0);
}

#[test]
fn test_narrow_domain_draws_only_covering_segment() {
    let mut fx = Fixture::new(6, 1, SeriesStyle::Line);
    fx.samples.extend_back((0..50).map(|i| Sample::new(i as f64, 0.0)));
    fx.sync();

    // Between samples 20 and 21: one interval at absolute slot 21.
    let mut pass = MockDrawPass::new();
    assert_eq!(fx.window.draw(&mut pass, &fx.samples, SeriesStyle::Line, 20.2, 20.8), 1);
    let expected = fx.window.segments().nth(5).unwrap().bind_group().mock_id();
    assert_eq!(pass.draws()[0].bind_groups[2], expected);
    assert_eq!(pass.draws()[0].vertices, 4..8);
}
