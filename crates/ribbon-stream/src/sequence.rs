//! Ordered sample storage with per-sync change counters.

use std::collections::VecDeque;

use crate::sample::Sample;

/// Counts of samples added and removed at each end since the last sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceDeltas {
    pub pushed_front: usize,
    pub pushed_back: usize,
    pub evicted_front: usize,
    pub evicted_back: usize,
}

impl SequenceDeltas {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn pushed(&self) -> usize {
        self.pushed_front + self.pushed_back
    }

    pub fn evicted(&self) -> usize {
        self.evicted_front + self.evicted_back
    }
}

/// An ordered sequence of samples whose `x` is non-decreasing.
///
/// Implementors record how many samples were pushed and evicted at each end
/// since the last call to [`reset_deltas`](SampleSequence::reset_deltas). The
/// counters must describe the change from the previously synced content to the
/// current content when applied as: evict front, evict back, push front, push
/// back.
pub trait SampleSequence {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<Sample>;

    fn deltas(&self) -> SequenceDeltas;

    fn reset_deltas(&mut self);
}

/// First index in `0..seq.len()` for which `pred` is false.
///
/// `pred` must be true for a prefix of the sequence and false afterwards.
pub fn partition_point(seq: &dyn SampleSequence, pred: impl Fn(&Sample) -> bool) -> usize {
    let (mut lo, mut hi) = (0, seq.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match seq.get(mid) {
            Some(sample) if pred(&sample) => lo = mid + 1,
            _ => hi = mid,
        }
    }
    lo
}

/// A ring buffer of samples implementing [`SampleSequence`].
///
/// With a `max_len`, pushing past the limit evicts from the opposite end,
/// turning the buffer into a sliding window.
///
/// ```
/// use ribbon_stream::{Sample, SampleBuffer, SampleSequence};
///
/// let mut buffer = SampleBuffer::with_max_len(2);
/// buffer.push_back(Sample::new(0.0, 1.0));
/// buffer.push_back(Sample::new(1.0, 2.0));
/// buffer.push_back(Sample::new(2.0, 3.0));
///
/// assert_eq!(buffer.len(), 2);
/// assert_eq!(buffer.get(0).unwrap().x, 1.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SampleBuffer {
    samples: VecDeque<Sample>,
    max_len: Option<usize>,
    deltas: SequenceDeltas,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer that keeps at most `max_len` samples.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(max_len),
            max_len: Some(max_len),
            deltas: SequenceDeltas::default(),
        }
    }

    /// A buffer pre-filled with `samples`, all reported as pushed at the back.
    pub fn from_samples(samples: impl IntoIterator<Item = Sample>) -> Self {
        let mut buffer = Self::new();
        buffer.extend_back(samples);
        buffer
    }

    pub fn max_len(&self) -> Option<usize> {
        self.max_len
    }

    /// Change the length limit, evicting the oldest samples if needed.
    pub fn set_max_len(&mut self, max_len: Option<usize>) {
        self.max_len = max_len;
        if let Some(max) = max_len {
            while self.samples.len() > max {
                self.pop_front();
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.front()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn push_back(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        self.deltas.pushed_back += 1;
        if self.max_len.is_some_and(|max| self.samples.len() > max) {
            self.pop_front();
        }
    }

    pub fn push_front(&mut self, sample: Sample) {
        self.samples.push_front(sample);
        self.deltas.pushed_front += 1;
        if self.max_len.is_some_and(|max| self.samples.len() > max) {
            self.pop_back();
        }
    }

    pub fn extend_back(&mut self, samples: impl IntoIterator<Item = Sample>) {
        for sample in samples {
            self.push_back(sample);
        }
    }

    /// Samples present at the last sync that are still in the buffer.
    fn synced_remaining(&self) -> usize {
        self.samples.len() - self.deltas.pushed()
    }

    /// Remove the oldest sample.
    ///
    /// A sample pushed since the last sync cancels its push instead of
    /// counting as an eviction, so the counters never describe samples the
    /// renderer has not seen.
    pub fn pop_front(&mut self) -> Option<Sample> {
        let synced = self.synced_remaining();
        let sample = self.samples.pop_front()?;
        if self.deltas.pushed_front > 0 {
            self.deltas.pushed_front -= 1;
        } else if synced > 0 {
            self.deltas.evicted_front += 1;
        } else {
            self.deltas.pushed_back -= 1;
        }
        Some(sample)
    }

    /// Remove the newest sample.
    pub fn pop_back(&mut self) -> Option<Sample> {
        let synced = self.synced_remaining();
        let sample = self.samples.pop_back()?;
        if self.deltas.pushed_back > 0 {
            self.deltas.pushed_back -= 1;
        } else if synced > 0 {
            self.deltas.evicted_back += 1;
        } else {
            self.deltas.pushed_front -= 1;
        }
        Some(sample)
    }

    /// Evict up to `count` samples from the front.
    pub fn evict_front(&mut self, count: usize) -> usize {
        (0..count).take_while(|_| self.pop_front().is_some()).count()
    }

    /// Evict up to `count` samples from the back.
    pub fn evict_back(&mut self, count: usize) -> usize {
        (0..count).take_while(|_| self.pop_back().is_some()).count()
    }

    /// Remove every sample.
    pub fn clear(&mut self) {
        let len = self.samples.len();
        self.evict_front(len);
    }
}

impl SampleSequence for SampleBuffer {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn get(&self, index: usize) -> Option<Sample> {
        self.samples.get(index).copied()
    }

    fn deltas(&self) -> SequenceDeltas {
        self.deltas
    }

    fn reset_deltas(&mut self) {
        self.deltas = SequenceDeltas::default();
    }
}

impl FromIterator<Sample> for SampleBuffer {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self::from_samples(iter)
    }
}
