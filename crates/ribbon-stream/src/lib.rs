//! Ribbon Stream - streaming GPU rendering of time-series data.
//!
//! Samples live in a [`SampleSequence`] that counts what was pushed and
//! evicted at each end. Each series owns a [`SegmentWindow`]: a deque of
//! fixed-size textures that slides along the sequence, so a sync only uploads
//! the samples that changed. Drawing binary-searches the visible domain and
//! dispatches just the segments that cover it.
//!
//! # Example
//!
//! ```ignore
//! use ribbon_stream::{LinearScale, Renderer, RendererConfig, RendererEvent, Sample};
//!
//! let mut renderer = Renderer::new(context, RendererConfig::default())?;
//! let id = renderer.add_series(SeriesConfig::new(SeriesStyle::Step), SampleBuffer::with_max_len(50_000))?;
//!
//! // On new data
//! renderer.series_data_mut(id).unwrap().push_back(Sample::new(t, value));
//! renderer.handle_event(RendererEvent::DataChanged);
//!
//! // Each frame
//! renderer.set_scales(LinearScale::new((t - 60.0, t), (0.0, width)), y_scale);
//! renderer.render(&mut render_pass)?;
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod program;
pub mod record;
pub mod renderer;
pub mod sample;
pub mod scale;
pub mod segment;
pub mod sequence;
pub mod style;
pub mod transform;
pub mod window;

pub use config::RendererConfig;
pub use error::{RenderError, RenderResult};
pub use layout::SegmentLayout;
pub use program::Programs;
pub use record::{Record, RecordEncoder, bar_vertex_offsets};
pub use renderer::{
    FrameStats, Renderer, RendererDirtyFlags, RendererEvent, RendererStats, SeriesId,
};
pub use sample::Sample;
pub use scale::{LinearScale, Scale};
pub use segment::{Segment, SegmentAllocator, segment_vertex_range};
pub use sequence::{SampleBuffer, SampleSequence, SequenceDeltas, partition_point};
pub use style::{Colormap, SeriesColor, SeriesConfig, SeriesStyle};
pub use transform::{FrameUniform, SeriesUniform, visible_domain};
pub use window::{SegmentWindow, SyncSource, WindowStats};

pub use ribbon_render::Color;
