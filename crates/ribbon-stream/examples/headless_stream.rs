//! Headless Streaming Demo
//!
//! Streams a sine wave into a step series and a bar series, rendering each
//! frame into an offscreen texture. Old samples fall off the front once the
//! buffer is full, so the segment window slides along with the data.
//!
//! Run with:
//!   cargo run -p ribbon-stream --example headless_stream
//!
//! Then open puffin_viewer and connect to 127.0.0.1:8585 to see the flame graph.

use ribbon_core::logging;
use ribbon_core::profiling::{ProfilingBackend, init_profiling, new_frame, profile_scope};
use ribbon_render::{Color, GraphicsContext, wgpu};
use ribbon_stream::{
    LinearScale, Renderer, RendererConfig, RendererEvent, Sample, SampleBuffer, SeriesColor,
    SeriesConfig, SeriesStyle,
};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;
const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const SAMPLES_PER_FRAME: usize = 64;
const FRAMES: usize = 600;

fn main() {
    logging::init();
    init_profiling(ProfilingBackend::PuffinHttp);

    let context = GraphicsContext::new_owned_sync().expect("Failed to create graphics context");

    let target = context.device().create_texture(&wgpu::TextureDescriptor {
        label: Some("Offscreen Target"),
        size: wgpu::Extent3d {
            width: WIDTH,
            height: HEIGHT,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());

    let mut renderer: Renderer = Renderer::new(
        context.clone(),
        RendererConfig::default().target_format(FORMAT).padding(8.0),
    )
    .expect("Failed to create renderer");
    renderer.handle_event(RendererEvent::Resized {
        width: WIDTH,
        height: HEIGHT,
    });

    let wave = renderer
        .add_series(
            SeriesConfig::new(SeriesStyle::Step)
                .color(Color::from_hex(0x4FC3F7))
                .line_width(2.0),
            SampleBuffer::with_max_len(20_000),
        )
        .expect("Failed to add step series");
    let bars = renderer
        .add_series(
            SeriesConfig::new(SeriesStyle::Bar).color(SeriesColor::colormap(|a| {
                Color::rgb(a, 0.2, 1.0 - a)
            })),
            SampleBuffer::with_max_len(2_000),
        )
        .expect("Failed to add bar series");

    let mut t = 0.0f64;
    for frame in 0..FRAMES {
        new_frame();
        profile_scope!("frame");

        {
            profile_scope!("generate");
            let data = renderer.series_data_mut(wave).expect("step series");
            for _ in 0..SAMPLES_PER_FRAME {
                data.push_back(Sample::new(t, (t * 0.05).sin()));
                t += 1.0;
            }
            let level = ((t * 0.01).sin() * 0.5 + 0.5) as f32;
            renderer
                .series_data_mut(bars)
                .expect("bar series")
                .push_back(Sample::new(t, f64::from(level)).with_value(level));
        }
        renderer.handle_event(RendererEvent::DataChanged);

        // Show the newest 5000 time units.
        renderer.set_scales(
            LinearScale::new((t - 5000.0, t), (0.0, f64::from(WIDTH) - 16.0)),
            LinearScale::new((-1.2, 1.2), (0.0, f64::from(HEIGHT) - 16.0)),
        );

        let mut encoder = context
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Stream Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(Color::BLACK.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            match renderer.render(&mut pass) {
                Ok(stats) if frame % 60 == 0 => tracing::info!(
                    frame,
                    series = stats.series_drawn,
                    draws = stats.draw_calls,
                    "Rendered frame"
                ),
                Ok(_) => {}
                Err(e) => tracing::error!("Frame {} failed: {}", frame, e),
            }
        }
        context.queue().submit(Some(encoder.finish()));
    }

    let stats = renderer.stats();
    tracing::info!(
        frames = stats.frames,
        segments = stats.segments,
        texels = stats.texels_uploaded,
        "Done"
    );
}
