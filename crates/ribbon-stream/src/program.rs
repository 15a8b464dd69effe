//! Shader programs and render pipelines.
//!
//! Two programs share one set of bindings:
//!
//! | group | contents                        |
//! |-------|---------------------------------|
//! | 0     | [`FrameUniform`]                |
//! | 1     | [`SeriesUniform`]               |
//! | 2     | segment record texture          |
//!
//! The interpolated program expands lines, steps and bars into triangles;
//! the native program draws one hardware line or point vertex per sample.
//!
//! [`FrameUniform`]: crate::transform::FrameUniform
//! [`SeriesUniform`]: crate::transform::SeriesUniform

use ribbon_core::profiling::profile_function;
use ribbon_test_utils::{
    GpuBindGroupLayout, GpuRenderPipeline, GpuShaderModule, RenderContext, RenderPipelineSpec,
};

use crate::{RenderError, RenderResult, style::SeriesStyle};

pub const INTERPOLATED_SHADER: &str = concat!(
    include_str!("shaders/common.wgsl"),
    include_str!("shaders/interpolated.wgsl")
);

pub const NATIVE_SHADER: &str = concat!(
    include_str!("shaders/common.wgsl"),
    include_str!("shaders/native.wgsl")
);

/// Compiled programs, their pipelines and the bind group layouts they expect.
#[derive(Debug)]
pub struct Programs {
    frame_layout: GpuBindGroupLayout,
    series_layout: GpuBindGroupLayout,
    segment_layout: GpuBindGroupLayout,
    strip: GpuRenderPipeline,
    bars: GpuRenderPipeline,
    native_lines: GpuRenderPipeline,
    native_points: GpuRenderPipeline,
}

impl Programs {
    /// Compile both programs and build one pipeline per primitive topology.
    ///
    /// With `debug`, shader modules and pipelines are created inside
    /// validation error scopes and failures are reported as errors.
    pub fn new(
        gpu: &dyn RenderContext,
        target_format: wgpu::TextureFormat,
        debug: bool,
    ) -> RenderResult<Self> {
        profile_function!();

        let frame_layout = uniform_layout(gpu, "Ribbon Frame Bind Group Layout");
        let series_layout = uniform_layout(gpu, "Ribbon Series Bind Group Layout");
        let segment_layout = gpu.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Ribbon Segment Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: false },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            }],
        });

        let interpolated = compile(gpu, "Ribbon Interpolated Shader", INTERPOLATED_SHADER, debug)?;
        let native = compile(gpu, "Ribbon Native Shader", NATIVE_SHADER, debug)?;

        let layouts = [&frame_layout, &series_layout, &segment_layout];
        let pipeline = |label: &'static str, shader: &GpuShaderModule, topology| {
            build_pipeline(
                gpu,
                debug,
                &RenderPipelineSpec {
                    label: Some(label),
                    shader,
                    vertex_entry: "vs_main",
                    fragment_entry: "fs_main",
                    bind_group_layouts: &layouts,
                    topology,
                    target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                },
            )
        };

        let strip = pipeline(
            "Ribbon Strip Pipeline",
            &interpolated,
            wgpu::PrimitiveTopology::TriangleStrip,
        )?;
        let bars = pipeline(
            "Ribbon Bar Pipeline",
            &interpolated,
            wgpu::PrimitiveTopology::TriangleList,
        )?;
        let native_lines = pipeline(
            "Ribbon Native Line Pipeline",
            &native,
            wgpu::PrimitiveTopology::LineStrip,
        )?;
        let native_points = pipeline(
            "Ribbon Native Point Pipeline",
            &native,
            wgpu::PrimitiveTopology::PointList,
        )?;

        let debug_enabled = debug;
        tracing::debug!(?target_format, debug = debug_enabled, "Created ribbon programs");

        Ok(Self {
            frame_layout,
            series_layout,
            segment_layout,
            strip,
            bars,
            native_lines,
            native_points,
        })
    }

    pub fn frame_layout(&self) -> &GpuBindGroupLayout {
        &self.frame_layout
    }

    pub fn series_layout(&self) -> &GpuBindGroupLayout {
        &self.series_layout
    }

    pub fn segment_layout(&self) -> &GpuBindGroupLayout {
        &self.segment_layout
    }

    /// Pipeline that draws `style`.
    pub fn pipeline_for(&self, style: SeriesStyle) -> &GpuRenderPipeline {
        match style {
            SeriesStyle::Line | SeriesStyle::Step => &self.strip,
            SeriesStyle::Bar => &self.bars,
            SeriesStyle::NativeLine => &self.native_lines,
            SeriesStyle::NativePoint => &self.native_points,
        }
    }
}

fn uniform_layout(gpu: &dyn RenderContext, label: &'static str) -> GpuBindGroupLayout {
    gpu.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn compile(
    gpu: &dyn RenderContext,
    label: &'static str,
    source: &'static str,
    debug: bool,
) -> RenderResult<GpuShaderModule> {
    if debug {
        gpu.push_error_scope(wgpu::ErrorFilter::Validation);
    }

    let module = gpu.create_shader_module(&wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    if debug && let Some(message) = gpu.pop_error_scope() {
        tracing::error!(label, %message, "Shader failed to compile");
        return Err(RenderError::ShaderCompilation { label, message });
    }
    Ok(module)
}

fn build_pipeline(
    gpu: &dyn RenderContext,
    debug: bool,
    spec: &RenderPipelineSpec,
) -> RenderResult<GpuRenderPipeline> {
    if debug {
        gpu.push_error_scope(wgpu::ErrorFilter::Validation);
    }

    let pipeline = gpu.create_render_pipeline(spec);

    if debug && let Some(message) = gpu.pop_error_scope() {
        return Err(RenderError::ResourceCreation {
            resource: "render pipeline",
            message,
        });
    }
    Ok(pipeline)
}
