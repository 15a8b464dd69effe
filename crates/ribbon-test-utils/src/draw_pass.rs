//! Trait abstracting the render pass commands used for drawing.

use std::ops::Range;

use crate::gpu_types::{GpuBindGroup, GpuRenderPipeline};

/// The subset of render pass commands issued by the streaming renderer.
///
/// Implemented for `wgpu::RenderPass` and, with the `mock` feature, for
/// [`MockDrawPass`](crate::MockDrawPass).
pub trait DrawPass {
    fn set_pipeline(&mut self, pipeline: &GpuRenderPipeline);

    fn set_bind_group(&mut self, index: u32, bind_group: &GpuBindGroup);

    /// Draw a single instance over the given vertex range.
    fn draw(&mut self, vertices: Range<u32>);

    fn push_debug_group(&mut self, _label: &str) {}

    fn pop_debug_group(&mut self) {}
}

impl DrawPass for wgpu::RenderPass<'_> {
    fn set_pipeline(&mut self, pipeline: &GpuRenderPipeline) {
        wgpu::RenderPass::set_pipeline(self, pipeline.as_wgpu());
    }

    fn set_bind_group(&mut self, index: u32, bind_group: &GpuBindGroup) {
        wgpu::RenderPass::set_bind_group(self, index, bind_group.as_wgpu(), &[]);
    }

    fn draw(&mut self, vertices: Range<u32>) {
        wgpu::RenderPass::draw(self, vertices, 0..1);
    }

    fn push_debug_group(&mut self, label: &str) {
        wgpu::RenderPass::push_debug_group(self, label);
    }

    fn pop_debug_group(&mut self) {
        wgpu::RenderPass::pop_debug_group(self);
    }
}
