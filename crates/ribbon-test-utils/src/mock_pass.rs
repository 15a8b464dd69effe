//! Recording implementation of [`DrawPass`].

use std::ops::Range;

use crate::{
    draw_pass::DrawPass,
    gpu_types::{GpuBindGroup, GpuRenderPipeline},
};

/// Maximum bind group slots tracked per draw.
const MAX_BIND_GROUPS: usize = 4;

/// A raw command recorded by [`MockDrawPass`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassCommand {
    SetPipeline { pipeline_id: usize },
    SetBindGroup { index: u32, bind_group_id: usize },
    Draw { vertices: Range<u32> },
    PushDebugGroup { label: String },
    PopDebugGroup,
}

/// A draw call together with the state bound when it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDraw {
    pub pipeline_id: Option<usize>,
    pub bind_groups: [Option<usize>; MAX_BIND_GROUPS],
    pub vertices: Range<u32>,
}

impl RecordedDraw {
    pub fn vertex_count(&self) -> u32 {
        self.vertices.end - self.vertices.start
    }
}

/// Render pass stand-in that records commands instead of encoding them.
#[derive(Debug, Default)]
pub struct MockDrawPass {
    commands: Vec<PassCommand>,
    draws: Vec<RecordedDraw>,
    pipeline: Option<usize>,
    bind_groups: [Option<usize>; MAX_BIND_GROUPS],
}

impl MockDrawPass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PassCommand] {
        &self.commands
    }

    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    pub fn draw_count(&self) -> usize {
        self.draws.len()
    }

    /// Forget recorded commands while keeping the bound state.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.draws.clear();
    }
}

impl DrawPass for MockDrawPass {
    fn set_pipeline(&mut self, pipeline: &GpuRenderPipeline) {
        let pipeline_id = pipeline.mock_id().unwrap_or(usize::MAX);
        self.pipeline = Some(pipeline_id);
        self.commands.push(PassCommand::SetPipeline { pipeline_id });
    }

    fn set_bind_group(&mut self, index: u32, bind_group: &GpuBindGroup) {
        let bind_group_id = bind_group.mock_id().unwrap_or(usize::MAX);
        if let Some(slot) = self.bind_groups.get_mut(index as usize) {
            *slot = Some(bind_group_id);
        }
        self.commands.push(PassCommand::SetBindGroup {
            index,
            bind_group_id,
        });
    }

    fn draw(&mut self, vertices: Range<u32>) {
        self.draws.push(RecordedDraw {
            pipeline_id: self.pipeline,
            bind_groups: self.bind_groups,
            vertices: vertices.clone(),
        });
        self.commands.push(PassCommand::Draw { vertices });
    }

    fn push_debug_group(&mut self, label: &str) {
        self.commands.push(PassCommand::PushDebugGroup {
            label: label.to_string(),
        });
    }

    fn pop_debug_group(&mut self) {
        self.commands.push(PassCommand::PopDebugGroup);
    }
}
