//! [`RenderContext`] backed by the wgpu device and queue.

use crate::context::GraphicsContext;
use ribbon_test_utils::{
    BindGroupSpec, BindingSpec, GpuBindGroup, GpuBindGroupLayout, GpuBuffer, GpuRenderPipeline,
    GpuShaderModule, GpuTexture, RenderContext, RenderPipelineSpec, TextureRegion,
};
use wgpu::{
    BindGroupLayoutDescriptor, BufferDescriptor, ErrorFilter, ShaderModuleDescriptor,
    TextureDescriptor,
};

impl RenderContext for GraphicsContext {
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer {
        GpuBuffer::from_wgpu(self.device.create_buffer(desc))
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        self.queue.write_buffer(buffer.as_wgpu(), offset, data);
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture {
        GpuTexture::from_wgpu(self.device.create_texture(desc))
    }

    fn write_texture(&self, texture: &GpuTexture, region: TextureRegion, data: &[u8]) {
        let texel_size = texture.format().block_copy_size(None).unwrap_or(16);
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: texture.as_wgpu(),
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: region.x,
                    y: region.y,
                    z: 0,
                },
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(region.width * texel_size),
                rows_per_image: Some(region.height),
            },
            wgpu::Extent3d {
                width: region.width,
                height: region.height,
                depth_or_array_layers: 1,
            },
        );
    }

    fn destroy_texture(&self, texture: &GpuTexture) {
        texture.as_wgpu().destroy();
    }

    fn create_shader_module(&self, desc: &ShaderModuleDescriptor) -> GpuShaderModule {
        GpuShaderModule::from_wgpu(self.device.create_shader_module(desc.clone()))
    }

    fn create_render_pipeline(&self, spec: &RenderPipelineSpec) -> GpuRenderPipeline {
        let layouts: Vec<&wgpu::BindGroupLayout> = spec
            .bind_group_layouts
            .iter()
            .map(|layout| layout.as_wgpu())
            .collect();

        let layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: spec.label,
                bind_group_layouts: &layouts,
                push_constant_ranges: &[],
            });

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: spec.label,
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: spec.shader.as_wgpu(),
                    entry_point: Some(spec.vertex_entry),
                    buffers: &[],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: spec.shader.as_wgpu(),
                    entry_point: Some(spec.fragment_entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: spec.target_format,
                        blend: spec.blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: spec.topology,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        GpuRenderPipeline::from_wgpu(pipeline)
    }

    fn create_bind_group_layout(&self, desc: &BindGroupLayoutDescriptor) -> GpuBindGroupLayout {
        GpuBindGroupLayout::from_wgpu(self.device.create_bind_group_layout(desc))
    }

    fn create_bind_group(&self, spec: &BindGroupSpec) -> GpuBindGroup {
        let entries: Vec<wgpu::BindGroupEntry> = spec
            .entries
            .iter()
            .enumerate()
            .map(|(binding, entry)| wgpu::BindGroupEntry {
                binding: binding as u32,
                resource: match entry {
                    BindingSpec::Buffer(buffer) => buffer.as_wgpu().as_entire_binding(),
                    BindingSpec::Texture(texture) => {
                        wgpu::BindingResource::TextureView(texture.view())
                    }
                },
            })
            .collect();

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: spec.label,
            layout: spec.layout.as_wgpu(),
            entries: &entries,
        });

        GpuBindGroup::from_wgpu(bind_group)
    }

    fn max_texture_dimension_2d(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    fn push_error_scope(&self, filter: ErrorFilter) {
        self.device.push_error_scope(filter);
    }

    fn pop_error_scope(&self) -> Option<String> {
        pollster::block_on(self.device.pop_error_scope()).map(|error| error.to_string())
    }
}
