//! Shader programs.
//!
//! WGSL is compiled inside a validation error scope so a bad source fails
//! with [`RenderError::Compile`] and the naga diagnostic, instead of an
//! uncaptured error later. Pipelines are linked the same way and fail with
//! [`RenderError::Link`].

use crate::error::RenderError;
use crate::graph::DepthState;
use crate::render_target::DEPTH_STENCIL_FORMAT;

pub struct ShaderProgram {
    label: String,
    module: wgpu::ShaderModule,
}

/// Fixed-function state for [`ShaderProgram::link`].
pub struct PipelineConfig<'a> {
    pub label: &'a str,
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub color_format: wgpu::TextureFormat,
    pub depth: DepthState,
}

impl ShaderProgram {
    /// Compiles `source`, which must define `vs_main` and `fs_main`.
    pub fn compile(device: &wgpu::Device, label: &str, source: &str) -> Result<Self, RenderError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::Compile {
                label: label.to_owned(),
                log: err.to_string(),
            });
        }
        Ok(Self {
            label: label.to_owned(),
            module,
        })
    }

    /// Links the program into a render pipeline. Faces are never culled: the
    /// capture passes pick front or back surfaces by depth test alone.
    pub fn link(&self, device: &wgpu::Device, config: &PipelineConfig<'_>) -> Result<wgpu::RenderPipeline, RenderError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(config.label),
            bind_group_layouts: config.bind_group_layouts,
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(config.label),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &self.module,
                entry_point: Some("vs_main"),
                buffers: config.vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(config.depth.to_wgpu(DEPTH_STENCIL_FORMAT)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::Link {
                label: config.label.to_owned(),
                log: err.to_string(),
            });
        }
        log::debug!("linked `{}` from `{}`", config.label, self.label);
        Ok(pipeline)
    }
}
