/// Skybox pass: fills the background behind the composited mesh.
///
/// Draws the `[-1, 1]` cube with the translation-free view, pinned to the far
/// plane by the shader. `LessEqual` with depth writes off lets it cover only
/// pixels still at the cleared depth. The next pass (or frame) gets its own
/// state again from the frame graph.
use std::sync::Arc;

use crate::environment::EnvironmentCubemap;
use crate::error::RenderError;
use crate::geometry::{primitives, GeometryBatch, SkyVertex};
use crate::graph::{DepthCompare, FramePacket, PassDescriptor, RenderPass, TargetId};
use crate::pipeline::PipelineLayouts;
use crate::shader::{PipelineConfig, ShaderProgram};
use crate::wgpu_backend::Wgpu;

pub const SKYBOX_WGSL: &str = include_str!("../../../../assets/shaders/skybox.wgsl");

pub fn skybox_descriptor() -> PassDescriptor {
    PassDescriptor::new("Skybox Pass", TargetId::Screen).depth(DepthCompare::EqualOrNearer, false)
}

pub struct SkyboxPass {
    descriptor: PassDescriptor,
    pipeline: wgpu::RenderPipeline,
    scene: Arc<wgpu::BindGroup>,
    environment: wgpu::BindGroup,
    cube: GeometryBatch,
}

impl SkyboxPass {
    pub fn new(
        device: &wgpu::Device,
        program: &ShaderProgram,
        layouts: &PipelineLayouts,
        surface_format: wgpu::TextureFormat,
        scene: Arc<wgpu::BindGroup>,
        cubemap: &EnvironmentCubemap,
    ) -> Result<Self, RenderError> {
        let descriptor = skybox_descriptor();
        let pipeline = program.link(device, &PipelineConfig {
            label: &descriptor.label,
            bind_group_layouts: &[&layouts.scene, &layouts.environment],
            vertex_buffers: &[SkyVertex::layout()],
            color_format: surface_format,
            depth: descriptor.depth,
        })?;

        let environment = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Skybox Environment"),
            layout: &layouts.environment,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&cubemap.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&cubemap.sampler),
                },
            ],
        });
        let cube = GeometryBatch::new(device, "Skybox Cube", &primitives::skybox_cube(), None);

        Ok(Self {
            descriptor,
            pipeline,
            scene,
            environment,
            cube,
        })
    }
}

impl RenderPass<Wgpu> for SkyboxPass {
    fn descriptor(&self) -> &PassDescriptor {
        &self.descriptor
    }

    fn record(&mut self, pass: &mut wgpu::RenderPass<'_>, _packet: &FramePacket) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &*self.scene, &[]);
        pass.set_bind_group(1, &self.environment, &[]);
        self.cube.draw(pass);
    }
}
