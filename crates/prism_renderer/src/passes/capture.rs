/// Front and back surface capture passes.
///
/// Both rasterise the refractive mesh from the same view with culling off.
/// The front pass keeps the nearest fragment (clear depth 1, `Less`); the back
/// pass keeps the farthest (clear depth 0, `Greater`). Each writes the
/// world-space outward normal and coverage 1 into its own offscreen target,
/// fully overwriting it every frame.
use std::sync::Arc;

use crate::error::RenderError;
use crate::geometry::{GeometryBatch, Vertex};
use crate::graph::{DepthCompare, FramePacket, PassDescriptor, RenderPass, TargetId};
use crate::pipeline::PipelineLayouts;
use crate::render_target::CAPTURE_COLOR_FORMAT;
use crate::shader::{PipelineConfig, ShaderProgram};
use crate::wgpu_backend::Wgpu;

pub const CAPTURE_WGSL: &str = include_str!("../../../../assets/shaders/capture.wgsl");

/// Which surface a capture keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSide {
    Front,
    Back,
}

impl CaptureSide {
    /// Descriptor writing into `target`. Colour is cleared to zero so
    /// uncovered pixels read as "no surface".
    pub fn descriptor(self, target: TargetId) -> PassDescriptor {
        match self {
            CaptureSide::Front => PassDescriptor::new("Front-Normal Pass", target)
                .clear_color([0.0; 4])
                .clear_depth(1.0)
                .depth(DepthCompare::NearerWins, true),
            CaptureSide::Back => PassDescriptor::new("Back-Normal Pass", target)
                .clear_color([0.0; 4])
                .clear_depth(0.0)
                .depth(DepthCompare::FartherWins, true),
        }
    }
}

pub struct CapturePass {
    descriptor: PassDescriptor,
    pipeline: wgpu::RenderPipeline,
    scene: Arc<wgpu::BindGroup>,
    mesh: Arc<[GeometryBatch]>,
}

impl CapturePass {
    pub fn new(
        device: &wgpu::Device,
        program: &ShaderProgram,
        layouts: &PipelineLayouts,
        side: CaptureSide,
        target: TargetId,
        scene: Arc<wgpu::BindGroup>,
        mesh: Arc<[GeometryBatch]>,
    ) -> Result<Self, RenderError> {
        let descriptor = side.descriptor(target);
        let pipeline = program.link(device, &PipelineConfig {
            label: &descriptor.label,
            bind_group_layouts: &[&layouts.scene],
            vertex_buffers: &[Vertex::layout()],
            color_format: CAPTURE_COLOR_FORMAT,
            depth: descriptor.depth,
        })?;
        Ok(Self {
            descriptor,
            pipeline,
            scene,
            mesh,
        })
    }
}

impl RenderPass<Wgpu> for CapturePass {
    fn descriptor(&self) -> &PassDescriptor {
        &self.descriptor
    }

    fn record(&mut self, pass: &mut wgpu::RenderPass<'_>, _packet: &FramePacket) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &*self.scene, &[]);
        for batch in self.mesh.iter() {
            batch.draw(pass);
        }
    }
}
