/// Composite pass: draws the refractive mesh onto the screen.
///
/// Reads both capture targets and the environment cube, clears the screen
/// colour and depth, and writes depth so the skybox can fill the rest.
/// `prepare` uploads the refraction parameters and the current surface size.
use std::sync::Arc;

use image::RgbaImage;

use crate::environment::EnvironmentCubemap;
use crate::error::RenderError;
use crate::geometry::{GeometryBatch, Vertex};
use crate::graph::{DepthCompare, FramePacket, PassDescriptor, RenderPass, TargetId};
use crate::pipeline::PipelineLayouts;
use crate::refraction::{RefractionParams, RefractionUniform};
use crate::render_target::RenderTarget;
use crate::resources::{buffer, texture};
use crate::shader::{PipelineConfig, ShaderProgram};
use crate::wgpu_backend::Wgpu;

pub const COMPOSITE_WGSL: &str = include_str!("../../../../assets/shaders/composite.wgsl");

/// Screen clear colour behind everything.
pub const CLEAR_COLOR: [f64; 4] = [0.0, 0.0, 0.0, 1.0];

/// Screen pass reading the `front` and `back` captures.
pub fn composite_descriptor(front: TargetId, back: TargetId) -> PassDescriptor {
    PassDescriptor::new("Composite Pass", TargetId::Screen)
        .clear_color(CLEAR_COLOR)
        .clear_depth(1.0)
        .depth(DepthCompare::NearerWins, true)
        .reads(front)
        .reads(back)
}

/// Base colour texture of one mesh primitive.
pub struct Material {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

impl Material {
    /// Uploads `image`, or a 1×1 white texture when the mesh is untextured.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        image: Option<&RgbaImage>,
    ) -> Self {
        let white = RgbaImage::from_pixel(1, 1, image::Rgba([255; 4]));
        let texture = texture::upload_rgba(device, queue, label, image.unwrap_or(&white));
        let view = texture::default_view(&texture);
        let sampler = texture::linear_sampler(device, label);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });
        Self {
            _texture: texture,
            bind_group,
        }
    }
}

pub struct CompositePass {
    descriptor: PassDescriptor,
    pipeline: wgpu::RenderPipeline,
    scene: Arc<wgpu::BindGroup>,
    inputs: wgpu::BindGroup,
    params: wgpu::Buffer,
    last_params: Option<RefractionUniform>,
    mesh: Arc<[GeometryBatch]>,
    materials: Vec<Material>,
}

/// Everything the composite pass binds besides the scene uniform.
pub struct CompositeResources<'a> {
    pub front: (TargetId, &'a RenderTarget),
    pub back: (TargetId, &'a RenderTarget),
    pub environment: &'a EnvironmentCubemap,
    pub surface_format: wgpu::TextureFormat,
    pub mesh: Arc<[GeometryBatch]>,
    /// One per mesh batch, same order.
    pub materials: Vec<Material>,
}

impl CompositePass {
    pub fn new(
        device: &wgpu::Device,
        program: &ShaderProgram,
        layouts: &PipelineLayouts,
        scene: Arc<wgpu::BindGroup>,
        res: CompositeResources<'_>,
    ) -> Result<Self, RenderError> {
        let descriptor = composite_descriptor(res.front.0, res.back.0);

        let pipeline = program.link(device, &PipelineConfig {
            label: &descriptor.label,
            bind_group_layouts: &[&layouts.scene, &layouts.composite_inputs, &layouts.material],
            vertex_buffers: &[Vertex::layout()],
            color_format: res.surface_format,
            depth: descriptor.depth,
        })?;

        let params = buffer::uniform(device, "Refraction Uniform Buffer", &RefractionUniform::new(&RefractionParams::default(), (1, 1)));
        let inputs = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Composite Inputs"),
            layout: &layouts.composite_inputs,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(res.front.1.color_view()?),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(res.back.1.color_view()?),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&res.environment.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&res.environment.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: params.as_entire_binding(),
                },
            ],
        });

        Ok(Self {
            descriptor,
            pipeline,
            scene,
            inputs,
            params,
            last_params: None,
            mesh: res.mesh,
            materials: res.materials,
        })
    }
}

impl RenderPass<Wgpu> for CompositePass {
    fn descriptor(&self) -> &PassDescriptor {
        &self.descriptor
    }

    fn prepare(&mut self, queue: &wgpu::Queue, packet: &FramePacket) {
        let uniform = RefractionUniform::new(&packet.refraction, packet.viewport);
        if self.last_params != Some(uniform) {
            buffer::write_uniform(queue, &self.params, &uniform);
            self.last_params = Some(uniform);
        }
    }

    fn record(&mut self, pass: &mut wgpu::RenderPass<'_>, _packet: &FramePacket) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &*self.scene, &[]);
        pass.set_bind_group(1, &self.inputs, &[]);
        for (batch, material) in self.mesh.iter().zip(&self.materials) {
            pass.set_bind_group(2, &material.bind_group, &[]);
            batch.draw(pass);
        }
    }
}
