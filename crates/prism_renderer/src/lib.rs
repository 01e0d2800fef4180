//! `prism_renderer`: screen-space refraction of one mesh against a skybox.
//!
//! # Module layout
//!
//! | Module            | Responsibility                                        |
//! |-------------------|-------------------------------------------------------|
//! | `resources`       | Low-level buffer / texture allocation helpers         |
//! | `geometry`        | `Vertex`, `GeometryBatch`, built-in cube primitives   |
//! | `render_target`   | Offscreen colour + depth/stencil capture targets      |
//! | `environment`     | Six-face environment cubemap on the GPU               |
//! | `shader`          | WGSL compile / pipeline link with error capture       |
//! | `pipeline`        | Shared bind-group layouts                             |
//! | `uniforms`        | Per-frame scene uniform                               |
//! | `model_transform` | Last-known-good model matrix                          |
//! | `refraction`      | Refraction parameters and CPU shading reference       |
//! | `graph`           | `RenderPass`/`Backend` traits, `FrameGraph`, packets  |
//! | `passes`          | Front/back capture, composite, skybox                 |
//! | `wgpu_backend`    | `Backend` implementation recording into wgpu          |
//! | `raster`          | CPU reference rasteriser for the same passes          |
pub mod environment;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod model_transform;
pub mod passes;
pub mod pipeline;
pub mod raster;
pub mod refraction;
pub mod render_target;
pub mod resources;
pub mod shader;
pub mod uniforms;
pub mod wgpu_backend;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use glam;

pub use environment::EnvironmentCubemap;
pub use error::{GraphError, Incomplete, RenderError};
pub use geometry::{GeometryBatch, Vertex};
pub use graph::{FrameGraph, FramePacket, FrameStats, PassDescriptor, RenderPass, RenderState};
pub use model_transform::ModelTransform;
pub use refraction::RefractionParams;
pub use render_target::RenderTarget;

// ── Internal imports ──────────────────────────────────────────────────────────

use std::sync::Arc;

use glam::Mat4;
use prism_assets::{CubemapFaces, MeshData};
use prism_core::{CameraState, EngineContext, Projection};

use graph::TargetId;
use passes::{
    CapturePass, CaptureSide, CompositePass, CompositeResources, Material, SkyboxPass,
    CAPTURE_WGSL, COMPOSITE_WGSL, SKYBOX_WGSL,
};
use pipeline::PipelineLayouts;
use render_target::DepthStencilAttachment;
use shader::ShaderProgram;
use uniforms::GpuScene;
use wgpu_backend::{GpuFrame, Wgpu};

const FRONT: usize = 0;
const BACK: usize = 1;

/// Frames between two statistics lines in the debug log.
const STATS_INTERVAL: u64 = 300;

// ── Renderer ──────────────────────────────────────────────────────────────────

/// Top-level renderer.
///
/// Owns the GPU resources and a fixed [`FrameGraph`] of four passes:
/// Front-Normal capture, Back-Normal capture, Composite and Skybox. Each call
/// to [`Renderer::render`] runs them once, in that order, into the supplied
/// surface view.
///
/// Capture targets are sized once at construction; the composite scales its
/// reads to the current surface, so resizing only touches the screen depth
/// buffer and the projection.
pub struct Renderer {
    pub context: EngineContext,
    graph: FrameGraph<Wgpu>,
    /// `[front, back]`, indexed by [`TargetId::Offscreen`].
    targets: Vec<RenderTarget>,
    screen_depth: DepthStencilAttachment,
    scene: GpuScene,
    _environment: EnvironmentCubemap,

    pub projection: Projection,
    model: ModelTransform,
    refraction: RefractionParams,

    width: u32,
    height: u32,
}

impl Renderer {
    /// Builds every target, pipeline and pass.
    ///
    /// `meshes` are the primitives of the refractive model; when empty the
    /// built-in unit cube is used instead.
    pub fn new(
        context: EngineContext,
        width: u32,
        height: u32,
        surface_format: wgpu::TextureFormat,
        meshes: &[MeshData],
        environment: &CubemapFaces,
        refraction: RefractionParams,
    ) -> Result<Self, RenderError> {
        let (width, height) = (width.max(1), height.max(1));
        let device = &context.device;
        let queue = &context.queue;

        let layouts = PipelineLayouts::new(device);
        let targets = vec![
            RenderTarget::capture(device, "Front Capture", width, height)?,
            RenderTarget::capture(device, "Back Capture", width, height)?,
        ];
        let screen_depth = DepthStencilAttachment::screen(device, width, height);
        let scene = GpuScene::new(device, &layouts.scene);
        let cubemap = EnvironmentCubemap::upload(device, queue, environment);

        let (batches, materials) = upload_meshes(device, queue, &layouts, meshes);
        let mesh: Arc<[GeometryBatch]> = batches.into();

        let capture = ShaderProgram::compile(device, "Capture Shader", CAPTURE_WGSL)?;
        let composite = ShaderProgram::compile(device, "Composite Shader", COMPOSITE_WGSL)?;
        let skybox = ShaderProgram::compile(device, "Skybox Shader", SKYBOX_WGSL)?;

        let (front, back) = (TargetId::Offscreen(FRONT), TargetId::Offscreen(BACK));
        let passes: Vec<Box<dyn RenderPass<Wgpu>>> = vec![
            Box::new(CapturePass::new(
                device,
                &capture,
                &layouts,
                CaptureSide::Front,
                front,
                scene.bind_group.clone(),
                mesh.clone(),
            )?),
            Box::new(CapturePass::new(
                device,
                &capture,
                &layouts,
                CaptureSide::Back,
                back,
                scene.bind_group.clone(),
                mesh.clone(),
            )?),
            Box::new(CompositePass::new(
                device,
                &composite,
                &layouts,
                scene.bind_group.clone(),
                CompositeResources {
                    front: (front, &targets[FRONT]),
                    back: (back, &targets[BACK]),
                    environment: &cubemap,
                    surface_format,
                    mesh: mesh.clone(),
                    materials,
                },
            )?),
            Box::new(SkyboxPass::new(
                device,
                &skybox,
                &layouts,
                surface_format,
                scene.bind_group.clone(),
                &cubemap,
            )?),
        ];
        let graph = FrameGraph::new(passes, targets.len())?;

        let mut projection = Projection::default();
        projection.set_viewport(width, height);

        log::info!(
            "renderer ready: {width}x{height} {surface_format:?}, {} mesh batch(es), {} triangles, cubemap {}px",
            mesh.len(),
            mesh.iter().map(GeometryBatch::primitive_count).sum::<u32>(),
            cubemap.size
        );

        Ok(Self {
            context,
            graph,
            targets,
            screen_depth,
            scene,
            _environment: cubemap,
            projection,
            model: ModelTransform::new(),
            refraction,
            width,
            height,
        })
    }

    /// Adapts to a new surface size. Zero-sized surfaces are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
        self.screen_depth.resize(&self.context.device, width, height);
        self.projection.set_viewport(width, height);
        log::debug!(
            "resized to {width}x{height}; capture targets stay {:?}",
            self.targets[FRONT].size()
        );
    }

    /// Replaces the model transform. A singular or non-finite matrix is
    /// refused and the previous one stays in use.
    pub fn set_model_transform(&mut self, model: Mat4) -> Result<(), RenderError> {
        self.model.update(model)
    }

    #[inline]
    pub fn model_transform(&self) -> Mat4 {
        self.model.matrix()
    }

    pub fn set_refraction(&mut self, params: RefractionParams) {
        self.refraction = params;
    }

    #[inline]
    pub fn refraction(&self) -> &RefractionParams {
        &self.refraction
    }

    /// Renders one frame into `view` and submits it.
    pub fn render(&mut self, camera: &CameraState, view: &wgpu::TextureView) -> Result<FrameStats, RenderError> {
        let packet = FramePacket {
            frame_index: self.graph.frames(),
            view: camera.view_matrix(),
            sky_view: camera.rotation_only_view(),
            projection: self.projection.matrix(),
            model: self.model.matrix(),
            camera_position: camera.position,
            viewport: (self.width, self.height),
            refraction: self.refraction,
        };
        self.scene.sync(&self.context.queue, &packet);

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Prism Frame Encoder"),
            });

        let stats = {
            let mut frame = GpuFrame {
                encoder: &mut encoder,
                targets: &self.targets,
                screen_color: view,
                screen_depth: &self.screen_depth.view,
            };
            self.graph.execute(&self.context.queue, &mut frame, &packet)?
        };
        self.context.queue.submit(std::iter::once(encoder.finish()));

        if stats.frame_index % STATS_INTERVAL == 0 {
            log::debug!(
                "frame {}: {} passes, {} rejected model transform(s)",
                stats.frame_index,
                stats.passes,
                self.model.rejected()
            );
        }
        Ok(stats)
    }

    /// State flags as seen between frames.
    #[inline]
    pub fn render_state(&self) -> &RenderState {
        self.graph.state()
    }

    pub fn pass_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.pass_names()
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Releases the capture targets. Rendering afterwards fails with
    /// [`Incomplete::Destroyed`].
    pub fn shutdown(&mut self) {
        for target in &mut self.targets {
            target.destroy();
        }
        log::info!("renderer shut down after {} frame(s)", self.graph.frames());
    }
}

/// Uploads every primitive that draws at least one triangle, with its
/// material. Falls back to the built-in cube when none does.
fn upload_meshes(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layouts: &PipelineLayouts,
    meshes: &[MeshData],
) -> (Vec<GeometryBatch>, Vec<Material>) {
    let meshes: Vec<&MeshData> = meshes
        .iter()
        .filter(|mesh| {
            let drawable = !mesh.vertices.is_empty() && mesh.triangle_count() > 0;
            if !drawable {
                log::warn!("{}: no complete triangle, not uploaded", mesh.name);
            }
            drawable
        })
        .collect();
    if meshes.is_empty() {
        let (vertices, indices) = geometry::primitives::cube_indexed();
        let batch = GeometryBatch::new(device, "Built-in Cube", &vertices, Some(&indices));
        let material = Material::new(device, queue, &layouts.material, "Built-in Cube Material", None);
        return (vec![batch], vec![material]);
    }
    meshes
        .iter()
        .map(|mesh| {
            let batch = GeometryBatch::from_mesh(device, mesh);
            let material = Material::new(
                device,
                queue,
                &layouts.material,
                &format!("{} Material", mesh.name),
                mesh.base_color.as_ref(),
            );
            (batch, material)
        })
        .unzip()
}
