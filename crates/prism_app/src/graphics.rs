use std::sync::Arc;

use anyhow::Context as _;
use prism_assets::{CubemapFaces, MeshData};
use prism_core::{CameraState, ContextError, EngineContext};
use prism_renderer::Renderer;
use winit::window::Window;

use crate::config::AppConfig;

/// Edge length of the generated sky when no faces are configured.
const GRADIENT_SIZE: u32 = 256;

/// Model and environment for the renderer. Loading never fails: missing or
/// broken files fall back to the built-in cube and a gradient sky.
pub struct SceneAssets {
    pub meshes: Vec<MeshData>,
    pub environment: CubemapFaces,
}

impl SceneAssets {
    pub fn load(config: &AppConfig) -> Self {
        let meshes = match &config.model_path {
            Some(path) => match prism_assets::load_model(path) {
                Ok(meshes) => meshes,
                Err(err) => {
                    log::warn!("{err}; falling back to the built-in cube");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        let environment = match &config.skybox_faces {
            Some(paths) => CubemapFaces::load(paths),
            None => CubemapFaces::gradient(GRADIENT_SIZE, [70, 120, 200], [215, 225, 235], [45, 40, 38]),
        };
        Self { meshes, environment }
    }
}

pub struct GraphicsState {
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
    pub renderer: Renderer,
}

impl GraphicsState {
    pub async fn new(window: Arc<Window>, app: &AppConfig, assets: SceneAssets) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| ContextError::Surface(e.to_string()))?;
        let context = EngineContext::new_with_instance(instance, Some(&surface))
            .await
            .context("creating GPU context")?;

        let caps = surface.get_capabilities(&context.adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| ContextError::Surface("surface reports no formats".into()))?;
        let present_mode = if app.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };
        surface.configure(&context.device, &config);

        let mut renderer = Renderer::new(
            context,
            config.width,
            config.height,
            config.format,
            &assets.meshes,
            &assets.environment,
            app.refraction.params(),
        )
        .context("building renderer")?;
        renderer.projection.fovy = app.camera.fovy();

        Ok(Self {
            surface,
            config,
            renderer,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.reconfigure();
            self.renderer.resize(width, height);
        }
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.renderer.context.device, &self.config);
    }

    /// Renders and presents one frame. An error means the loop must stop.
    pub fn render(&mut self, camera: &CameraState) -> anyhow::Result<()> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated; reconfiguring");
                self.reconfigure();
                return Ok(());
            }
            Err(err @ wgpu::SurfaceError::OutOfMemory) => {
                return Err(err).context("acquiring surface texture");
            }
            Err(err) => {
                log::warn!("skipping frame: {err}");
                return Ok(());
            }
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.renderer.render(camera, &view)?;
        frame.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_builtin_cube_and_gradient_sky() {
        let assets = SceneAssets::load(&AppConfig::default());
        assert!(assets.meshes.is_empty());
        assert_eq!(assets.environment.size, GRADIENT_SIZE);
        assert_eq!(assets.environment.missing().count(), 0);
    }

    #[test]
    fn broken_paths_degrade() {
        let dir = tempfile::tempdir().unwrap();
        let missing = |name: &str| dir.path().join(name);
        let config = AppConfig {
            model_path: Some(missing("model.glb")),
            skybox_faces: Some(["a", "b", "c", "d", "e", "f"].map(missing)),
            ..Default::default()
        };

        let assets = SceneAssets::load(&config);
        assert!(assets.meshes.is_empty());
        assert_eq!(assets.environment.size, 1);
        assert_eq!(assets.environment.missing().count(), 6);
    }
}
