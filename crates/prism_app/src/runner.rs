use std::sync::Arc;

use anyhow::Context as _;
use prism_core::glam::Vec3;
use prism_core::{CameraState, FlyController, InputState, TimeClock, Transform};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::config::AppConfig;
use crate::graphics::{GraphicsState, SceneAssets};

struct Runner {
    config: AppConfig,
    window: Option<Arc<Window>>,
    graphics: Option<GraphicsState>,
    input: InputState,
    controller: FlyController,
    camera: CameraState,
    clock: TimeClock,
    model: Transform,
    /// Set once a rejected model transform has been reported.
    transform_warned: bool,
    /// Fatal error that ended the loop.
    error: Option<anyhow::Error>,
}

impl Runner {
    fn new(config: AppConfig) -> Self {
        let mut controller = FlyController::with_default_wasd();
        controller.speed = config.camera.speed;
        controller.look_speed = config.camera.look_speed;
        let camera = CameraState::looking_at(Vec3::from(config.camera.position), Vec3::ZERO);
        let model = Transform::from_scale(config.model_scale);

        Self {
            config,
            window: None,
            graphics: None,
            input: InputState::new(),
            controller,
            camera,
            clock: TimeClock::new(),
            model,
            transform_warned: false,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ));
        let window = Arc::new(event_loop.create_window(attributes).context("creating window")?);

        let assets = SceneAssets::load(&self.config);
        let gfx = pollster::block_on(GraphicsState::new(window.clone(), &self.config, assets))?;

        self.window = Some(window);
        self.graphics = Some(gfx);
        Ok(())
    }
}

impl ApplicationHandler for Runner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }
        if let Err(err) = self.init_graphics(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(gfx) = &mut self.graphics {
                    gfx.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.input.update_key(code, event.state.is_pressed());
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.update_mouse_button(button, state.is_pressed());
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.set_mouse_position(position.x, position.y);
            }
            WindowEvent::Focused(false) => self.input.clear(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gfx), Some(window)) = (&mut self.graphics, &self.window) else {
            return;
        };

        let time = self.clock.tick();

        // ── 1. INPUT ─────────────────────────────────────────────────────────
        if self.controller.exit_requested(&self.input) {
            event_loop.exit();
            return;
        }
        self.camera = self.controller.update(self.camera, &mut self.input, time.delta);

        // ── 2. MODEL ─────────────────────────────────────────────────────────
        if self.config.spin_speed != 0.0 {
            self.model.rotate_y(self.config.spin_speed * time.delta);
        }
        if let Err(err) = gfx.renderer.set_model_transform(self.model.matrix()) {
            if !self.transform_warned {
                log::warn!("{err}");
                self.transform_warned = true;
            }
        }

        // ── 3. RENDER ────────────────────────────────────────────────────────
        if let Err(err) = gfx.render(&self.camera) {
            self.fail(event_loop, err);
            return;
        }

        window.request_redraw();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gfx) = &mut self.graphics {
            gfx.renderer.shutdown();
        }
    }
}

pub(crate) fn run_internal(config: AppConfig) -> anyhow::Result<()> {
    let mut runner = Runner::new(config);
    let event_loop = EventLoop::new().context("creating event loop")?;
    // Poll = spin the loop as fast as possible; vsync paces the frames.
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut runner).context("running event loop")?;
    match runner.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
