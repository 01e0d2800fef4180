use std::sync::Arc;

use anyhow::Context as _;
use thiserror::Error;

/// Shared wgpu handles used by every part of the renderer.
///
/// `Device` and `Queue` are `Arc`-wrapped so passes and loaders can keep a
/// cheap clone; `Instance` and `Adapter` stay owned here because only surface
/// creation needs them.
pub struct EngineContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
}

/// Startup failures. All of them are fatal: no frame can run without a device.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("no suitable GPU adapter was found")]
    AdapterUnavailable,
    #[error("device request failed: {0}")]
    DeviceRequest(String),
    #[error("surface creation failed: {0}")]
    Surface(String),
}

impl EngineContext {
    /// Creates a headless context (no surface), used by tests and
    /// render-to-texture tooling.
    pub async fn new() -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        Self::new_with_instance(instance, None).await
    }

    /// Creates a context from an existing `Instance`, optionally requiring the
    /// adapter to be able to present to `compatible_surface`.
    pub async fn new_with_instance(
        instance: wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> anyhow::Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await
            .context(ContextError::AdapterUnavailable)?;

        let info = adapter.get_info();
        log::info!("selected adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Prism Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(|e| ContextError::DeviceRequest(e.to_string()))?;

        device.on_uncaptured_error(Box::new(|err| {
            log::error!("uncaptured wgpu error: {err}");
        }));

        Ok(Self {
            instance,
            adapter,
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    /// Headless context for tests: `None` when the machine has no usable
    /// adapter, so GPU tests can bail out instead of failing.
    pub fn try_headless() -> Option<Self> {
        match pollster::block_on(Self::new()) {
            Ok(ctx) => Some(ctx),
            Err(err) => {
                log::warn!("headless context unavailable: {err:#}");
                None
            }
        }
    }
}
