/// Production backend: records passes into a wgpu command encoder.
use crate::error::{GraphError, RenderError};
use crate::graph::{Backend, PassDescriptor, RenderState, TargetId};
use crate::render_target::RenderTarget;

/// Marker type selecting wgpu as the frame graph backend.
pub struct Wgpu;

/// Everything a pass may bind during one frame.
pub struct GpuFrame<'f> {
    pub encoder: &'f mut wgpu::CommandEncoder,
    /// Offscreen targets, indexed by [`TargetId::Offscreen`].
    pub targets: &'f [RenderTarget],
    /// Current surface texture view.
    pub screen_color: &'f wgpu::TextureView,
    pub screen_depth: &'f wgpu::TextureView,
}

/// Resolves the attachments of `desc.target` for the whole frame lifetime, so
/// the encoder can still be borrowed mutably afterwards.
fn resolve<'f>(
    targets: &'f [RenderTarget],
    screen: (&'f wgpu::TextureView, &'f wgpu::TextureView),
    desc: &PassDescriptor,
) -> Result<(&'f wgpu::TextureView, &'f wgpu::TextureView), RenderError> {
    match desc.target {
        TargetId::Screen => Ok(screen),
        TargetId::Offscreen(index) => targets
            .get(index)
            .ok_or_else(|| GraphError::UnknownTarget {
                pass: desc.label.clone(),
                index,
                count: targets.len(),
            })?
            .attachments(),
    }
}

impl Backend for Wgpu {
    type Context = wgpu::Queue;
    type Frame<'f> = GpuFrame<'f>;
    type Pass<'p> = wgpu::RenderPass<'p>;

    fn begin_pass<'p, 'f: 'p>(
        frame: &'p mut GpuFrame<'f>,
        desc: &PassDescriptor,
        state: &RenderState,
    ) -> Result<wgpu::RenderPass<'p>, RenderError> {
        let (color, depth) = resolve(frame.targets, (frame.screen_color, frame.screen_depth), desc)?;

        let color_load = match state.clear_color {
            Some([r, g, b, a]) => wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
            None => wgpu::LoadOp::Load,
        };
        let depth_load = match state.clear_depth {
            Some(d) => wgpu::LoadOp::Clear(d),
            None => wgpu::LoadOp::Load,
        };

        Ok(frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(&desc.label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: color_load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth,
                depth_ops: Some(wgpu::Operations {
                    load: depth_load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(0),
                    store: wgpu::StoreOp::Discard,
                }),
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        }))
    }
}
