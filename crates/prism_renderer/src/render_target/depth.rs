/// Combined depth/stencil attachment.
///
/// Also used on its own as the screen depth buffer, which is recreated
/// whenever the surface is resized.
use crate::render_target::{AttachmentLayout, DEPTH_STENCIL_FORMAT};
use crate::resources::texture::{self, AttachmentDesc};

pub struct DepthStencilAttachment {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub layout: AttachmentLayout,
}

impl DepthStencilAttachment {
    pub fn new(device: &wgpu::Device, label: &str, layout: AttachmentLayout) -> Self {
        let texture = texture::create_attachment(device, &AttachmentDesc {
            label,
            width: layout.width,
            height: layout.height,
            format: layout.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        });
        let view = texture::default_view(&texture);
        Self { texture, view, layout }
    }

    /// Screen depth buffer for a `width`×`height` surface.
    pub fn screen(device: &wgpu::Device, width: u32, height: u32) -> Self {
        Self::new(device, "Screen Depth", AttachmentLayout {
            format: DEPTH_STENCIL_FORMAT,
            width: width.max(1),
            height: height.max(1),
        })
    }

    /// Recreates the buffer if the size changed.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) == (self.layout.width, self.layout.height) {
            return;
        }
        self.texture.destroy();
        *self = Self::new(device, "Screen Depth", AttachmentLayout { width, height, ..self.layout });
    }
}
