/// Colour attachment of a render target. Sampled by later passes, so it is
/// created with `TEXTURE_BINDING` as well as `RENDER_ATTACHMENT`.
use crate::render_target::AttachmentLayout;
use crate::resources::texture::{self, AttachmentDesc};

pub struct ColorAttachment {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub layout: AttachmentLayout,
}

impl ColorAttachment {
    pub fn new(device: &wgpu::Device, label: &str, layout: AttachmentLayout) -> Self {
        let texture = texture::create_attachment(device, &AttachmentDesc {
            label,
            width: layout.width,
            height: layout.height,
            format: layout.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
        });
        let view = texture::default_view(&texture);
        Self { texture, view, layout }
    }
}
