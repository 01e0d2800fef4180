/// Offscreen render targets.
///
/// A [`RenderTarget`] is a colour attachment and a combined depth/stencil
/// attachment bound as a unit. Its shape is first described by a
/// [`TargetLayout`], which is checked for completeness before anything is
/// allocated and again before every bind.
pub mod color;
pub mod depth;
pub mod layout;
pub mod target;

pub use color::ColorAttachment;
pub use depth::DepthStencilAttachment;
pub use layout::{AttachmentLayout, TargetLayout};
pub use target::RenderTarget;

/// Capture colour format: signed half floats keep unit normals without the
/// 8-bit quantisation.
pub const CAPTURE_COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Depth/stencil format for capture targets and the screen.
pub const DEPTH_STENCIL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;
