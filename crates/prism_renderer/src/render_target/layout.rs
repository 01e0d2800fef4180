//! Pure description of a render target, checked without touching the GPU.

use crate::error::Incomplete;
use crate::render_target::{CAPTURE_COLOR_FORMAT, DEPTH_STENCIL_FORMAT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentLayout {
    pub format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetLayout {
    pub width: u32,
    pub height: u32,
    pub color: Option<AttachmentLayout>,
    pub depth_stencil: Option<AttachmentLayout>,
}

impl TargetLayout {
    /// Both attachments sized to `width`×`height` in the capture formats.
    pub fn capture(width: u32, height: u32) -> Self {
        Self::color_only(width, height).with_depth_stencil(DEPTH_STENCIL_FORMAT)
    }

    /// A colour attachment and nothing else. Never complete.
    pub fn color_only(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            color: Some(AttachmentLayout { format: CAPTURE_COLOR_FORMAT, width, height }),
            depth_stencil: None,
        }
    }

    pub fn with_depth_stencil(mut self, format: wgpu::TextureFormat) -> Self {
        self.depth_stencil = Some(AttachmentLayout {
            format,
            width: self.width,
            height: self.height,
        });
        self
    }

    /// Checks that the target can be allocated and drawn into on a device
    /// whose largest texture edge is `max_dimension`.
    pub fn check_complete(&self, max_dimension: u32) -> Result<(), Incomplete> {
        let (width, height) = (self.width, self.height);
        if width == 0 || height == 0 {
            return Err(Incomplete::ZeroSize { width, height });
        }
        if width > max_dimension || height > max_dimension {
            return Err(Incomplete::TooLarge { width, height, limit: max_dimension });
        }

        let color = self.color.ok_or(Incomplete::MissingColor)?;
        let depth = self.depth_stencil.ok_or(Incomplete::MissingDepthStencil)?;

        for (attachment, a) in [("colour", color), ("depth/stencil", depth)] {
            if (a.width, a.height) != (width, height) {
                return Err(Incomplete::SizeMismatch {
                    attachment,
                    width: a.width,
                    height: a.height,
                    target_width: width,
                    target_height: height,
                });
            }
        }

        if color.format.is_depth_stencil_format() {
            return Err(Incomplete::BadColorFormat(color.format));
        }
        if !depth.format.is_combined_depth_stencil_format() {
            return Err(Incomplete::BadDepthStencilFormat(depth.format));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: u32 = 8192;

    #[test]
    fn capture_layouts_are_complete() {
        for (w, h) in [(1, 1), (800, 600), (1920, 1080), (LIMIT, 3)] {
            assert_eq!(TargetLayout::capture(w, h).check_complete(LIMIT), Ok(()));
        }
    }

    #[test]
    fn colour_alone_is_incomplete() {
        assert_eq!(
            TargetLayout::color_only(64, 64).check_complete(LIMIT),
            Err(Incomplete::MissingDepthStencil)
        );
    }

    #[test]
    fn degenerate_sizes_are_rejected() {
        assert!(matches!(
            TargetLayout::capture(0, 10).check_complete(LIMIT),
            Err(Incomplete::ZeroSize { .. })
        ));
        assert!(matches!(
            TargetLayout::capture(LIMIT + 1, 10).check_complete(LIMIT),
            Err(Incomplete::TooLarge { .. })
        ));
    }

    #[test]
    fn attachments_must_match_target() {
        let mut layout = TargetLayout::capture(64, 64);
        if let Some(c) = layout.color.as_mut() {
            c.width = 32;
        }
        assert!(matches!(
            layout.check_complete(LIMIT),
            Err(Incomplete::SizeMismatch { attachment: "colour", .. })
        ));
    }

    #[test]
    fn depth_without_stencil_is_rejected() {
        let layout = TargetLayout::color_only(16, 16).with_depth_stencil(wgpu::TextureFormat::Depth32Float);
        assert_eq!(
            layout.check_complete(LIMIT),
            Err(Incomplete::BadDepthStencilFormat(wgpu::TextureFormat::Depth32Float))
        );

        let mut layout = TargetLayout::capture(16, 16);
        layout.color = Some(AttachmentLayout { format: DEPTH_STENCIL_FORMAT, width: 16, height: 16 });
        assert!(matches!(layout.check_complete(LIMIT), Err(Incomplete::BadColorFormat(_))));
    }
}
