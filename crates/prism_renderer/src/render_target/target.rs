/// A complete offscreen target: [`ColorAttachment`] plus
/// [`DepthStencilAttachment`], bound together.
///
/// Creation checks the layout, then allocates inside wgpu error scopes so a
/// backend rejection surfaces as [`RenderError::IncompleteTarget`] right away.
/// Targets are fixed-size for their lifetime.
use crate::error::{Incomplete, RenderError};
use crate::render_target::{ColorAttachment, DepthStencilAttachment, TargetLayout};

pub struct RenderTarget {
    label: String,
    layout: TargetLayout,
    color: Option<ColorAttachment>,
    depth_stencil: Option<DepthStencilAttachment>,
}

impl RenderTarget {
    pub fn create(device: &wgpu::Device, label: &str, layout: TargetLayout) -> Result<Self, RenderError> {
        let incomplete = |reason| RenderError::IncompleteTarget {
            label: label.to_owned(),
            reason,
        };

        layout
            .check_complete(device.limits().max_texture_dimension_2d)
            .map_err(incomplete)?;
        let color_layout = layout.color.ok_or(incomplete(Incomplete::MissingColor))?;
        let depth_layout = layout
            .depth_stencil
            .ok_or(incomplete(Incomplete::MissingDepthStencil))?;

        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let color = ColorAttachment::new(device, &format!("{label} Color"), color_layout);
        let depth = DepthStencilAttachment::new(device, &format!("{label} Depth/Stencil"), depth_layout);
        let validation = pollster::block_on(device.pop_error_scope());
        let out_of_memory = pollster::block_on(device.pop_error_scope());

        let mut target = Self {
            label: label.to_owned(),
            layout,
            color: Some(color),
            depth_stencil: Some(depth),
        };
        if let Some(err) = validation.or(out_of_memory) {
            target.destroy();
            return Err(incomplete(Incomplete::Backend(err.to_string())));
        }

        log::debug!(
            "render target `{label}`: {}x{} {:?} + {:?}",
            layout.width,
            layout.height,
            color_layout.format,
            depth_layout.format
        );
        Ok(target)
    }

    /// Capture target: half-float colour and depth/stencil, both
    /// `width`×`height`.
    pub fn capture(device: &wgpu::Device, label: &str, width: u32, height: u32) -> Result<Self, RenderError> {
        Self::create(device, label, TargetLayout::capture(width, height))
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.layout.width, self.layout.height)
    }

    /// Both attachments are alive.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.color.is_some() && self.depth_stencil.is_some()
    }

    /// `(colour, depth/stencil)` views to bind as pass attachments. Fails once
    /// the target has been destroyed.
    pub fn attachments(&self) -> Result<(&wgpu::TextureView, &wgpu::TextureView), RenderError> {
        match (&self.color, &self.depth_stencil) {
            (Some(c), Some(d)) => Ok((&c.view, &d.view)),
            _ => Err(RenderError::IncompleteTarget {
                label: self.label.clone(),
                reason: Incomplete::Destroyed,
            }),
        }
    }

    /// Colour texture, for copies out of the target.
    pub fn color_texture(&self) -> Result<&wgpu::Texture, RenderError> {
        match &self.color {
            Some(c) => Ok(&c.texture),
            None => Err(RenderError::IncompleteTarget {
                label: self.label.clone(),
                reason: Incomplete::Destroyed,
            }),
        }
    }

    /// Colour view for sampling in a later pass.
    pub fn color_view(&self) -> Result<&wgpu::TextureView, RenderError> {
        self.attachments().map(|(color, _)| color)
    }

    /// Releases both attachments. Safe to call more than once, and on a
    /// target whose creation failed half-way.
    pub fn destroy(&mut self) {
        let color = self.color.take();
        let depth = self.depth_stencil.take();
        if color.is_none() && depth.is_none() {
            return;
        }
        if let Some(c) = color {
            c.texture.destroy();
        }
        if let Some(d) = depth {
            d.texture.destroy();
        }
        log::debug!("render target `{}` destroyed", self.label);
    }
}
