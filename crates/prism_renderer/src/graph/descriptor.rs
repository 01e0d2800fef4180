//! Static description of a pass: where it draws, how it clears, and which
//! depth rule decides the winning fragment.
//!
//! Descriptors are built once at setup. The [`FrameGraph`](super::FrameGraph)
//! turns the current descriptor into a [`RenderState`] right before the pass
//! runs, so nothing carries over from the previous pass.

/// Destination of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetId {
    /// The presented surface plus the renderer's screen depth buffer.
    Screen,
    /// Offscreen render target by index.
    Offscreen(usize),
}

/// Which of two fragments on the same pixel survives the depth test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthCompare {
    /// Smaller depth wins (`Less`).
    #[default]
    NearerWins,
    /// Larger depth wins (`Greater`). Used to keep back surfaces.
    FartherWins,
    /// Smaller or equal depth wins (`LessEqual`). Lets geometry at the far
    /// plane fill pixels still holding the cleared depth.
    EqualOrNearer,
}

impl DepthCompare {
    pub fn to_wgpu(self) -> wgpu::CompareFunction {
        match self {
            DepthCompare::NearerWins => wgpu::CompareFunction::Less,
            DepthCompare::FartherWins => wgpu::CompareFunction::Greater,
            DepthCompare::EqualOrNearer => wgpu::CompareFunction::LessEqual,
        }
    }

    /// `true` if a fragment at `incoming` replaces the `stored` depth.
    #[inline]
    pub fn passes(self, incoming: f32, stored: f32) -> bool {
        match self {
            DepthCompare::NearerWins => incoming < stored,
            DepthCompare::FartherWins => incoming > stored,
            DepthCompare::EqualOrNearer => incoming <= stored,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthState {
    /// With the test disabled every fragment passes.
    pub test: bool,
    pub compare: DepthCompare,
    pub write: bool,
}

impl DepthState {
    pub const DEFAULT: Self = Self {
        test: true,
        compare: DepthCompare::NearerWins,
        write: true,
    };

    pub fn compare_function(&self) -> wgpu::CompareFunction {
        if self.test {
            self.compare.to_wgpu()
        } else {
            wgpu::CompareFunction::Always
        }
    }

    /// Pipeline depth-stencil state for `format`.
    pub fn to_wgpu(&self, format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format,
            depth_write_enabled: self.write,
            depth_compare: self.compare_function(),
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }

    /// Software form of the depth test.
    #[inline]
    pub fn passes(&self, incoming: f32, stored: f32) -> bool {
        !self.test || self.compare.passes(incoming, stored)
    }
}

impl Default for DepthState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PassDescriptor {
    pub label: String,
    pub target: TargetId,
    /// `None` keeps the existing colour (load).
    pub clear_color: Option<[f64; 4]>,
    /// `None` keeps the existing depth (load).
    pub clear_depth: Option<f32>,
    pub depth: DepthState,
    /// Targets this pass samples. Each must be written by an earlier pass in
    /// the same frame.
    pub inputs: Vec<TargetId>,
}

impl PassDescriptor {
    pub fn new(label: impl Into<String>, target: TargetId) -> Self {
        Self {
            label: label.into(),
            target,
            clear_color: None,
            clear_depth: None,
            depth: DepthState::DEFAULT,
            inputs: Vec::new(),
        }
    }

    pub fn clear_color(mut self, rgba: [f64; 4]) -> Self {
        self.clear_color = Some(rgba);
        self
    }

    pub fn clear_depth(mut self, depth: f32) -> Self {
        self.clear_depth = Some(depth);
        self
    }

    pub fn depth(mut self, compare: DepthCompare, write: bool) -> Self {
        self.depth = DepthState { test: true, compare, write };
        self
    }

    pub fn reads(mut self, input: TargetId) -> Self {
        self.inputs.push(input);
        self
    }
}

/// Renderer-wide state flags that passes depend on.
///
/// Only the frame graph writes this. Between frames it holds
/// [`RenderState::DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pub depth: DepthState,
    pub clear_depth: Option<f32>,
    pub clear_color: Option<[f64; 4]>,
}

impl RenderState {
    pub const DEFAULT: Self = Self {
        depth: DepthState::DEFAULT,
        clear_depth: Some(1.0),
        clear_color: None,
    };

    /// Full state for `desc`. Every field comes from the descriptor.
    pub fn for_pass(desc: &PassDescriptor) -> Self {
        Self {
            depth: desc.depth,
            clear_depth: desc.clear_depth,
            clear_color: desc.clear_color,
        }
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_modes_match_wgpu() {
        assert_eq!(DepthCompare::NearerWins.to_wgpu(), wgpu::CompareFunction::Less);
        assert_eq!(DepthCompare::FartherWins.to_wgpu(), wgpu::CompareFunction::Greater);
        assert_eq!(DepthCompare::EqualOrNearer.to_wgpu(), wgpu::CompareFunction::LessEqual);
    }

    #[test]
    fn software_depth_test() {
        assert!(DepthCompare::NearerWins.passes(0.3, 0.5));
        assert!(!DepthCompare::NearerWins.passes(0.5, 0.5));
        assert!(DepthCompare::FartherWins.passes(0.7, 0.5));
        assert!(!DepthCompare::FartherWins.passes(0.5, 0.5));
        assert!(DepthCompare::EqualOrNearer.passes(1.0, 1.0));
        assert!(!DepthCompare::EqualOrNearer.passes(1.0, 0.4));

        let off = DepthState { test: false, ..DepthState::DEFAULT };
        assert!(off.passes(1.0, 0.0));
        assert_eq!(off.compare_function(), wgpu::CompareFunction::Always);
    }

    #[test]
    fn state_is_taken_wholly_from_descriptor() {
        let desc = PassDescriptor::new("sky", TargetId::Screen).depth(DepthCompare::EqualOrNearer, false);
        let state = RenderState::for_pass(&desc);
        assert_eq!(state.clear_depth, None);
        assert_eq!(state.clear_color, None);
        assert_eq!(state.depth.compare, DepthCompare::EqualOrNearer);
        assert!(!state.depth.write);
    }
}
