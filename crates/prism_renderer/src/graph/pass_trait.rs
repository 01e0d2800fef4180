/// The `RenderPass` trait and the `Backend` seam it records through.
///
/// ## Two-phase design
/// `prepare` → `record` lets passes upload uniforms **before** the backend
/// opens a render pass, because `write_buffer` is not allowed while the
/// encoder is recording one.
///
/// ## Backends
/// Passes are generic over the backend so the frame graph can be driven by
/// wgpu in production and by a recording backend in tests. The backend turns
/// a [`PassDescriptor`] plus the current [`RenderState`] into an open pass.
use crate::error::RenderError;
use crate::graph::{FramePacket, PassDescriptor, RenderState};

pub trait Backend: 'static {
    /// Handle passes need in `prepare` (the wgpu backend uses the queue).
    type Context;
    /// Per-frame recording state: encoder plus every attachment a pass may
    /// bind.
    type Frame<'f>;
    /// An open pass borrowed from the frame.
    type Pass<'p>;

    /// Binds the descriptor's target and applies the state's clear values.
    fn begin_pass<'p, 'f: 'p>(
        frame: &'p mut Self::Frame<'f>,
        desc: &PassDescriptor,
        state: &RenderState,
    ) -> Result<Self::Pass<'p>, RenderError>;
}

pub trait RenderPass<B: Backend>: 'static {
    /// Static target, clear and depth description.
    fn descriptor(&self) -> &PassDescriptor;

    /// Short human-readable label used as the wgpu debug label.
    fn name(&self) -> &str {
        &self.descriptor().label
    }

    /// Upload per-frame data. Called **before** `record` each frame.
    #[allow(unused_variables)]
    fn prepare(&mut self, ctx: &B::Context, packet: &FramePacket) {}

    /// Bind the program and its inputs and issue the draw calls.
    fn record(&mut self, pass: &mut B::Pass<'_>, packet: &FramePacket);
}
