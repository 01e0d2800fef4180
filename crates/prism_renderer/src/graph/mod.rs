pub mod descriptor;
pub mod frame_graph;
pub mod frame_packet;
pub mod pass_trait;

pub use descriptor::{DepthCompare, DepthState, PassDescriptor, RenderState, TargetId};
pub use frame_graph::{FrameGraph, FrameStats};
pub use frame_packet::FramePacket;
pub use pass_trait::{Backend, RenderPass};
