pub mod capture;
pub mod composite;
pub mod skybox;

pub use capture::{CapturePass, CaptureSide, CAPTURE_WGSL};
pub use composite::{composite_descriptor, CompositePass, CompositeResources, Material, COMPOSITE_WGSL};
pub use skybox::{skybox_descriptor, SkyboxPass, SKYBOX_WGSL};
