pub mod layout;

pub use layout::PipelineLayouts;
