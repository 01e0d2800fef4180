pub mod batch;
pub mod primitives;
pub mod vertex;

pub use batch::GeometryBatch;
pub use vertex::{SkyVertex, Vertex};
