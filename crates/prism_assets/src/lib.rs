//! Asset loading for Prism.
//!
//! Both loaders are CPU-only: they decode files into plain data and leave GPU
//! upload to `prism_renderer`. Missing or corrupt inputs degrade instead of
//! aborting wherever a usable result still exists.

pub mod cubemap;
pub mod error;
pub mod model;

pub use cubemap::{CubeFace, CubemapFaces};
pub use error::AssetError;
pub use model::{load_model, MeshData, MeshVertex};
