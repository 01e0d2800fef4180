use std::path::PathBuf;

use thiserror::Error;

use crate::cubemap::CubeFace;

/// Failures while reading assets from disk.
///
/// Model errors are returned to the caller; cubemap face errors are only
/// logged, because a cubemap with a missing face is still usable.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load model {}: {source}", .path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("model {} contains no triangle meshes", .0.display())]
    EmptyModel(PathBuf),

    #[error("cubemap face {face:?} ({}): {source}", .path.display())]
    FaceDecode {
        face: CubeFace,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cubemap face {face:?} ({}) is {width}x{height}, expected {expected}x{expected}", .path.display())]
    FaceSize {
        face: CubeFace,
        path: PathBuf,
        width: u32,
        height: u32,
        expected: u32,
    },
}
