pub mod cube;

pub use cube::{cube_indexed, cube_triangles, skybox_cube};
