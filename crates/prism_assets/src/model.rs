//! glTF model loading.
//!
//! Every triangle primitive in the file becomes one [`MeshData`]. Node
//! transforms are not applied: the refractive model is placed by the
//! application's own transform.

use std::path::Path;

use glam::Vec3;
use image::RgbaImage;

use crate::error::AssetError;

/// CPU-side vertex as read from the file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

/// Immutable geometry of one mesh primitive plus its optional base colour.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<MeshVertex>,
    /// `None` for non-indexed triangle lists.
    pub indices: Option<Vec<u32>>,
    /// Decoded base colour texture. `None` renders the mesh untextured.
    pub base_color: Option<RgbaImage>,
}

impl MeshData {
    /// Number of triangles the mesh draws.
    pub fn triangle_count(&self) -> usize {
        self.indices.as_ref().map_or(self.vertices.len(), Vec::len) / 3
    }

    /// Rebuilds the mesh as a non-indexed list with one face normal per
    /// triangle. Degenerate triangles get a zero normal.
    pub fn with_flat_normals(self) -> Self {
        let corners: Vec<MeshVertex> = match &self.indices {
            Some(indices) => indices
                .iter()
                .filter_map(|&i| self.vertices.get(i as usize).copied())
                .collect(),
            None => self.vertices.clone(),
        };

        let vertices = corners
            .chunks_exact(3)
            .flat_map(|tri| {
                let [a, b, c] = [tri[0], tri[1], tri[2]].map(|v| Vec3::from(v.position));
                let n = (b - a).cross(c - a).normalize_or_zero().to_array();
                tri.iter()
                    .map(move |v| MeshVertex { normal: n, ..*v })
                    .collect::<Vec<_>>()
            })
            .collect();

        Self {
            vertices,
            indices: None,
            ..self
        }
    }
}

/// Loads every triangle primitive of a glTF/GLB file.
pub fn load_model(path: impl AsRef<Path>) -> Result<Vec<MeshData>, AssetError> {
    let path = path.as_ref();
    let (document, buffers, images) = gltf::import(path).map_err(|source| AssetError::ModelLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let mut meshes = Vec::new();
    for mesh in document.meshes() {
        let mesh_name = mesh.name().unwrap_or("mesh");
        for (i, prim) in mesh.primitives().enumerate() {
            let name = format!("{mesh_name}#{i}");
            if prim.mode() != gltf::mesh::Mode::Triangles {
                log::warn!("{name}: skipping non-triangle primitive ({:?})", prim.mode());
                continue;
            }

            let reader = prim.reader(|buffer| buffers.get(buffer.index()).map(|b| &b.0[..]));
            let Some(positions) = reader.read_positions() else {
                log::warn!("{name}: primitive has no positions");
                continue;
            };
            let positions: Vec<[f32; 3]> = positions.collect();
            let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(Iterator::collect);
            let tex_coords: Vec<[f32; 2]> = reader
                .read_tex_coords(0)
                .map(|tc| tc.into_f32().collect())
                .unwrap_or_default();
            let indices: Option<Vec<u32>> = reader.read_indices().map(|i| i.into_u32().collect());

            let vertices = positions
                .iter()
                .enumerate()
                .map(|(v, &position)| MeshVertex {
                    position,
                    normal: normals.as_ref().and_then(|n| n.get(v).copied()).unwrap_or_default(),
                    tex_coords: tex_coords.get(v).copied().unwrap_or_default(),
                })
                .collect();

            let base_color = prim
                .material()
                .pbr_metallic_roughness()
                .base_color_texture()
                .and_then(|info| {
                    let index = info.texture().source().index();
                    let decoded = images.get(index).and_then(to_rgba);
                    if decoded.is_none() {
                        log::warn!("{name}: base colour image {index} unusable, drawing untextured");
                    }
                    decoded
                });

            let data = MeshData { name, vertices, indices, base_color };
            meshes.extend(finish_primitive(data, normals.is_some()));
        }
    }

    if meshes.is_empty() {
        return Err(AssetError::EmptyModel(path.to_path_buf()));
    }
    log::info!(
        "loaded model {}: {} meshes, {} triangles",
        path.display(),
        meshes.len(),
        meshes.iter().map(MeshData::triangle_count).sum::<usize>()
    );
    Ok(meshes)
}

/// Generates flat normals when the file has none, then drops the primitive
/// if it no longer holds a whole triangle.
fn finish_primitive(mut data: MeshData, has_normals: bool) -> Option<MeshData> {
    if !has_normals {
        log::debug!("{}: generating flat normals", data.name);
        data = data.with_flat_normals();
    }
    if data.vertices.is_empty() || data.triangle_count() == 0 {
        log::warn!("{}: skipping primitive without a complete triangle", data.name);
        return None;
    }
    Some(data)
}

fn to_rgba(data: &gltf::image::Data) -> Option<RgbaImage> {
    use gltf::image::Format;
    match data.format {
        Format::R8G8B8A8 => RgbaImage::from_raw(data.width, data.height, data.pixels.clone()),
        Format::R8G8B8 => {
            let pixels = data
                .pixels
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect();
            RgbaImage::from_raw(data.width, data.height, pixels)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(p: [f32; 3]) -> MeshVertex {
        MeshVertex { position: p, normal: [0.0; 3], tex_coords: [0.0; 2] }
    }

    #[test]
    fn flat_normals_expand_indices() {
        let mesh = MeshData {
            name: "quad".into(),
            vertices: vec![
                vertex([0.0, 0.0, 0.0]),
                vertex([1.0, 0.0, 0.0]),
                vertex([1.0, 1.0, 0.0]),
                vertex([0.0, 1.0, 0.0]),
            ],
            indices: Some(vec![0, 1, 2, 2, 3, 0]),
            base_color: None,
        };
        assert_eq!(mesh.triangle_count(), 2);

        let flat = mesh.with_flat_normals();
        assert!(flat.indices.is_none());
        assert_eq!(flat.vertices.len(), 6);
        assert!(flat.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
        assert_eq!(flat.triangle_count(), 2);
    }

    #[test]
    fn out_of_range_indices_are_dropped() {
        let mesh = MeshData {
            name: "broken".into(),
            vertices: vec![vertex([0.0; 3]), vertex([1.0, 0.0, 0.0]), vertex([0.0, 1.0, 0.0])],
            indices: Some(vec![0, 1, 2, 0, 1, 9]),
            base_color: None,
        };
        assert_eq!(mesh.with_flat_normals().vertices.len(), 3);
    }

    #[test]
    fn primitive_without_a_triangle_is_skipped() {
        let line = MeshData {
            name: "line".into(),
            vertices: vec![vertex([0.0; 3]), vertex([1.0, 0.0, 0.0])],
            indices: None,
            base_color: None,
        };
        assert!(finish_primitive(line.clone(), false).is_none());
        assert!(finish_primitive(line, true).is_none());

        let dangling = MeshData {
            name: "dangling".into(),
            vertices: vec![vertex([0.0; 3]), vertex([1.0, 0.0, 0.0])],
            indices: Some(vec![0, 1, 7]),
            base_color: None,
        };
        assert!(finish_primitive(dangling, false).is_none());

        let triangle = MeshData {
            name: "triangle".into(),
            vertices: vec![vertex([0.0; 3]), vertex([1.0, 0.0, 0.0]), vertex([0.0, 1.0, 0.0])],
            indices: None,
            base_color: None,
        };
        let kept = finish_primitive(triangle, false).unwrap();
        assert_eq!(kept.triangle_count(), 1);
        assert_eq!(kept.vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn unreadable_file_is_a_model_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing.gltf");
        assert!(matches!(load_model(&path), Err(AssetError::ModelLoad { .. })));

        let junk = tmp.path().join("junk.glb");
        std::fs::write(&junk, b"definitely not gltf").unwrap();
        assert!(matches!(load_model(&junk), Err(AssetError::ModelLoad { .. })));
    }
}
