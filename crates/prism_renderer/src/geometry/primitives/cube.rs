/// Unit cube primitives centred at the origin.
///
/// Faces span `[-0.5, 0.5]` on every axis with outward normals and per-face
/// texture coordinates. Triangles wind counter-clockwise seen from outside.
/// The skybox cube spans `[-1, 1]` and carries positions only.
use crate::geometry::{SkyVertex, Vertex};

/// `(normal, u axis, v axis)` per face; `u × v == normal`.
#[rustfmt::skip]
const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([ 1.0,  0.0,  0.0], [ 0.0, 0.0, -1.0], [0.0, 1.0,  0.0]), // +X
    ([-1.0,  0.0,  0.0], [ 0.0, 0.0,  1.0], [0.0, 1.0,  0.0]), // -X
    ([ 0.0,  1.0,  0.0], [ 1.0, 0.0,  0.0], [0.0, 0.0, -1.0]), // +Y
    ([ 0.0, -1.0,  0.0], [ 1.0, 0.0,  0.0], [0.0, 0.0,  1.0]), // -Y
    ([ 0.0,  0.0,  1.0], [ 1.0, 0.0,  0.0], [0.0, 1.0,  0.0]), // +Z
    ([ 0.0,  0.0, -1.0], [-1.0, 0.0,  0.0], [0.0, 1.0,  0.0]), // -Z
];

/// Quad corners in face space with their texture coordinates.
const CORNERS: [([f32; 2], [f32; 2]); 4] = [
    ([-1.0, -1.0], [0.0, 1.0]),
    ([1.0, -1.0], [1.0, 1.0]),
    ([1.0, 1.0], [1.0, 0.0]),
    ([-1.0, 1.0], [0.0, 0.0]),
];

const QUAD: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// 24 vertices (4 per face) and 36 indices.
pub fn cube_indexed() -> (Vec<Vertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (face, (n, u, v)) in FACES.iter().enumerate() {
        for ([su, sv], uv) in CORNERS {
            let p = std::array::from_fn(|i| 0.5 * (n[i] + su * u[i] + sv * v[i]));
            vertices.push(Vertex::new(p, *n, uv));
        }
        let base = face as u32 * 4;
        indices.extend(QUAD.iter().map(|i| base + i));
    }
    (vertices, indices)
}

/// 36 vertices, one triangle per three, no index buffer.
pub fn cube_triangles() -> Vec<Vertex> {
    let (vertices, indices) = cube_indexed();
    indices.iter().map(|&i| vertices[i as usize]).collect()
}

/// 36 positions of the `[-1, 1]` skybox cube.
pub fn skybox_cube() -> Vec<SkyVertex> {
    cube_triangles()
        .into_iter()
        .map(|v| SkyVertex { position: v.position.map(|c| c * 2.0) })
        .collect()
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn counts() {
        let (v, i) = cube_indexed();
        assert_eq!((v.len(), i.len()), (24, 36));
        assert_eq!(cube_triangles().len(), 36);
        assert_eq!(skybox_cube().len(), 36);
    }

    #[test]
    fn triangles_wind_outward() {
        for tri in cube_triangles().chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|k| Vec3::from(tri[k].position));
            let n = Vec3::from(tri[0].normal);
            assert!((b - a).cross(c - a).normalize().dot(n) > 0.999);
            // every corner lies on the face plane x·n = 0.5
            assert!(tri.iter().all(|v| (Vec3::from(v.position).dot(n) - 0.5).abs() < 1e-6));
        }
    }

    #[test]
    fn skybox_spans_unit_range() {
        assert!(skybox_cube()
            .iter()
            .all(|v| v.position.iter().all(|c| c.abs() == 1.0)));
    }
}
