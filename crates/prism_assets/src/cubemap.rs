//! Six-face cubemap decoding.
//!
//! Faces are given in the fixed layer order `+X, -X, +Y, -Y, +Z, -Z`, which is
//! also the array-layer order wgpu expects for a cube view. Every face must be
//! square and all faces must share one size; the first face that decodes sets
//! it. A face that is missing, corrupt or mis-sized is skipped with a warning
//! and its texels stay zero.

use std::borrow::Cow;
use std::path::Path;

use glam::Vec3;
use image::RgbaImage;

use crate::error::AssetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl CubeFace {
    /// Layer order of a cube texture.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    /// Array layer of this face.
    #[inline]
    pub fn layer(self) -> usize {
        self as usize
    }

    /// Sampling direction through face coordinates `s, t` in `[-1, 1]`
    /// (`t` grows downwards), following the Vulkan/D3D cube convention.
    pub fn direction(self, s: f32, t: f32) -> Vec3 {
        let d = match self {
            CubeFace::PosX => Vec3::new(1.0, -t, -s),
            CubeFace::NegX => Vec3::new(-1.0, -t, s),
            CubeFace::PosY => Vec3::new(s, 1.0, t),
            CubeFace::NegY => Vec3::new(s, -1.0, -t),
            CubeFace::PosZ => Vec3::new(s, -t, 1.0),
            CubeFace::NegZ => Vec3::new(-s, -t, -1.0),
        };
        d.normalize()
    }
}

/// Decoded RGBA8 faces of a cubemap, ready for upload.
#[derive(Debug, Clone)]
pub struct CubemapFaces {
    /// Edge length of every face in texels.
    pub size: u32,
    faces: [Option<RgbaImage>; 6],
}

impl CubemapFaces {
    /// Decodes six face images. Never fails: unreadable faces are logged and
    /// left empty. When no face decodes at all the result is a 1×1 cubemap.
    pub fn load<P: AsRef<Path>>(paths: &[P; 6]) -> Self {
        let mut faces: [Option<RgbaImage>; 6] = Default::default();
        let mut size = None;

        for (face, path) in CubeFace::ALL.into_iter().zip(paths.iter()) {
            match decode_face(face, path.as_ref(), size) {
                Ok(img) => {
                    size.get_or_insert(img.width());
                    faces[face.layer()] = Some(img);
                }
                Err(err) => log::warn!("skipping cubemap face: {err}"),
            }
        }

        let size = size.unwrap_or(1);
        log::info!(
            "cubemap decoded: {size}x{size}, {} of 6 faces present",
            faces.iter().filter(|f| f.is_some()).count()
        );
        Self { size, faces }
    }

    /// Procedural sky: a vertical gradient from `nadir` through `horizon` to
    /// `zenith`. Used when no face images are configured.
    pub fn gradient(size: u32, zenith: [u8; 3], horizon: [u8; 3], nadir: [u8; 3]) -> Self {
        let size = size.max(1);
        let faces = CubeFace::ALL.map(|face| {
            Some(RgbaImage::from_fn(size, size, |x, y| {
                let s = (x as f32 + 0.5) / size as f32 * 2.0 - 1.0;
                let t = (y as f32 + 0.5) / size as f32 * 2.0 - 1.0;
                let up = face.direction(s, t).y;
                let (from, to, k) = if up >= 0.0 {
                    (horizon, zenith, up)
                } else {
                    (horizon, nadir, -up)
                };
                let mix = |i: usize| (from[i] as f32 + (to[i] as f32 - from[i] as f32) * k).round() as u8;
                image::Rgba([mix(0), mix(1), mix(2), 255])
            }))
        });
        Self { size, faces }
    }

    #[inline]
    pub fn face(&self, face: CubeFace) -> Option<&RgbaImage> {
        self.faces[face.layer()].as_ref()
    }

    /// Faces that failed to load.
    pub fn missing(&self) -> impl Iterator<Item = CubeFace> + '_ {
        CubeFace::ALL
            .into_iter()
            .filter(|f| self.faces[f.layer()].is_none())
    }

    /// Raw RGBA8 texels of `face`; zeros for a missing face.
    pub fn texels(&self, face: CubeFace) -> Cow<'_, [u8]> {
        match self.face(face) {
            Some(img) => Cow::Borrowed(img.as_raw().as_slice()),
            None => Cow::Owned(vec![0; (self.size * self.size * 4) as usize]),
        }
    }
}

fn decode_face(face: CubeFace, path: &Path, expected: Option<u32>) -> Result<RgbaImage, AssetError> {
    let img = image::open(path)
        .map_err(|source| AssetError::FaceDecode {
            face,
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();

    let (width, height) = img.dimensions();
    let expected = expected.unwrap_or(width);
    if width != height || width != expected {
        return Err(AssetError::FaceSize {
            face,
            path: path.to_path_buf(),
            width,
            height,
            expected,
        });
    }
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_face(dir: &Path, name: &str, size: u32, rgb: [u8; 3]) -> std::path::PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(size, size, image::Rgba([rgb[0], rgb[1], rgb[2], 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn missing_face_is_left_zeroed() {
        let tmp = tempfile::tempdir().unwrap();
        let mut paths: Vec<_> = ["px", "nx", "py", "ny", "pz"]
            .iter()
            .map(|n| write_face(tmp.path(), &format!("{n}.png"), 4, [200, 100, 50]))
            .collect();
        paths.push(tmp.path().join("nz.png")); // never written

        let paths: [_; 6] = paths.try_into().unwrap();
        let cube = CubemapFaces::load(&paths);

        assert_eq!(cube.size, 4);
        assert_eq!(cube.missing().collect::<Vec<_>>(), vec![CubeFace::NegZ]);
        assert!(cube.texels(CubeFace::NegZ).iter().all(|&b| b == 0));
        assert_eq!(cube.texels(CubeFace::NegZ).len(), 4 * 4 * 4);
        assert_eq!(&cube.texels(CubeFace::PosX)[..4], &[200, 100, 50, 255]);
    }

    #[test]
    fn corrupt_and_missized_faces_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let corrupt = tmp.path().join("corrupt.png");
        std::fs::write(&corrupt, b"not an image").unwrap();
        let good = write_face(tmp.path(), "good.png", 8, [1, 2, 3]);
        let small = write_face(tmp.path(), "small.png", 4, [1, 2, 3]);

        let cube = CubemapFaces::load(&[&corrupt, &good, &small, &good, &good, &good]);
        assert_eq!(cube.size, 8);
        assert_eq!(
            cube.missing().collect::<Vec<_>>(),
            vec![CubeFace::PosX, CubeFace::PosY]
        );
    }

    #[test]
    fn no_faces_gives_one_texel_cube() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("absent.png");
        let cube = CubemapFaces::load(&[&p, &p, &p, &p, &p, &p]);
        assert_eq!(cube.size, 1);
        assert_eq!(cube.missing().count(), 6);
        assert_eq!(cube.texels(CubeFace::PosY).len(), 4);
    }

    #[test]
    fn gradient_is_brighter_overhead() {
        let cube = CubemapFaces::gradient(8, [255, 255, 255], [128, 128, 128], [0, 0, 0]);
        assert_eq!(cube.missing().count(), 0);
        let top = cube.face(CubeFace::PosY).unwrap().get_pixel(4, 4);
        let bottom = cube.face(CubeFace::NegY).unwrap().get_pixel(4, 4);
        assert!(top[0] > 240);
        assert!(bottom[0] < 15);
    }

    #[test]
    fn face_directions_point_outwards() {
        for face in CubeFace::ALL {
            let centre = face.direction(0.0, 0.0);
            assert!((centre.length() - 1.0).abs() < 1e-6);
            assert!(centre.abs().max_element() > 0.999);
        }
        assert!(CubeFace::PosX.direction(0.0, 0.0).x > 0.0);
        assert!(CubeFace::NegZ.direction(0.0, 0.0).z < 0.0);
    }
}
