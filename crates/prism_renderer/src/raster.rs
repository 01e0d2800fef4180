//! CPU reference rasteriser.
//!
//! A small software version of the four passes, driven by the same
//! [`PassDescriptor`]s, depth rules and shading functions as the GPU path. It
//! exists so the pipeline's geometric guarantees can be checked without an
//! adapter: front depth never exceeds back depth, captured normals face
//! outward, the composite is deterministic and the skybox never covers the
//! mesh.
//!
//! Conventions follow wgpu: NDC depth in `[0, 1]`, framebuffer `y` pointing
//! down, samples at pixel centres. Triangles are clipped against `w > 0`;
//! faces are never culled.

use glam::{Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::geometry::{primitives, Vertex};
use crate::graph::{DepthState, FramePacket, PassDescriptor};
use crate::refraction::{self, CompositeInput};

/// Vertices with `w` below this are clipped away.
const MIN_W: f32 = 1e-5;

/// Colour and depth buffers of one software target.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftTarget {
    width: u32,
    height: u32,
    color: Vec<Vec4>,
    depth: Vec<f32>,
}

impl SoftTarget {
    /// Zero colour, depth 1.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width * height) as usize;
        Self {
            width,
            height,
            color: vec![Vec4::ZERO; len],
            depth: vec![1.0; len],
        }
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    pub fn color(&self, x: u32, y: u32) -> Vec4 {
        self.color[self.index(x, y)]
    }

    pub fn depth(&self, x: u32, y: u32) -> f32 {
        self.depth[self.index(x, y)]
    }

    /// Applies the clears of `desc`, as opening the pass does on the GPU.
    pub fn begin(&mut self, desc: &PassDescriptor) {
        if let Some(c) = desc.clear_color {
            let c = Vec4::new(c[0] as f32, c[1] as f32, c[2] as f32, c[3] as f32);
            self.color.fill(c);
        }
        if let Some(d) = desc.clear_depth {
            self.depth.fill(d);
        }
    }

    /// Nearest texel for a fragment at `frag` on a `viewport`-sized surface.
    pub fn load_scaled(&self, frag: Vec2, viewport: (u32, u32)) -> Vec4 {
        let scale = |coord: f32, dim: u32, surface: u32| {
            let t = (coord * dim as f32 / surface.max(1) as f32) as i64;
            t.clamp(0, dim as i64 - 1) as u32
        };
        let x = scale(frag.x, self.width, viewport.0);
        let y = scale(frag.y, self.height, viewport.1);
        self.color(x, y)
    }

    /// Pixels whose alpha marks them as covered.
    pub fn covered(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.color(x, y).w > refraction::COVERAGE_THRESHOLD)
    }
}

/// Post-vertex-stage data of one corner.
#[derive(Debug, Clone, Copy)]
pub struct RasterVertex {
    pub clip: Vec4,
    pub normal: Vec3,
    pub world: Vec3,
}

impl RasterVertex {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            clip: self.clip.lerp(other.clip, t),
            normal: self.normal.lerp(other.normal, t),
            world: self.world.lerp(other.world, t),
        }
    }
}

/// One fragment that passed the depth test.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    /// Pixel centre in framebuffer coordinates.
    pub frag_coord: Vec2,
    pub depth: f32,
    /// Perspective-correct interpolated normal (not normalised).
    pub normal: Vec3,
    pub world: Vec3,
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Sutherland–Hodgman against `w = MIN_W`, fanned back into triangles.
fn clip_near(tri: [RasterVertex; 3]) -> Vec<[RasterVertex; 3]> {
    let mut poly = Vec::with_capacity(4);
    for i in 0..3 {
        let (a, b) = (tri[i], tri[(i + 1) % 3]);
        let (da, db) = (a.clip.w - MIN_W, b.clip.w - MIN_W);
        if da >= 0.0 {
            poly.push(a);
        }
        if (da >= 0.0) != (db >= 0.0) {
            poly.push(a.lerp(&b, da / (da - db)));
        }
    }
    (1..poly.len().saturating_sub(1))
        .map(|i| [poly[0], poly[i], poly[i + 1]])
        .collect()
}

/// Rasterises `triangles` into `target` under `depth`. `shade` runs for every
/// fragment that passes the test; its result replaces the pixel colour.
pub fn draw_triangles(
    target: &mut SoftTarget,
    depth: &DepthState,
    triangles: impl IntoIterator<Item = [RasterVertex; 3]>,
    mut shade: impl FnMut(&Fragment) -> Vec4,
) {
    let (w, h) = (target.width as f32, target.height as f32);

    for tri in triangles.into_iter().flat_map(clip_near) {
        let screen = tri.map(|v| {
            let ndc = v.clip.xyz() / v.clip.w;
            Vec3::new((ndc.x * 0.5 + 0.5) * w, (0.5 - ndc.y * 0.5) * h, ndc.z)
        });
        let [s0, s1, s2] = screen.map(|s| s.truncate());
        let area = edge(s0, s1, s2);
        if area.abs() <= f32::EPSILON {
            continue;
        }

        let min = s0.min(s1).min(s2);
        let max = s0.max(s1).max(s2);
        if max.x < 0.0 || max.y < 0.0 || min.x >= w || min.y >= h {
            continue;
        }
        let (x0, y0) = (min.x.max(0.0) as u32, min.y.max(0.0) as u32);
        let (x1, y1) = (max.x.min(w - 1.0) as u32, max.y.min(h - 1.0) as u32);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let b = [edge(s1, s2, p), edge(s2, s0, p), edge(s0, s1, p)].map(|e| e / area);
                if b.iter().any(|&v| v < 0.0) {
                    continue;
                }

                let z = b[0] * screen[0].z + b[1] * screen[1].z + b[2] * screen[2].z;
                if !(0.0..=1.0).contains(&z) {
                    continue;
                }
                let i = target.index(x, y);
                if !depth.passes(z, target.depth[i]) {
                    continue;
                }

                let pw = [0, 1, 2].map(|k| b[k] / tri[k].clip.w);
                let sum = pw[0] + pw[1] + pw[2];
                let interp = |f: fn(&RasterVertex) -> Vec3| {
                    (f(&tri[0]) * pw[0] + f(&tri[1]) * pw[1] + f(&tri[2]) * pw[2]) / sum
                };
                let frag = Fragment {
                    frag_coord: p,
                    depth: z,
                    normal: interp(|v| v.normal),
                    world: interp(|v| v.world),
                };

                target.color[i] = shade(&frag);
                if depth.write {
                    target.depth[i] = z;
                }
            }
        }
    }
}

/// Vertex stage shared by the capture and composite passes. `mesh` is a
/// non-indexed triangle list.
fn mesh_triangles<'a>(
    mesh: &'a [Vertex],
    packet: &FramePacket,
) -> impl Iterator<Item = [RasterVertex; 3]> + 'a {
    let (model, view_proj, normal_matrix) = (packet.model, packet.view_proj(), packet.normal_matrix());
    mesh.chunks_exact(3).map(move |tri| {
        [0, 1, 2].map(|k| {
            let world = model.transform_point3(Vec3::from(tri[k].position));
            RasterVertex {
                clip: view_proj * world.extend(1.0),
                normal: normal_matrix.transform_vector3(Vec3::from(tri[k].normal)),
                world,
            }
        })
    })
}

/// Front or back surface capture into `target`.
pub fn capture(target: &mut SoftTarget, desc: &PassDescriptor, mesh: &[Vertex], packet: &FramePacket) {
    target.begin(desc);
    draw_triangles(target, &desc.depth, mesh_triangles(mesh, packet), |f| {
        f.normal.normalize_or_zero().extend(1.0)
    });
}

/// Composite of the mesh onto `screen` from both captures.
pub fn composite(
    screen: &mut SoftTarget,
    desc: &PassDescriptor,
    (front, back): (&SoftTarget, &SoftTarget),
    mesh: &[Vertex],
    packet: &FramePacket,
    env: impl Fn(Vec3) -> Vec3,
) {
    screen.begin(desc);
    draw_triangles(screen, &desc.depth, mesh_triangles(mesh, packet), |f| {
        let input = CompositeInput {
            view: (f.world - packet.camera_position).normalize_or_zero(),
            geometric_normal: f.normal,
            front: front.load_scaled(f.frag_coord, packet.viewport),
            back: back.load_scaled(f.frag_coord, packet.viewport),
            base_color: Vec3::ONE,
        };
        refraction::shade(&packet.refraction, &input, &env).extend(1.0)
    });
}

/// Skybox cube at the far plane.
pub fn skybox(screen: &mut SoftTarget, desc: &PassDescriptor, packet: &FramePacket, env: impl Fn(Vec3) -> Vec3) {
    let sky_view_proj = packet.sky_view_proj();
    let cube = primitives::skybox_cube();
    let triangles = cube.chunks_exact(3).map(|tri| {
        [0, 1, 2].map(|k| {
            let dir = Vec3::from(tri[k].position);
            let clip = sky_view_proj * dir.extend(1.0);
            RasterVertex {
                clip: Vec4::new(clip.x, clip.y, clip.w, clip.w),
                normal: Vec3::ZERO,
                world: dir,
            }
        })
    });

    screen.begin(desc);
    draw_triangles(screen, &desc.depth, triangles, |f| env(f.world.normalize_or_zero()).extend(1.0));
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Quat};
    use prism_core::{CameraState, Projection};

    use super::*;
    use crate::graph::TargetId;
    use crate::passes::{composite_descriptor, skybox_descriptor, CaptureSide};
    use crate::refraction::RefractionParams;

    const SIZE: u32 = 64;

    fn packet(camera: CameraState, model: Mat4) -> FramePacket {
        let projection = Projection { aspect: 1.0, ..Default::default() };
        FramePacket {
            frame_index: 0,
            view: camera.view_matrix(),
            sky_view: camera.rotation_only_view(),
            projection: projection.matrix(),
            model,
            camera_position: camera.position,
            viewport: (SIZE, SIZE),
            refraction: RefractionParams { bend: 0.4, ..Default::default() },
        }
    }

    fn sky(d: Vec3) -> Vec3 {
        d * 0.5 + Vec3::splat(0.5)
    }

    fn captures(mesh: &[Vertex], packet: &FramePacket) -> (SoftTarget, SoftTarget) {
        let mut front = SoftTarget::new(SIZE, SIZE);
        let mut back = SoftTarget::new(SIZE, SIZE);
        capture(&mut front, &CaptureSide::Front.descriptor(TargetId::Offscreen(0)), mesh, packet);
        capture(&mut back, &CaptureSide::Back.descriptor(TargetId::Offscreen(1)), mesh, packet);
        (front, back)
    }

    fn composite_desc() -> PassDescriptor {
        composite_descriptor(TargetId::Offscreen(0), TargetId::Offscreen(1))
    }

    fn is_axis(n: Vec3) -> bool {
        [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z]
            .iter()
            .any(|a| (n - *a).length() < 1e-4)
    }

    #[test]
    fn front_depth_never_exceeds_back_depth() {
        let mesh = primitives::cube_triangles();
        let model = Mat4::from_rotation_translation(
            Quat::from_euler(glam::EulerRot::YXZ, 0.6, 0.3, 0.1),
            Vec3::new(0.1, -0.05, 0.0),
        );
        let cam = CameraState::looking_at(Vec3::new(1.6, 1.1, 2.4), Vec3::ZERO);
        let (front, back) = captures(&mesh, &packet(cam, model));

        let covered: Vec<_> = front.covered().collect();
        assert!(covered.len() > 100, "cube should cover the view, got {}", covered.len());
        for (x, y) in covered {
            assert!(back.color(x, y).w > 0.5, "back capture missing at {x},{y}");
            assert!(front.depth(x, y) <= back.depth(x, y), "front behind back at {x},{y}");
        }
        assert_eq!(front.covered().count(), back.covered().count());
    }

    #[test]
    fn unit_cube_front_normals_point_outward() {
        let mesh = primitives::cube_triangles();
        assert_eq!(mesh.len(), 36);
        let cam = CameraState::looking_at(Vec3::new(3.0, 0.4, 0.3), Vec3::ZERO);
        let (front, back) = captures(&mesh, &packet(cam, Mat4::IDENTITY));

        let centre = front.color(SIZE / 2, SIZE / 2);
        assert!((centre.truncate() - Vec3::X).length() < 1e-4, "centre normal {centre}");

        // a visible face has the camera on its outer side; pixel centres lying
        // exactly on the silhouette may pick up the neighbouring face
        let facing = |target: &SoftTarget, outward: bool| {
            let covered: Vec<_> = target.covered().collect();
            let matching = covered
                .iter()
                .map(|&(x, y)| target.color(x, y).truncate())
                .inspect(|&n| assert!(is_axis(n), "normal {n}"))
                .filter(|n| (n.dot(cam.position) > 0.5) == outward)
                .count();
            (matching, covered.len())
        };
        let (front_ok, front_total) = facing(&front, true);
        let (back_ok, back_total) = facing(&back, false);
        assert!(front_total > 100);
        assert!(front_ok * 50 >= front_total * 49, "{front_ok}/{front_total}");
        assert!(back_ok * 50 >= back_total * 49, "{back_ok}/{back_total}");
    }

    #[test]
    fn uncovered_pixels_stay_cleared() {
        let mesh = primitives::cube_triangles();
        let cam = CameraState::looking_at(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO);
        let (front, back) = captures(&mesh, &packet(cam, Mat4::IDENTITY));
        assert_eq!(front.color(0, 0), Vec4::ZERO);
        assert_eq!(front.depth(0, 0), 1.0);
        assert_eq!(back.depth(0, 0), 0.0);
    }

    #[test]
    fn composite_is_deterministic() {
        let mesh = primitives::cube_triangles();
        let cam = CameraState::looking_at(Vec3::new(1.2, 0.8, 2.5), Vec3::ZERO);
        let p = packet(cam, Mat4::from_rotation_y(0.4));
        let (front, back) = captures(&mesh, &p);

        let run = || {
            let mut screen = SoftTarget::new(SIZE, SIZE);
            composite(&mut screen, &composite_desc(), (&front, &back), &mesh, &p, sky);
            screen
        };
        let (a, b) = (run(), run());
        assert!(a.covered().count() > 0);
        for y in 0..SIZE {
            for x in 0..SIZE {
                let bits = |t: &SoftTarget| t.color(x, y).to_array().map(f32::to_bits);
                assert_eq!(bits(&a), bits(&b));
            }
        }
    }

    #[test]
    fn skybox_never_covers_the_mesh() {
        let mesh = primitives::cube_triangles();
        let cam = CameraState::looking_at(Vec3::new(0.7, 0.5, 3.0), Vec3::ZERO);
        let p = packet(cam, Mat4::from_rotation_y(0.3));
        let (front, back) = captures(&mesh, &p);

        let mut screen = SoftTarget::new(SIZE, SIZE);
        composite(&mut screen, &composite_desc(), (&front, &back), &mesh, &p, sky);
        let after_composite = screen.clone();

        skybox(&mut screen, &skybox_descriptor(), &p, sky);

        let (mut mesh_px, mut sky_px) = (0, 0);
        for y in 0..SIZE {
            for x in 0..SIZE {
                let depth = after_composite.depth(x, y);
                assert_eq!(screen.depth(x, y), depth, "skybox wrote depth");
                if depth < 1.0 {
                    mesh_px += 1;
                    assert_eq!(screen.color(x, y), after_composite.color(x, y));
                } else {
                    sky_px += 1;
                    assert!(screen.color(x, y).truncate().length() > 0.0, "sky missing at {x},{y}");
                }
            }
        }
        assert!(mesh_px > 0 && sky_px > 0);
    }

    #[test]
    fn clipping_keeps_the_visible_part() {
        let v = |x: f32, w: f32| RasterVertex { clip: Vec4::new(x, 0.0, 0.5, w), normal: Vec3::Z, world: Vec3::ZERO };
        assert_eq!(clip_near([v(0.0, 1.0), v(1.0, 1.0), v(0.0, 2.0)]).len(), 1);
        assert_eq!(clip_near([v(0.0, 1.0), v(1.0, 1.0), v(0.0, -1.0)]).len(), 2);
        assert!(clip_near([v(0.0, -1.0), v(1.0, -1.0), v(0.0, -2.0)]).is_empty());
    }
}
