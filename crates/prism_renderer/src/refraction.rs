//! Two-surface refraction approximation.
//!
//! The composite shader bends the view ray once at the front surface and once
//! at the back surface, using only the captured normals, then looks the exit
//! direction up in the environment. A Schlick fresnel term mixes in the
//! front-surface reflection. Nothing here is Snell's law; `bend` is an
//! artistic strength.
//!
//! The functions below are the CPU form of `assets/shaders/composite.wgsl`
//! and must stay in step with it.

use glam::{Vec3, Vec4};

/// Tunable shading parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefractionParams {
    /// Colour the refracted light is multiplied by.
    pub tint: Vec3,
    /// How strongly each surface normal deflects the ray.
    pub bend: f32,
    /// Reflectance at normal incidence (Schlick's `F0`).
    pub reflectivity: f32,
}

impl Default for RefractionParams {
    fn default() -> Self {
        Self {
            tint: Vec3::new(0.92, 0.97, 1.0),
            bend: 0.35,
            reflectivity: 0.04,
        }
    }
}

/// std140 image of `Refraction` in the composite shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RefractionUniform {
    pub tint: [f32; 3],
    pub bend: f32,
    pub reflectivity: f32,
    _pad: f32,
    /// Surface size in pixels; captures are addressed relative to it.
    pub viewport: [f32; 2],
}

impl RefractionUniform {
    pub fn new(params: &RefractionParams, viewport: (u32, u32)) -> Self {
        Self {
            tint: params.tint.to_array(),
            bend: params.bend,
            reflectivity: params.reflectivity,
            _pad: 0.0,
            viewport: [viewport.0.max(1) as f32, viewport.1.max(1) as f32],
        }
    }
}

/// Capture texels with alpha above this count as covered.
pub const COVERAGE_THRESHOLD: f32 = 0.5;

/// Direction after entering through a surface with outward normal `n_front`.
#[inline]
pub fn entry_direction(view: Vec3, n_front: Vec3, bend: f32) -> Vec3 {
    (view - bend * n_front).normalize_or_zero()
}

/// Direction after leaving through the back surface. Without back coverage
/// the ray continues unchanged.
#[inline]
pub fn exit_direction(entry: Vec3, n_back: Option<Vec3>, bend: f32) -> Vec3 {
    match n_back {
        Some(n) => (entry + bend * n.normalize_or_zero()).normalize_or_zero(),
        None => entry,
    }
}

/// Schlick's approximation of the fresnel reflectance.
#[inline]
pub fn schlick(cos_theta: f32, f0: f32) -> f32 {
    f0 + (1.0 - f0) * (1.0 - cos_theta).powi(5)
}

/// Mirror reflection of `v` about `n` (GLSL/WGSL `reflect`).
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Everything the composite fragment stage reads for one pixel.
#[derive(Debug, Clone, Copy)]
pub struct CompositeInput {
    /// Unit direction from the camera to the shaded point.
    pub view: Vec3,
    /// Interpolated geometric normal, used when the front capture is empty.
    pub geometric_normal: Vec3,
    /// Front capture texel: normal in `xyz`, coverage in `w`.
    pub front: Vec4,
    /// Back capture texel.
    pub back: Vec4,
    /// Base colour of the mesh at this point (white when untextured).
    pub base_color: Vec3,
}

/// Final RGB for one composite fragment.
pub fn shade(params: &RefractionParams, input: &CompositeInput, env: impl Fn(Vec3) -> Vec3) -> Vec3 {
    let covered = |texel: Vec4| (texel.w > COVERAGE_THRESHOLD).then(|| texel.truncate());

    let n_front = covered(input.front)
        .unwrap_or(input.geometric_normal)
        .normalize_or_zero();
    let entry = entry_direction(input.view, n_front, params.bend);
    let exit = exit_direction(entry, covered(input.back), params.bend);

    let refracted = env(exit) * params.tint * input.base_color;
    let reflected = env(reflect(input.view, n_front));
    let f = schlick((-input.view).dot(n_front).clamp(0.0, 1.0), params.reflectivity);
    refracted.lerp(reflected, f)
}
