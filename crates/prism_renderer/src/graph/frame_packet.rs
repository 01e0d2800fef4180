/// Data bundle assembled once per frame and passed immutably to every
/// `RenderPass`.
///
/// Only the dynamic values live here: matrices, camera position and shading
/// parameters. Everything else is fixed in the pass descriptors at setup.
use glam::{Mat4, Vec3};

use crate::model_transform::MIN_DETERMINANT;
use crate::refraction::RefractionParams;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePacket {
    pub frame_index: u64,
    pub view: Mat4,
    /// View with translation removed, for geometry at infinity.
    pub sky_view: Mat4,
    pub projection: Mat4,
    /// Last accepted model transform of the refractive mesh.
    pub model: Mat4,
    pub camera_position: Vec3,
    /// Current surface size in pixels.
    pub viewport: (u32, u32),
    pub refraction: RefractionParams,
}

impl FramePacket {
    #[inline]
    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view
    }

    #[inline]
    pub fn sky_view_proj(&self) -> Mat4 {
        self.projection * self.sky_view
    }

    /// Inverse-transpose of the model matrix. Falls back to the model matrix
    /// itself when it cannot be inverted; any matrix accepted by
    /// `ModelTransform` can.
    pub fn normal_matrix(&self) -> Mat4 {
        let det = self.model.determinant();
        if det.abs() <= MIN_DETERMINANT || !det.is_finite() {
            return self.model;
        }
        self.model.inverse().transpose()
    }
}

impl Default for FramePacket {
    fn default() -> Self {
        Self {
            frame_index: 0,
            view: Mat4::IDENTITY,
            sky_view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            model: Mat4::IDENTITY,
            camera_position: Vec3::ZERO,
            viewport: (1, 1),
            refraction: RefractionParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model_transform::ModelTransform;

    use super::*;

    #[test]
    fn small_accepted_scale_still_inverts() {
        let model = Mat4::from_scale(Vec3::new(0.01, 0.01, 0.001));
        ModelTransform::new().update(model).unwrap();

        let packet = FramePacket { model, ..Default::default() };
        let n = packet
            .normal_matrix()
            .transform_vector3(Vec3::new(1.0, 0.0, 1.0))
            .normalize();
        // the flattened axis dominates the surface normal
        assert!((n - Vec3::new(0.1, 0.0, 1.0).normalize()).length() < 1e-4, "{n:?}");
    }
}
