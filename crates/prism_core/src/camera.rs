//! Camera state and projection parameters.
//!
//! `CameraState` is plain data passed by value: the controller returns a new
//! state each frame and the renderer reads it once to build the view matrix.
//! There is no global camera.

use glam::{Mat4, Vec3};

/// Position and orientation of the viewer.
///
/// `forward` is unit length; every constructor and mutator re-normalises it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    forward: Vec3,
    pub up: Vec3,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::looking_at(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO)
    }
}

impl CameraState {
    /// Camera at `position` facing `target`, world-up `+Y`.
    ///
    /// If `position == target` the camera faces `-Z`. Looking straight up or
    /// down uses `+Z` as up instead.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let forward = (target - position).try_normalize().unwrap_or(Vec3::NEG_Z);
        let up = if forward.cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        Self { position, forward, up }
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Replaces the view direction. Zero or non-finite input is ignored.
    pub fn set_forward(&mut self, dir: Vec3) {
        if let Some(f) = dir.try_normalize() {
            self.forward = f;
        }
    }

    /// Unit vector pointing to the camera's right.
    pub fn right(&self) -> Vec3 {
        self.forward
            .cross(self.up)
            .try_normalize()
            .unwrap_or(Vec3::X)
    }

    /// Right-handed look-at view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward, self.up)
    }

    /// View matrix with the translation removed, used to draw geometry that
    /// must appear infinitely far away.
    pub fn rotation_only_view(&self) -> Mat4 {
        let mut view = self.view_matrix();
        view.w_axis = glam::Vec4::W;
        view
    }
}

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fovy: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fovy: 45.0f32.to_radians(),
            aspect: 4.0 / 3.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl Projection {
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar)
    }

    /// Updates the aspect ratio from a viewport size. Returns `true` when the
    /// aspect actually changed; a zero-sized viewport (minimised window) is
    /// ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        let aspect = width as f32 / height as f32;
        if (aspect - self.aspect).abs() <= f32::EPSILON {
            return false;
        }
        self.aspect = aspect;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_is_unit_length() {
        let mut cam = CameraState::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        assert!((cam.forward().length() - 1.0).abs() < 1e-6);
        cam.set_forward(Vec3::new(3.0, 0.0, 4.0));
        assert!((cam.forward().length() - 1.0).abs() < 1e-6);
        cam.set_forward(Vec3::ZERO);
        assert!((cam.forward() - Vec3::new(0.6, 0.0, 0.8)).length() < 1e-6);
    }

    #[test]
    fn vertical_view_is_finite() {
        for y in [4.0, -4.0] {
            let cam = CameraState::looking_at(Vec3::new(0.0, y, 0.0), Vec3::ZERO);
            assert_eq!(cam.up, Vec3::Z);
            assert!(cam.view_matrix().is_finite());
            assert!(cam.right().is_normalized());
        }
        assert_eq!(CameraState::default().up, Vec3::Y);
    }

    #[test]
    fn rotation_only_view_drops_translation() {
        let cam = CameraState::looking_at(Vec3::new(4.0, 5.0, 6.0), Vec3::ZERO);
        let sky = cam.rotation_only_view();
        assert_eq!(sky.w_axis, glam::Vec4::W);
        let dir = Vec3::new(0.3, -0.2, 0.9);
        let full = cam.view_matrix().transform_vector3(dir);
        assert!((sky.transform_vector3(dir) - full).length() < 1e-5);
    }

    #[test]
    fn aspect_only_changes_on_real_resize() {
        let mut proj = Projection::default();
        assert!(proj.set_viewport(1280, 720));
        assert!(!proj.set_viewport(1280, 720));
        assert!(!proj.set_viewport(0, 720));
        assert!((proj.aspect - 1280.0 / 720.0).abs() < 1e-6);
    }
}
