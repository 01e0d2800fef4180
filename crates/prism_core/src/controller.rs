use std::collections::HashMap;

use glam::{Quat, Vec3};

use crate::camera::CameraState;
use crate::input::{InputState, KeyCode, MouseButton};

/// Free-fly camera controller.
///
/// Maps keys to camera-space directions and turns held keys into a new
/// [`CameraState`]. The controller itself holds only configuration; the
/// camera state flows in and out of [`FlyController::update`].
#[derive(Debug, Clone)]
pub struct FlyController {
    /// Key → camera-space direction (+Z forward, +X right, +Y up).
    mappings: HashMap<KeyCode, Vec3>,
    /// Translation speed in world units per second.
    pub speed: f32,
    /// Arrow-key look speed in radians per second.
    pub look_speed: f32,
    /// Right-drag look sensitivity in radians per pixel.
    pub mouse_sensitivity: f32,
    pub exit_key: KeyCode,
}

/// How far from straight up/down the view may pitch.
const PITCH_MARGIN: f32 = 0.02;

impl Default for FlyController {
    fn default() -> Self {
        Self::with_default_wasd()
    }
}

impl FlyController {
    /// Empty controller with no movement bindings.
    pub fn new() -> Self {
        Self {
            mappings: HashMap::new(),
            speed: 2.5,
            look_speed: 1.5,
            mouse_sensitivity: 0.004,
            exit_key: KeyCode::Escape,
        }
    }

    /// WASD for planar movement, E/Q for up/down.
    pub fn with_default_wasd() -> Self {
        let mut ctl = Self::new();
        ctl.bind(KeyCode::KeyW, Vec3::Z);
        ctl.bind(KeyCode::KeyS, Vec3::NEG_Z);
        ctl.bind(KeyCode::KeyA, Vec3::NEG_X);
        ctl.bind(KeyCode::KeyD, Vec3::X);
        ctl.bind(KeyCode::KeyE, Vec3::Y);
        ctl.bind(KeyCode::KeyQ, Vec3::NEG_Y);
        ctl
    }

    /// Binds `key` to a camera-space direction, replacing any old binding.
    pub fn bind(&mut self, key: KeyCode, dir: Vec3) {
        self.mappings.insert(key, dir);
    }

    /// Sum of the directions bound to currently held keys (not normalised).
    pub fn direction(&self, input: &InputState) -> Vec3 {
        self.mappings
            .iter()
            .filter(|(key, _)| input.is_key_pressed(**key))
            .fold(Vec3::ZERO, |acc, (_, dir)| acc + *dir)
    }

    /// `true` when the user asked to quit this frame.
    pub fn exit_requested(&self, input: &InputState) -> bool {
        input.is_key_pressed(self.exit_key)
    }

    /// Applies one frame of input and returns the updated camera.
    ///
    /// `dt` is in seconds.
    pub fn update(&self, mut camera: CameraState, input: &mut InputState, dt: f32) -> CameraState {
        let dir = self.direction(input);
        if dir.length_squared() > 1e-6 {
            let world = camera.right() * dir.x + camera.up * dir.y + camera.forward() * dir.z;
            camera.position += world.normalize_or_zero() * self.speed * dt;
        }

        let mut yaw = 0.0;
        let mut pitch = 0.0;
        if input.is_key_pressed(KeyCode::ArrowLeft) {
            yaw += self.look_speed * dt;
        }
        if input.is_key_pressed(KeyCode::ArrowRight) {
            yaw -= self.look_speed * dt;
        }
        if input.is_key_pressed(KeyCode::ArrowUp) {
            pitch += self.look_speed * dt;
        }
        if input.is_key_pressed(KeyCode::ArrowDown) {
            pitch -= self.look_speed * dt;
        }

        let (dx, dy) = input.consume_mouse_delta();
        if input.is_button_down(MouseButton::Right) {
            yaw -= dx * self.mouse_sensitivity;
            pitch -= dy * self.mouse_sensitivity;
        }

        if yaw != 0.0 || pitch != 0.0 {
            camera.set_forward(look(camera.forward(), camera.up, yaw, pitch));
        }
        camera
    }
}

/// Rotates `forward` by `yaw` about `up` and by `pitch` about the right axis,
/// keeping the result away from the poles.
fn look(forward: Vec3, up: Vec3, yaw: f32, pitch: f32) -> Vec3 {
    let current = forward.dot(up).clamp(-1.0, 1.0).asin();
    let limit = std::f32::consts::FRAC_PI_2 - PITCH_MARGIN;
    let pitch = (current + pitch).clamp(-limit, limit) - current;

    let right = forward.cross(up).try_normalize().unwrap_or(Vec3::X);
    let rot = Quat::from_axis_angle(up, yaw) * Quat::from_axis_angle(right, pitch);
    rot * forward
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> CameraState {
        CameraState::looking_at(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO)
    }

    #[test]
    fn forward_key_moves_along_view() {
        let ctl = FlyController::with_default_wasd();
        let mut input = InputState::new();
        input.update_key(KeyCode::KeyW, true);
        let cam = ctl.update(camera(), &mut input, 1.0);
        assert!((cam.position - Vec3::new(0.0, 0.0, 3.0 - ctl.speed)).length() < 1e-5);
    }

    #[test]
    fn opposite_keys_cancel() {
        let ctl = FlyController::with_default_wasd();
        let mut input = InputState::new();
        input.update_key(KeyCode::KeyA, true);
        input.update_key(KeyCode::KeyD, true);
        let cam = ctl.update(camera(), &mut input, 0.5);
        assert_eq!(cam.position, camera().position);
    }

    #[test]
    fn pitch_is_clamped_and_forward_stays_unit() {
        let ctl = FlyController::with_default_wasd();
        let mut input = InputState::new();
        input.update_key(KeyCode::ArrowUp, true);
        let mut cam = camera();
        for _ in 0..100 {
            cam = ctl.update(cam, &mut input, 0.1);
        }
        assert!((cam.forward().length() - 1.0).abs() < 1e-5);
        assert!(cam.forward().dot(Vec3::Y) < 1.0 - 1e-4);
        assert!(cam.view_matrix().is_finite());
    }

    #[test]
    fn escape_requests_exit() {
        let ctl = FlyController::default();
        let mut input = InputState::new();
        assert!(!ctl.exit_requested(&input));
        input.update_key(KeyCode::Escape, true);
        assert!(ctl.exit_requested(&input));
    }
}
