use std::collections::HashSet;

// winit 0.30 moved `KeyCode` under `winit::keyboard`; re-export both so the
// rest of the workspace never names winit modules directly.
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

/// Keyboard and mouse state sampled by the frame loop.
///
/// The runner feeds winit events in; the camera controller polls it once per
/// frame. Nothing here blocks: queries are plain set lookups.
#[derive(Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    mouse_buttons: HashSet<MouseButton>,
    mouse_pos: Option<(f64, f64)>,
    /// Motion accumulated since the last `consume_mouse_delta`.
    mouse_delta: (f32, f32),
}

impl InputState {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn update_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_down.insert(key);
        } else {
            self.keys_down.remove(&key);
        }
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn update_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.mouse_buttons.insert(button);
        } else {
            self.mouse_buttons.remove(&button);
        }
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    /// Records a cursor position. The first sample only seeds the position;
    /// later samples add to the pending delta.
    pub fn set_mouse_position(&mut self, x: f64, y: f64) {
        if let Some((px, py)) = self.mouse_pos {
            self.mouse_delta.0 += (x - px) as f32;
            self.mouse_delta.1 += (y - py) as f32;
        }
        self.mouse_pos = Some((x, y));
    }

    pub fn mouse_position(&self) -> Option<(f64, f64)> {
        self.mouse_pos
    }

    /// Returns and resets the motion accumulated since the previous call.
    pub fn consume_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Drops all held keys and buttons, e.g. when the window loses focus and
    /// release events will never arrive.
    pub fn clear(&mut self) {
        self.keys_down.clear();
        self.mouse_buttons.clear();
        self.mouse_delta = (0.0, 0.0);
    }
}
