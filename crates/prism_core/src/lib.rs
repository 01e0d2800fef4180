//! `prism_core`: engine-wide types shared by the renderer, the asset
//! loaders and the application runner.
//!
//! | Module       | Responsibility                                         |
//! |--------------|--------------------------------------------------------|
//! | `context`    | `EngineContext`: wgpu instance/adapter/device/queue    |
//! | `input`      | `InputState` fed from winit events                     |
//! | `camera`     | `CameraState` (position/forward/up) and `Projection`   |
//! | `controller` | `FlyController`: input → new `CameraState`             |
//! | `transform`  | `Transform` for model placement                        |
//! | `time`       | `TimeClock` / `Time` frame timing                      |

pub mod camera;
pub mod context;
pub mod controller;
pub mod input;
pub mod time;
pub mod transform;

pub use camera::{CameraState, Projection};
pub use context::{ContextError, EngineContext};
pub use controller::FlyController;
pub use input::{InputState, KeyCode, MouseButton};
pub use time::{Time, TimeClock};
pub use transform::Transform;

pub use glam;
