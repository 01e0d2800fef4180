//! Window, configuration and frame loop for the Prism refraction renderer.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use prism_app::{App, AppConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     App::new(AppConfig::default())
//!         .with_title("Glass")
//!         .with_model("assets/models/teapot.glb")
//!         .run()
//! }
//! ```

pub mod builder;
pub mod config;
mod graphics;
pub mod logging;
mod runner;

pub use builder::App;
pub use config::{AppConfig, CameraConfig, ConfigError, RefractionConfig};
