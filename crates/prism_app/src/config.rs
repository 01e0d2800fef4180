//! Application configuration.
//!
//! Every field has a default, so a TOML file only needs the keys it wants to
//! change. The file is looked up once at startup: an explicit path from the
//! command line, else `prism.toml` in the working directory, else nothing.

use std::path::{Path, PathBuf};

use prism_core::glam::Vec3;
use prism_renderer::RefractionParams;
use serde::Deserialize;
use thiserror::Error;

/// Looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "prism.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config `{}`: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Initial window, scene and logging settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
    /// glTF model to refract. The built-in cube is used when absent or when
    /// loading fails.
    pub model_path: Option<PathBuf>,
    /// Face images in +X, −X, +Y, −Y, +Z, −Z order. A generated gradient sky
    /// is used when absent.
    pub skybox_faces: Option<[PathBuf; 6]>,
    /// Uniform scale applied to the model.
    pub model_scale: f32,
    /// Model rotation about +Y in radians per second.
    pub spin_speed: f32,
    pub refraction: RefractionConfig,
    pub camera: CameraConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Prism".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            log_level: "info".to_string(),
            model_path: None,
            skybox_faces: None,
            model_scale: 1.0,
            spin_speed: 0.3,
            refraction: RefractionConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RefractionConfig {
    pub tint: [f32; 3],
    pub bend: f32,
    pub reflectivity: f32,
}

impl Default for RefractionConfig {
    fn default() -> Self {
        let params = RefractionParams::default();
        Self {
            tint: params.tint.to_array(),
            bend: params.bend,
            reflectivity: params.reflectivity,
        }
    }
}

impl RefractionConfig {
    /// Renderer parameters. Reflectivity is clamped to `[0, 1]`.
    pub fn params(&self) -> RefractionParams {
        RefractionParams {
            tint: Vec3::from(self.tint),
            bend: self.bend,
            reflectivity: self.reflectivity.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// World units per second.
    pub speed: f32,
    /// Arrow-key look speed in radians per second.
    pub look_speed: f32,
    pub fov_degrees: f32,
    /// Start position; the camera initially faces the origin.
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            speed: 2.5,
            look_speed: 1.5,
            fov_degrees: 45.0,
            position: [0.0, 0.5, 3.0],
        }
    }
}

impl CameraConfig {
    /// Vertical field of view in radians, kept inside `(0, 180)` degrees.
    pub fn fovy(&self) -> f32 {
        self.fov_degrees.clamp(1.0, 179.0).to_radians()
    }
}

impl AppConfig {
    pub fn from_toml_str(source: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&source, path)
    }

    /// Resolves the config for this run.
    ///
    /// An explicit path must exist. Without one, `DEFAULT_CONFIG_FILE` inside
    /// `dir` is used if present. Returns the file actually read, if any.
    pub fn discover(explicit: Option<PathBuf>, dir: &Path) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load(&path)?, Some(path)));
        }
        let fallback = dir.join(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            return Ok((Self::load(&fallback)?, Some(fallback)));
        }
        Ok((Self::default(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = AppConfig::from_toml_str(
            r#"
                title = "Glass"
                width = 800

                [refraction]
                bend = 0.6

                [camera]
                position = [1.0, 2.0, 3.0]
            "#,
            Path::new("inline.toml"),
        )
        .unwrap();

        assert_eq!(cfg.title, "Glass");
        assert_eq!(cfg.width, 800);
        assert_eq!(cfg.height, AppConfig::default().height);
        assert_eq!(cfg.refraction.bend, 0.6);
        assert_eq!(cfg.refraction.reflectivity, RefractionConfig::default().reflectivity);
        assert_eq!(cfg.camera.position, [1.0, 2.0, 3.0]);
        assert_eq!(cfg.camera.speed, CameraConfig::default().speed);
        assert!(cfg.model_path.is_none());
    }

    #[test]
    fn skybox_needs_six_faces() {
        let ok = AppConfig::from_toml_str(
            r#"skybox_faces = ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"]"#,
            Path::new("a.toml"),
        )
        .unwrap();
        assert_eq!(ok.skybox_faces.unwrap()[3], PathBuf::from("ny.png"));

        let err = AppConfig::from_toml_str(r#"skybox_faces = ["px.png"]"#, Path::new("b.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn discover_prefers_explicit_then_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let (cfg, source) = AppConfig::discover(None, dir.path()).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert!(source.is_none());

        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "vsync = false\n").unwrap();
        let (cfg, source) = AppConfig::discover(None, dir.path()).unwrap();
        assert!(!cfg.vsync);
        assert_eq!(source, Some(dir.path().join(DEFAULT_CONFIG_FILE)));

        let explicit = dir.path().join("other.toml");
        std::fs::write(&explicit, "spin_speed = 0.0\n").unwrap();
        let (cfg, _) = AppConfig::discover(Some(explicit), dir.path()).unwrap();
        assert_eq!(cfg.spin_speed, 0.0);
        assert!(cfg.vsync);

        let missing = AppConfig::discover(Some(dir.path().join("nope.toml")), dir.path());
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn refraction_params_are_clamped() {
        let cfg = RefractionConfig {
            reflectivity: 3.0,
            ..Default::default()
        };
        assert_eq!(cfg.params().reflectivity, 1.0);
        assert!((CameraConfig { fov_degrees: 0.0, ..Default::default() }.fovy() - 1f32.to_radians()).abs() < 1e-6);
    }
}
