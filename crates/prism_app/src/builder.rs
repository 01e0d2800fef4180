use std::path::PathBuf;

use crate::config::AppConfig;

/// Entry point. Starts from a loaded [`AppConfig`]; the `with_*` methods
/// override single settings before [`App::run`].
pub struct App {
    config: AppConfig,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.config.title = title.to_string();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.config.vsync = vsync;
        self
    }

    pub fn with_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.model_path = Some(path.into());
        self
    }

    pub fn with_skybox(mut self, faces: [PathBuf; 6]) -> Self {
        self.config.skybox_faces = Some(faces);
        self
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Opens the window and runs the frame loop until it is closed. Returns
    /// the fatal error that stopped the loop, if any.
    pub fn run(self) -> anyhow::Result<()> {
        crate::runner::run_internal(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_on_top_of_config() {
        let app = App::new(AppConfig::default())
            .with_title("Lens")
            .with_size(640, 480)
            .with_vsync(false)
            .with_model("teapot.glb")
            .with_skybox(["px", "nx", "py", "ny", "pz", "nz"].map(|f| PathBuf::from(format!("sky/{f}.png"))));
        let cfg = app.config();
        assert_eq!(cfg.title, "Lens");
        assert_eq!((cfg.width, cfg.height), (640, 480));
        assert!(!cfg.vsync);
        assert_eq!(cfg.model_path.as_deref(), Some(std::path::Path::new("teapot.glb")));
        let faces = cfg.skybox_faces.as_ref().unwrap();
        assert_eq!(faces[0], PathBuf::from("sky/px.png"));
        assert_eq!(faces[5], PathBuf::from("sky/nz.png"));
    }
}
