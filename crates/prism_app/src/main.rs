use std::path::PathBuf;

use anyhow::Context as _;
use prism_app::{logging, App, AppConfig};

fn main() -> anyhow::Result<()> {
    let explicit = std::env::args_os().nth(1).map(PathBuf::from);
    let cwd = std::env::current_dir().context("reading working directory")?;
    let (config, source) = AppConfig::discover(explicit, &cwd)?;

    logging::init(&config.log_level).context("installing logger")?;
    match source {
        Some(path) => log::info!("config: {}", path.display()),
        None => log::info!("config: defaults"),
    }

    App::new(config).run()
}
