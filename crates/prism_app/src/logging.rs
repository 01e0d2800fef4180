use std::time::Instant;

use log::LevelFilter;

/// Crates whose output is clamped to `warn` regardless of the configured level.
const NOISY: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

/// Parses a level name, falling back to `info`.
pub fn parse_level(name: &str) -> LevelFilter {
    name.trim().parse().unwrap_or(LevelFilter::Info)
}

/// Installs the global logger: `[seconds level target] message` on stderr.
pub fn init(level_name: &str) -> Result<(), log::SetLoggerError> {
    let level = parse_level(level_name);
    let start = Instant::now();

    let mut dispatch = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{:>9.3} {:<5} {}] {}",
                start.elapsed().as_secs_f64(),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level);
    for target in NOISY {
        dispatch = dispatch.level_for(target, level.min(LevelFilter::Warn));
    }
    dispatch.chain(std::io::stderr()).apply()?;

    if level_name.trim().parse::<LevelFilter>().is_err() {
        log::warn!("unknown log level `{level_name}`, using info");
    }
    Ok(())
}
