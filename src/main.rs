use nebula_field::config::NebulaConfig;
use nebula_field::core::{self, NebulaResult};
use nebula_field::platform;
use nebula_field::render::Viewport;
use std::path::PathBuf;

/// 无窗口模式默认渲染帧数
const DEFAULT_SNAPSHOT_FRAMES: u32 = 240;

fn load_config() -> NebulaResult<NebulaConfig> {
    let mut config = match NebulaConfig::locate() {
        Some(path) => NebulaConfig::from_file(&path)?,
        None => NebulaConfig::default(),
    };
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

fn snapshot(config: &NebulaConfig, path: PathBuf) -> NebulaResult<()> {
    let frames = std::env::var("NEBULA_SNAPSHOT_FRAMES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_SNAPSHOT_FRAMES);
    let viewport = Viewport::new(config.window.width, config.window.height);

    let canvas = core::render_headless(config, viewport, frames)?;
    canvas.to_rgba8_over_black().save(&path)?;
    tracing::info!(target: "nebula::driver", frames, path = %path.display(), "snapshot written");
    Ok(())
}

fn run() -> NebulaResult<()> {
    let config = load_config()?;
    core::logging::init(&config.logging);

    match std::env::var_os("NEBULA_SNAPSHOT") {
        Some(path) => snapshot(&config, PathBuf::from(path)),
        None => platform::run(config),
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("nebula failed: {}", e);
        std::process::exit(1);
    }
}
