use engine::{LoopConfig, Scene};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{load_tuning_from_env, ConfigError};
use super::gameplay;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, ConfigError> {
    init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "=== Spirit of the Hive Startup ===");

    let tuning = load_tuning_from_env()?;
    let config = LoopConfig {
        window_width: tuning.stage.width.round() as u32,
        window_height: tuning.stage.height.round() as u32,
        ..LoopConfig::default()
    };
    info!(
        width = config.window_width,
        height = config.window_height,
        target_tps = config.target_tps,
        "loop_configured"
    );

    Ok(AppWiring {
        config,
        scene: gameplay::build_story_scene(tuning),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
