use hive_engine::{resolve_app_paths, LoopConfig, MetricsHandle, Scene, StartupError};
use rand::SeedableRng;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{self, ConfigError, GameConfig, Messages, MESSAGES_PATH};
use super::gameplay::{DirectorError, GameRng, LevelDirector, LevelName};

const START_LEVEL_ENV_VAR: &str = "HONEY_THIEF_START_LEVEL";

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Director(#[from] DirectorError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
    pub(crate) metrics: MetricsHandle,
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Honey Thief Startup ===");

    let paths = resolve_app_paths()?;
    let config_path = config::config_path(&paths.assets_dir)?;
    let game_config = GameConfig::load(&config_path)?;
    let messages = Messages::load(&paths.assets_dir.join(MESSAGES_PATH))?;
    info!(
        config = %config_path.display(),
        outside_height = game_config.outside_height,
        debug_level_keys = game_config.debug_level_keys,
        "config_loaded"
    );

    let seed = match config::seed_from_env()? {
        Some(seed) => seed,
        None => rand::random(),
    };
    info!(seed, "rng_seeded");

    let metrics = MetricsHandle::default();
    let mut director = LevelDirector::new(
        game_config.clone(),
        messages,
        GameRng::seed_from_u64(seed),
        metrics.clone(),
        LevelName::Home,
    )?;
    if let Some(start) = start_level_from_env() {
        info!(level = %start, "start_level_override");
        director.change_level_by_name(&start)?;
    }

    let config = LoopConfig {
        window_title: "Honey Thief".to_string(),
        window_width: game_config.window_width as u32,
        window_height: game_config.window_height as u32,
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        scene: Box::new(director),
        metrics,
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

fn start_level_from_env() -> Option<String> {
    std::env::var(START_LEVEL_ENV_VAR)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|name| !name.is_empty())
}
