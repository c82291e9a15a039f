use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use super::gameplay::LevelName;

pub(crate) const CONFIG_ENV_VAR: &str = "HONEY_THIEF_CONFIG";
pub(crate) const SEED_ENV_VAR: &str = "HONEY_THIEF_SEED";
pub(crate) const DEFAULT_CONFIG_PATH: &str = "config/game.json";
pub(crate) const MESSAGES_PATH: &str = "messages.json";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path} at {json_path}: {message}")]
    Parse {
        path: PathBuf,
        json_path: String,
        message: String,
    },
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: std::env::VarError,
    },
    #[error("{var} must be an unsigned integer, got {value:?}")]
    InvalidSeed { var: &'static str, value: String },
}

/// Tuning values for the whole game. Units are world units (pixels) and
/// seconds; speeds are per second.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) window_width: f32,
    pub(crate) window_height: f32,
    pub(crate) info_bar_height: f32,
    pub(crate) padding: f32,
    pub(crate) outside_height: f32,

    pub(crate) player_speed: f32,
    pub(crate) outside_speed_multiplier: f32,
    pub(crate) camera_speed: f32,
    pub(crate) animation_speed: u32,

    pub(crate) player_half_extent: f32,
    pub(crate) friendly_bee_half_extent: f32,
    pub(crate) enemy_bee_half_extent: f32,
    pub(crate) honey_half_extent: f32,
    pub(crate) wasp_half_extent: f32,
    pub(crate) scent_half_extent: f32,
    pub(crate) exit_half_extent: f32,

    pub(crate) friendly_bee_count: usize,
    pub(crate) enemy_bee_count: usize,
    pub(crate) honey_count: usize,
    pub(crate) foreign_hive_time_limit: f32,

    pub(crate) scent_interval: f32,
    pub(crate) scent_spawn_margin: f32,
    pub(crate) scent_delta_x_max: f32,

    pub(crate) wasp_attack_interval: f32,
    pub(crate) wasp_speed_min: f32,
    pub(crate) wasp_speed_max: f32,
    pub(crate) wasp_spawn_distance: f32,
    pub(crate) wasp_wave_chance: f64,
    pub(crate) wasp_wave_spacing: f32,
    pub(crate) wasp_despawn_distance: f32,

    /// Enemy bees fidget with probability `1 / (bee_rotate_chance + 1)` per tick.
    pub(crate) bee_rotate_chance: u32,
    pub(crate) friend_rotate_chance: u32,
    /// Score lost when the player bumps into an enemy bee. Zero keeps the
    /// contact cosmetic.
    pub(crate) enemy_bee_contact_penalty: u32,
    pub(crate) typing_speed: u32,
    pub(crate) transition_pause: f32,
    pub(crate) placement_max_attempts: u32,
    pub(crate) debug_level_keys: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 800.0,
            window_height: 750.0,
            info_bar_height: 150.0,
            padding: 25.0,
            outside_height: 8896.0,
            player_speed: 105.0,
            outside_speed_multiplier: 1.5,
            camera_speed: 120.0,
            animation_speed: 3,
            player_half_extent: 16.0,
            friendly_bee_half_extent: 16.0,
            enemy_bee_half_extent: 24.0,
            honey_half_extent: 12.0,
            wasp_half_extent: 24.0,
            scent_half_extent: 10.0,
            exit_half_extent: 24.0,
            friendly_bee_count: 20,
            enemy_bee_count: 75,
            honey_count: 15,
            foreign_hive_time_limit: 30.0,
            scent_interval: 0.75,
            scent_spawn_margin: 50.0,
            scent_delta_x_max: 100.0,
            wasp_attack_interval: 3.0,
            wasp_speed_min: 420.0,
            wasp_speed_max: 480.0,
            wasp_spawn_distance: 700.0,
            wasp_wave_chance: 0.5,
            wasp_wave_spacing: 150.0,
            wasp_despawn_distance: 1400.0,
            bee_rotate_chance: 100,
            friend_rotate_chance: 30,
            enemy_bee_contact_penalty: 0,
            typing_speed: 2,
            transition_pause: 0.5,
            placement_max_attempts: 1000,
            debug_level_keys: false,
        }
    }
}

impl GameConfig {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = match read_optional(path)? {
            Some(raw) => parse_json::<Self>(path, &raw)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        positive("window_width", self.window_width)?;
        positive("window_height", self.window_height)?;
        non_negative("info_bar_height", self.info_bar_height)?;
        non_negative("padding", self.padding)?;
        if self.info_bar_height >= self.window_height {
            return Err(invalid(
                "info_bar_height",
                format!(
                    "must be smaller than window_height ({})",
                    self.window_height
                ),
            ));
        }
        let play_height = self.window_height - self.info_bar_height;
        if self.padding * 2.0 >= self.window_width.min(play_height) {
            return Err(invalid(
                "padding",
                format!("leaves no room inside the {}x{play_height} play area", self.window_width),
            ));
        }
        if self.outside_height < self.window_height {
            return Err(invalid(
                "outside_height",
                format!("must be at least window_height ({})", self.window_height),
            ));
        }

        positive("player_speed", self.player_speed)?;
        positive("outside_speed_multiplier", self.outside_speed_multiplier)?;
        positive("camera_speed", self.camera_speed)?;
        if self.animation_speed == 0 {
            return Err(invalid("animation_speed", "must be at least 1".to_string()));
        }

        positive("player_half_extent", self.player_half_extent)?;
        positive("friendly_bee_half_extent", self.friendly_bee_half_extent)?;
        positive("enemy_bee_half_extent", self.enemy_bee_half_extent)?;
        positive("honey_half_extent", self.honey_half_extent)?;
        positive("wasp_half_extent", self.wasp_half_extent)?;
        positive("scent_half_extent", self.scent_half_extent)?;
        positive("exit_half_extent", self.exit_half_extent)?;

        positive("foreign_hive_time_limit", self.foreign_hive_time_limit)?;
        positive("scent_interval", self.scent_interval)?;
        non_negative("scent_spawn_margin", self.scent_spawn_margin)?;
        non_negative("scent_delta_x_max", self.scent_delta_x_max)?;

        positive("wasp_attack_interval", self.wasp_attack_interval)?;
        positive("wasp_speed_min", self.wasp_speed_min)?;
        if self.wasp_speed_max < self.wasp_speed_min {
            return Err(invalid(
                "wasp_speed_max",
                format!("must be >= wasp_speed_min ({})", self.wasp_speed_min),
            ));
        }
        positive("wasp_spawn_distance", self.wasp_spawn_distance)?;
        if !(0.0..=1.0).contains(&self.wasp_wave_chance) {
            return Err(invalid(
                "wasp_wave_chance",
                format!("must be within [0, 1], got {}", self.wasp_wave_chance),
            ));
        }
        non_negative("wasp_wave_spacing", self.wasp_wave_spacing)?;
        if self.wasp_despawn_distance <= self.wasp_spawn_distance {
            return Err(invalid(
                "wasp_despawn_distance",
                format!(
                    "must be greater than wasp_spawn_distance ({})",
                    self.wasp_spawn_distance
                ),
            ));
        }

        if self.typing_speed == 0 {
            return Err(invalid("typing_speed", "must be at least 1".to_string()));
        }
        non_negative("transition_pause", self.transition_pause)?;
        if self.placement_max_attempts == 0 {
            return Err(invalid(
                "placement_max_attempts",
                "must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Scroll offset at which an outside level has been fully traversed.
    pub(crate) fn max_scroll(&self) -> f32 {
        self.outside_height - self.window_height
    }

    /// Ticks between animation frame changes.
    pub(crate) fn ticks_per_frame(&self) -> u32 {
        (20 / self.animation_speed.max(1)).max(1)
    }
}

/// Info-bar texts. Level messages are keyed by level name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Messages {
    pub(crate) intro: String,
    pub(crate) home: String,
    pub(crate) outside_leave: String,
    pub(crate) foreign_hive: String,
    pub(crate) outside_return: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            intro: "Our hive is starving. Fly out, follow the scent of honey to the \
                    neighbours' hive and bring back as much as you can carry."
                .to_string(),
            home: "Home sweet hive. Find the exit to head out.".to_string(),
            outside_leave: "Follow the scent trail. Lose it and you will have to start over."
                .to_string(),
            foreign_hive: "Grab the honey before the guards notice. Hold SPACE to fly over \
                           things."
                .to_string(),
            outside_return: "Wasps! Dodge them or fly over them on the way home.".to_string(),
        }
    }
}

impl Messages {
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        match read_optional(path)? {
            Some(raw) => parse_json::<Self>(path, &raw),
            None => Ok(Self::default()),
        }
    }

    pub(crate) fn for_level(&self, level: LevelName) -> &str {
        match level {
            LevelName::Home => &self.home,
            LevelName::OutsideLeave => &self.outside_leave,
            LevelName::ForeignHive => &self.foreign_hive,
            LevelName::OutsideReturn => &self.outside_return,
        }
    }
}

/// `HONEY_THIEF_CONFIG` when set, otherwise the default file under `assets_dir`.
pub(crate) fn config_path(assets_dir: &Path) -> Result<PathBuf, ConfigError> {
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => Ok(PathBuf::from(value.trim())),
        Ok(_) | Err(std::env::VarError::NotPresent) => Ok(assets_dir.join(DEFAULT_CONFIG_PATH)),
        Err(source) => Err(ConfigError::EnvVar {
            var: CONFIG_ENV_VAR,
            source,
        }),
    }
}

pub(crate) fn seed_from_env() -> Result<Option<u64>, ConfigError> {
    match std::env::var(SEED_ENV_VAR) {
        Ok(value) => parse_seed(&value).map(Some),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(source) => Err(ConfigError::EnvVar {
            var: SEED_ENV_VAR,
            source,
        }),
    }
}

fn parse_seed(raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidSeed {
            var: SEED_ENV_VAR,
            value: raw.to_string(),
        })
}

fn read_optional(path: &Path) -> Result<Option<String>, ConfigError> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_json<T: DeserializeOwned>(path: &Path, raw: &str) -> Result<T, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, T>(&mut deserializer).map_err(|error| {
        let json_path = error.path().to_string();
        let source = error.into_inner();
        ConfigError::Parse {
            path: path.to_path_buf(),
            json_path,
            message: source.to_string(),
        }
    })
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must not be negative, got {value}")))
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("write config");
        path
    }

    #[test]
    fn missing_file_means_defaults() {
        let temp = TempDir::new().expect("temp");
        let config = GameConfig::load(&temp.path().join("absent.json")).expect("defaults");
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.max_scroll(), 8146.0);
        assert_eq!(config.ticks_per_frame(), 6);
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let temp = TempDir::new().expect("temp");
        let path = write(
            &temp,
            "game.json",
            r#"{ "honey_count": 3, "enemy_bee_contact_penalty": 1 }"#,
        );

        let config = GameConfig::load(&path).expect("config");
        assert_eq!(config.honey_count, 3);
        assert_eq!(config.enemy_bee_contact_penalty, 1);
        assert_eq!(config.enemy_bee_count, 75);
    }

    #[test]
    fn parse_error_reports_json_path() {
        let temp = TempDir::new().expect("temp");
        let path = write(&temp, "game.json", r#"{ "camera_speed": "fast" }"#);

        let err = GameConfig::load(&path).expect_err("should fail");
        match err {
            ConfigError::Parse { json_path, .. } => assert_eq!(json_path, "camera_speed"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let temp = TempDir::new().expect("temp");
        let path = write(&temp, "game.json", r#"{ "camera_sped": 10.0 }"#);
        assert!(matches!(
            GameConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let cases: [(&str, fn(&mut GameConfig)); 5] = [
            ("camera_speed", |c| c.camera_speed = 0.0),
            ("wasp_speed_max", |c| c.wasp_speed_max = 100.0),
            ("wasp_wave_chance", |c| c.wasp_wave_chance = 1.5),
            ("placement_max_attempts", |c| c.placement_max_attempts = 0),
            ("info_bar_height", |c| c.info_bar_height = 800.0),
        ];
        for (expected, mutate) in cases {
            let mut config = GameConfig::default();
            mutate(&mut config);
            match config.validate() {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
                other => panic!("{expected}: unexpected result {other:?}"),
            }
        }
    }

    #[test]
    fn messages_fall_back_per_field() {
        let temp = TempDir::new().expect("temp");
        let path = write(&temp, "messages.json", r#"{ "home": "Welcome back" }"#);

        let messages = Messages::load(&path).expect("messages");
        assert_eq!(messages.for_level(LevelName::Home), "Welcome back");
        assert_eq!(messages.intro, Messages::default().intro);
    }

    #[test]
    fn seed_parsing() {
        assert_eq!(parse_seed(" 42 ").expect("seed"), 42);
        assert!(matches!(
            parse_seed("forty-two"),
            Err(ConfigError::InvalidSeed { .. })
        ));
    }

    #[test]
    fn shipped_assets_match_defaults() {
        let assets = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets");

        let config = GameConfig::load(&assets.join(DEFAULT_CONFIG_PATH)).expect("game.json");
        assert_eq!(config, GameConfig::default());

        let messages = Messages::load(&assets.join(MESSAGES_PATH)).expect("messages.json");
        assert_eq!(messages.intro, Messages::default().intro);
        assert_eq!(messages.outside_return, Messages::default().outside_return);
    }
}
