//! Runtime configuration from the environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use combat_content::{ConfigLoader, LootTableLoader, LootTableRegistry};
use combat_core::CombatConfig;

use crate::api::{Result, RuntimeError, TimedClassifier};

/// Settings the runtime reads at startup.
///
/// Environment variables:
/// - `COMBAT_SEED` - game seed (default: random)
/// - `COMBAT_CLASSIFIER_TIMEOUT_MS` - external classifier budget (default: 750)
/// - `COMBAT_CONFIG_PATH` - TOML combat tuning (default: built-in values)
/// - `COMBAT_LOOT_PATH` - RON loot catalog (default: no loot tables)
/// - `COMBAT_EVENT_BUFFER` - broadcast capacity for event subscribers (default: 256)
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub game_seed: u64,
    pub classifier_timeout: Duration,
    pub config_path: Option<PathBuf>,
    pub loot_path: Option<PathBuf>,
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_seed: 0,
            classifier_timeout: TimedClassifier::DEFAULT_TIMEOUT,
            config_path: None,
            loot_path: None,
            event_buffer_size: 256,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from environment variables.
    ///
    /// Unset variables keep their defaults; set but unparsable ones are errors.
    pub fn from_env() -> Result<Self> {
        let mut config = Self {
            game_seed: rand::random(),
            ..Self::default()
        };

        if let Some(seed) = parse_env::<u64>("COMBAT_SEED")? {
            config.game_seed = seed;
        }
        if let Some(ms) = parse_env::<u64>("COMBAT_CLASSIFIER_TIMEOUT_MS")? {
            config.classifier_timeout = Duration::from_millis(ms);
        }
        if let Some(size) = parse_env::<usize>("COMBAT_EVENT_BUFFER")? {
            config.event_buffer_size = size.max(1);
        }
        config.config_path = env::var_os("COMBAT_CONFIG_PATH").map(PathBuf::from);
        config.loot_path = env::var_os("COMBAT_LOOT_PATH").map(PathBuf::from);

        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.game_seed = seed;
        self
    }

    /// Combat tuning from `config_path`, or the defaults.
    pub fn load_combat_config(&self) -> Result<CombatConfig> {
        match &self.config_path {
            Some(path) => ConfigLoader::load(path).map_err(RuntimeError::Content),
            None => Ok(CombatConfig::default()),
        }
    }

    /// Loot tables from `loot_path`, or an empty registry.
    pub fn load_loot(&self) -> Result<LootTableRegistry> {
        match &self.loot_path {
            Some(path) => LootTableLoader::load(path).map_err(RuntimeError::Content),
            None => Ok(LootTableRegistry::new()),
        }
    }
}

fn parse_env<T>(key: &'static str) -> Result<Option<T>>
where
    T: std::str::FromStr,
{
    let Ok(value) = env::var(key) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| RuntimeError::InvalidEnv { key, value })
}
