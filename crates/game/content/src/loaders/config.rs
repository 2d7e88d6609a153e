//! Combat configuration loader.

use std::path::Path;

use anyhow::Context;
use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat tuning from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their defaults, so a file only needs the values it
    /// overrides.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parse config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig =
            toml::from_str(content).context("Failed to parse combat config TOML")?;

        anyhow::ensure!(
            config.min_action_cost >= CombatConfig::DEFAULT_MIN_ACTION_COST,
            "min_action_cost must be at least {}",
            CombatConfig::DEFAULT_MIN_ACTION_COST
        );
        anyhow::ensure!(
            config.variance_percent <= 100,
            "variance_percent is a percentage, got {}",
            config.variance_percent
        );
        anyhow::ensure!(
            config.corpse_scatter_chance <= 100,
            "corpse_scatter_chance is a percentage, got {}",
            config.corpse_scatter_chance
        );
        anyhow::ensure!(
            (CombatConfig::MIN_DISPOSITION..=CombatConfig::MAX_DISPOSITION)
                .contains(&config.hostility_threshold),
            "hostility_threshold {} is outside the disposition range",
            config.hostility_threshold
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
variance_percent = 10
corpse_scatter_chance = 0

[action_costs]
melee = 4
"#
        )
        .unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();

        assert_eq!(config.variance_percent, 10);
        assert_eq!(config.corpse_scatter_chance, 0);
        assert_eq!(config.action_costs.melee, 4);
        assert_eq!(config.action_costs.flee, 6);
        assert_eq!(config.min_action_cost, CombatConfig::DEFAULT_MIN_ACTION_COST);
        assert_eq!(config.corpse_decay, CombatConfig::default().corpse_decay);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(ConfigLoader::parse("min_action_cost = 0").is_err());
        assert!(ConfigLoader::parse("corpse_scatter_chance = 150").is_err());
        assert!(ConfigLoader::parse("variance_percent = 4294967295").is_err());
        assert!(ConfigLoader::parse("variance_percent = 100").is_ok());
        assert!(ConfigLoader::parse("hostility_threshold = -300").is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = ConfigLoader::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("absent.toml"));
    }
}
