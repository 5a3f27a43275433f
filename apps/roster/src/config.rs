//! # Configuration
//!
//! Load order: `roster.toml` in the working directory → environment
//! variables → defaults.

use roster_core::RosterError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the inventory file path.
pub const INVENTORY_ENV: &str = "ROSTER_INVENTORY";

/// Top-level Roster configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Inventory document the commands operate on, unless `--inventory`
    /// points elsewhere.
    pub inventory: PathBuf,
    /// Pretty-print JSON output when writing the inventory back.
    pub pretty: bool,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            inventory: PathBuf::from("inventory.json"),
            pretty: true,
        }
    }
}

impl RosterConfig {
    /// Load config from `roster.toml` in `dir`, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(dir: &Path) -> Result<Self, RosterError> {
        let config_path = dir.join("roster.toml");

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| RosterError::Io(format!("{}: {}", config_path.display(), e)))?;
            toml::from_str(&content)
                .map_err(|e| RosterError::Serialization(format!("{}: {}", config_path.display(), e)))?
        } else {
            Self::default()
        };

        if let Ok(path) = std::env::var(INVENTORY_ENV) {
            config.inventory = PathBuf::from(path);
        }

        Ok(config)
    }

    /// Pick the inventory path: an explicit CLI flag beats the config.
    #[must_use]
    pub fn resolve_inventory(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.unwrap_or_else(|| self.inventory.clone())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = RosterConfig::default();
        assert_eq!(config.inventory, PathBuf::from("inventory.json"));
        assert!(config.pretty);
    }

    #[test]
    fn config_from_toml() {
        let config: RosterConfig = toml::from_str(
            r#"
inventory = "prod/inventory.json"
pretty = false
"#,
        )
        .expect("parse");
        assert_eq!(config.inventory, PathBuf::from("prod/inventory.json"));
        assert!(!config.pretty);
    }

    #[test]
    fn load_nonexistent_falls_back_to_defaults() {
        let config = RosterConfig::load(Path::new("/nonexistent/path")).expect("load");
        assert_eq!(config.inventory, PathBuf::from("inventory.json"));
    }

    #[test]
    fn cli_flag_beats_config() {
        let config = RosterConfig::default();
        assert_eq!(
            config.resolve_inventory(Some(PathBuf::from("other.json"))),
            PathBuf::from("other.json")
        );
        assert_eq!(
            config.resolve_inventory(None),
            PathBuf::from("inventory.json")
        );
    }
}
