//! New-game configuration, loadable from YAML.

use serde::{Deserialize, Serialize};
use sim_core::{Location, ValidationError, DEFAULT_CAPACITY};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid config: {0}")]
    Parse(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// The vehicle a new player is handed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarterVehicle {
    pub name: String,
    pub capacity: u32,
}

impl Default for StarterVehicle {
    fn default() -> Self {
        Self {
            name: "KCK 001A".to_string(),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Parameters for [`crate::GameSession::from_config`]. Missing keys fall back to defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Opening balance in KES.
    pub starting_money: u64,
    /// Location name, parsed case-insensitively.
    pub starting_location: String,
    /// Omit with `starting_vehicle: ~` to start with an empty fleet.
    pub starting_vehicle: Option<StarterVehicle>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_money: 5000,
            starting_location: Location::Rongai.name().to_string(),
            starting_vehicle: Some(StarterVehicle::default()),
        }
    }
}

impl GameConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn location(&self) -> Result<Location, ConfigError> {
        Ok(self.starting_location.parse::<Location>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_new_game() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.starting_money, 5000);
        assert_eq!(cfg.location().unwrap(), Location::Rongai);
        let starter = cfg.starting_vehicle.unwrap();
        assert_eq!(starter.name, "KCK 001A");
        assert_eq!(starter.capacity, 14);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg = GameConfig::from_yaml_str("starting_location: kayole\n").unwrap();
        assert_eq!(cfg.starting_money, 5000);
        assert_eq!(cfg.location().unwrap(), Location::Kayole);
        assert!(cfg.starting_vehicle.is_some());
    }

    #[test]
    fn yaml_overrides_and_empty_fleet() {
        let yaml = "starting_money: 120\nstarting_location: Umoja\nstarting_vehicle: ~\n";
        let cfg = GameConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.starting_money, 120);
        assert_eq!(cfg.starting_vehicle, None);
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(matches!(
            GameConfig::from_yaml_str("starting_money: lots"),
            Err(ConfigError::Parse(_))
        ));
        let cfg = GameConfig {
            starting_location: "Mombasa".into(),
            ..GameConfig::default()
        };
        assert!(matches!(
            cfg.location(),
            Err(ConfigError::Invalid(ValidationError::UnknownLocation(_)))
        ));
        assert!(matches!(
            GameConfig::load("/nonexistent/matatu.yaml"),
            Err(ConfigError::Io(_))
        ));
    }
}
