//! Scenario configuration.
//!
//! A scenario describes the map, the game rules the driver applies, and the
//! civilizations taking part. It is loaded from a TOML file; every section
//! falls back to its defaults.

use std::path::Path;

use empire_ai::AiConfig;
use empire_types::{
    AggressionLevel, DevelopmentLevel, Difficulty, Government, Leader, MilitarismLevel, Player,
    PlayerId,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Complete scenario description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub map: MapSettings,
    #[serde(default)]
    pub game: GameSettings,
    /// Civilizations in player-id order, starting at 1
    #[serde(default = "default_civilizations")]
    pub civilizations: Vec<CivilizationConfig>,
    /// Engine tuning
    #[serde(default)]
    pub ai: AiConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            map: MapSettings::default(),
            game: GameSettings::default(),
            civilizations: default_civilizations(),
            ai: AiConfig::default(),
        }
    }
}

impl ScenarioConfig {
    /// Loads a scenario from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(ScenarioError::IoError)?;
        Self::from_str(&content)
    }

    /// Parses a scenario from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ScenarioError> {
        let config: ScenarioConfig = toml::from_str(content).map_err(ScenarioError::TomlError)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ScenarioError> {
        toml::to_string_pretty(self).map_err(ScenarioError::TomlSerializeError)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if self.map.width < MIN_MAP_SIDE || self.map.height < MIN_MAP_SIDE {
            return Err(ScenarioError::MapTooSmall {
                width: self.map.width,
                height: self.map.height,
            });
        }
        if self.civilizations.is_empty() {
            return Err(ScenarioError::NoCivilizations);
        }
        if self.civilizations.len() >= usize::from(u8::MAX) {
            return Err(ScenarioError::TooManyCivilizations(self.civilizations.len()));
        }
        Ok(())
    }

    /// Player records for every civilization, ids starting at 1.
    pub fn players(&self) -> Vec<Player> {
        self.civilizations
            .iter()
            .zip(1u8..)
            .map(|(civ, id)| civ.to_player(PlayerId(id)))
            .collect()
    }
}

/// Smallest accepted map side; start positions need room to spread out.
pub const MIN_MAP_SIDE: i32 = 8;

/// Map generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub width: i32,
    pub height: i32,
    /// Percent of land tiles holding a tribal hut
    pub hut_percent: u32,
    /// Percent of land tiles carrying a special resource
    pub special_percent: u32,
    /// Minimum tile-step distance between start positions
    pub start_spacing: u32,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            width: 32,
            height: 20,
            hut_percent: 3,
            special_percent: 8,
            start_spacing: 6,
        }
    }
}

/// Rules the turn driver applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub turns: u32,
    pub difficulty: Difficulty,
    /// Barbarian units placed at the start of the game
    pub barbarians: u32,
    /// Decisions a unit may take per turn while it has moves left
    pub decisions_per_unit: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            turns: 100,
            difficulty: Difficulty::Prince,
            barbarians: 2,
            decisions_per_unit: 3,
        }
    }
}

/// One civilization taking part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CivilizationConfig {
    pub leader: String,
    pub tribe: String,
    #[serde(default)]
    pub human: bool,
    #[serde(default)]
    pub government: Government,
    #[serde(default)]
    pub aggression: AggressionLevel,
    #[serde(default)]
    pub development: DevelopmentLevel,
    #[serde(default)]
    pub militarism: MilitarismLevel,
}

impl CivilizationConfig {
    pub fn new(leader: impl Into<String>, tribe: impl Into<String>) -> Self {
        Self {
            leader: leader.into(),
            tribe: tribe.into(),
            human: false,
            government: Government::default(),
            aggression: AggressionLevel::default(),
            development: DevelopmentLevel::default(),
            militarism: MilitarismLevel::default(),
        }
    }

    pub fn to_player(&self, id: PlayerId) -> Player {
        let leader = Leader::new(self.leader.clone())
            .with_aggression(self.aggression)
            .with_development(self.development)
            .with_militarism(self.militarism);
        let mut player =
            Player::new(id, leader, self.tribe.clone()).with_government(self.government);
        player.human = self.human;
        player
    }
}

fn default_civilizations() -> Vec<CivilizationConfig> {
    vec![
        CivilizationConfig {
            human: true,
            ..CivilizationConfig::new("Abraham Lincoln", "Americans")
        },
        CivilizationConfig::new("Hammurabi", "Babylonians"),
        CivilizationConfig {
            development: DevelopmentLevel::Expansionistic,
            aggression: AggressionLevel::Aggressive,
            ..CivilizationConfig::new("Genghis Khan", "Mongols")
        },
        CivilizationConfig {
            development: DevelopmentLevel::Civilized,
            militarism: MilitarismLevel::Civilized,
            ..CivilizationConfig::new("Mahatma Gandhi", "Indians")
        },
    ]
}

/// Errors that can occur while loading a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
    #[error("map {width}x{height} is smaller than {min}x{min}", min = MIN_MAP_SIDE)]
    MapTooSmall { width: i32, height: i32 },
    #[error("scenario has no civilizations")]
    NoCivilizations,
    #[error("scenario has {0} civilizations, too many for the player slots")]
    TooManyCivilizations(usize),
}
