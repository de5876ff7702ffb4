//! Configuration loading for the AI engine.
//!
//! Every tuning constant the policies use is loaded from a TOML file. The
//! defaults reproduce the stock ruleset exactly; a partial file only
//! overrides the keys it names.

use empire_types::DevelopmentLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Complete AI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    /// Iteration caps for the bounded retry loops
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Preemptive settling near the human player
    #[serde(default)]
    pub settlement: SettlementConfig,
    /// Terrain improvement gating
    #[serde(default)]
    pub improvement: ImprovementConfig,
    /// Fortify, pillage and neighbour scoring
    #[serde(default)]
    pub combat: CombatConfig,
    /// Goto navigation and abandonment odds
    #[serde(default)]
    pub navigator: NavigatorConfig,
    /// City production priorities
    #[serde(default)]
    pub production: ProductionConfig,
}

impl AiConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, TomlSerializeError> {
        toml::to_string_pretty(self).map_err(TomlSerializeError)
    }
}

/// Iteration caps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Attempts at a random adjacent step before a settler skips its turn
    pub wander_tries: u32,
    /// Iterations shared by goto stepping and random destination selection
    pub navigator_iterations: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            wander_tries: 1000,
            navigator_iterations: 1000,
        }
    }
}

/// Preemptive settle thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    /// Minimum land value of the settler's tile
    pub min_land_value: u8,
    /// The tile qualifies when `distance_budget - distance <= land_value`
    pub distance_budget: i32,
    /// Cities at or within this distance never trigger a preemptive settle
    pub min_city_distance: u32,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            min_land_value: 9,
            distance_budget: 14,
            min_city_distance: 1,
        }
    }
}

/// Improvement gating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImprovementConfig {
    /// Maximum distance from the owner's nearest city
    pub max_city_distance: u32,
    /// City size at which hills next to the city are worth improving
    pub hills_min_city_size: u8,
}

impl Default for ImprovementConfig {
    fn default() -> Self {
        Self {
            max_city_distance: 2,
            hills_min_city_size: 3,
        }
    }
}

/// Military unit tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// A defender fortifies when its city tile holds at most this many units
    pub garrison_limit: usize,
    /// Units whose movement allowance is below this may pillage
    pub pillage_max_moves: u32,
    /// Pillage only when the nearest city is closer than this
    pub pillage_city_distance: u32,
    /// Exclusive upper bound of the per-neighbour random jitter
    pub jitter: i32,
    /// Bonus for an empty neighbour holding a hut
    pub hut_bonus: i32,
    /// Weight of the terrain defense bonus of an unoccupied neighbour
    pub defense_bonus_weight: i32,
    /// Per-tile reward or penalty of the second-ring lookahead
    pub lookahead_weight: i32,
    /// Half-width of the square searched for enemy units
    pub enemy_radius: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            garrison_limit: 2,
            pillage_max_moves: 2,
            pillage_city_distance: 4,
            jitter: 5,
            hut_bonus: 20,
            defense_bonus_weight: 4,
            lookahead_weight: 2,
            enemy_radius: 1,
        }
    }
}

/// Goto navigator tuning. Percentages are out of 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Random destinations are drawn from `[-roam_radius, roam_radius]` per axis
    pub roam_radius: i32,
    /// Cancel chance when the best step makes no progress
    pub stall_cancel_percent: u32,
    /// Cancel chance for a transport about to attack
    pub transport_cancel_percent: u32,
    /// Cancel chance when attacking a stronger defender
    pub outmatched_cancel_percent: u32,
    /// Cancel chance after a rejected move
    pub blocked_cancel_percent: u32,
    /// Skip-turn chance after a rejected move that kept its goto
    pub blocked_skip_percent: u32,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            roam_radius: 5,
            stall_cancel_percent: 50,
            transport_cancel_percent: 67,
            outmatched_cancel_percent: 50,
            blocked_cancel_percent: 67,
            blocked_skip_percent: 67,
        }
    }
}

/// City production tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionConfig {
    /// Defensive units of the best type kept on each city tile
    pub defense_quota: usize,
    /// Cities supporting fewer units than this build an offensive filler
    pub filler_unit_limit: usize,
    /// Settler rules per leader development level
    pub expansion: ExpansionTable,
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self {
            defense_quota: 2,
            filler_unit_limit: 4,
            expansion: ExpansionTable::default(),
        }
    }
}

/// Settler production thresholds keyed by leader development level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionTable {
    pub expansionistic: ExpansionRule,
    pub normal: ExpansionRule,
    pub civilized: ExpansionRule,
}

impl ExpansionTable {
    pub fn rule(&self, development: DevelopmentLevel) -> &ExpansionRule {
        match development {
            DevelopmentLevel::Expansionistic => &self.expansionistic,
            DevelopmentLevel::Normal => &self.normal,
            DevelopmentLevel::Civilized => &self.civilized,
        }
    }
}

impl Default for ExpansionTable {
    fn default() -> Self {
        Self {
            expansionistic: ExpansionRule {
                min_city_size: 2,
                max_cities: 13,
            },
            normal: ExpansionRule {
                min_city_size: 3,
                max_cities: 10,
            },
            civilized: ExpansionRule {
                min_city_size: 4,
                max_cities: 7,
            },
        }
    }
}

/// When a city may train settlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionRule {
    pub min_city_size: u8,
    /// Settlers are built only while the player owns fewer cities
    pub max_cities: usize,
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Error that can occur during TOML serialization.
#[derive(Debug, Error)]
#[error("TOML serialize error: {0}")]
pub struct TomlSerializeError(#[source] pub toml::ser::Error);

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# AI Configuration

[limits]
wander_tries = 1000
navigator_iterations = 1000

[settlement]
min_land_value = 9
distance_budget = 14
min_city_distance = 1

[improvement]
max_city_distance = 2
hills_min_city_size = 3

[combat]
garrison_limit = 2
pillage_max_moves = 2
pillage_city_distance = 4
jitter = 5
hut_bonus = 20
defense_bonus_weight = 4
lookahead_weight = 2
enemy_radius = 1

[navigator]
roam_radius = 5
stall_cancel_percent = 50
transport_cancel_percent = 67
outmatched_cancel_percent = 50
blocked_cancel_percent = 67
blocked_skip_percent = 67

[production]
defense_quota = 2
filler_unit_limit = 4

[production.expansion.expansionistic]
min_city_size = 2
max_cities = 13

[production.expansion.normal]
min_city_size = 3
max_cities = 10

[production.expansion.civilized]
min_city_size = 4
max_cities = 7
"#
    .to_string()
}
