//! Players and Leaders
//!
//! Player records, the leader personality that tunes AI behaviour, the
//! government kinds, and the game difficulty levels.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::advance::Advance;

/// Unique identifier for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Slot reserved for the barbarians.
    pub const BARBARIAN: PlayerId = PlayerId(0);

    pub fn is_barbarian(self) -> bool {
        self == Self::BARBARIAN
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player_{}", self.0)
    }
}

/// How readily a leader goes to war.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggressionLevel {
    Friendly,
    #[default]
    Normal,
    Aggressive,
}

/// How strongly a leader favours expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevelopmentLevel {
    Expansionistic,
    #[default]
    Normal,
    Civilized,
}

/// How strongly a leader favours military over economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilitarismLevel {
    Civilized,
    #[default]
    Normal,
    Militaristic,
}

/// Leader personality attached to a civilization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    pub name: String,
    #[serde(default)]
    pub aggression: AggressionLevel,
    #[serde(default)]
    pub development: DevelopmentLevel,
    #[serde(default)]
    pub militarism: MilitarismLevel,
}

impl Leader {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aggression: AggressionLevel::default(),
            development: DevelopmentLevel::default(),
            militarism: MilitarismLevel::default(),
        }
    }

    pub fn with_development(mut self, development: DevelopmentLevel) -> Self {
        self.development = development;
        self
    }

    pub fn with_aggression(mut self, aggression: AggressionLevel) -> Self {
        self.aggression = aggression;
        self
    }

    pub fn with_militarism(mut self, militarism: MilitarismLevel) -> Self {
        self.militarism = militarism;
        self
    }
}

/// Form of government.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Government {
    Anarchy,
    #[default]
    Despotism,
    Monarchy,
    Communism,
    Republic,
    Democracy,
}

impl Government {
    /// Representative governments favour diplomats over armies.
    pub fn is_representative(self) -> bool {
        matches!(self, Government::Republic | Government::Democracy)
    }
}

/// Game difficulty, easiest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Chieftain,
    Warlord,
    Prince,
    King,
    Emperor,
}

impl Difficulty {
    pub fn is_easiest(self) -> bool {
        self == Difficulty::Chieftain
    }
}

/// A player (human, AI, or the barbarians).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub leader: Leader,
    /// Plural tribe name, e.g. "Babylonians"
    pub tribe: String,
    #[serde(default)]
    pub human: bool,
    #[serde(default)]
    pub government: Government,
    #[serde(default)]
    pub advances: BTreeSet<Advance>,
    /// Advance being researched; `None` means a decision is needed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research: Option<Advance>,
    /// Bulbs accumulated towards the current research
    #[serde(default)]
    pub bulbs: u32,
}

impl Player {
    pub fn new(id: PlayerId, leader: Leader, tribe: impl Into<String>) -> Self {
        Self {
            id,
            leader,
            tribe: tribe.into(),
            human: false,
            government: Government::default(),
            advances: BTreeSet::new(),
            research: None,
            bulbs: 0,
        }
    }

    pub fn human(mut self) -> Self {
        self.human = true;
        self
    }

    pub fn with_government(mut self, government: Government) -> Self {
        self.government = government;
        self
    }

    pub fn with_advances(mut self, advances: impl IntoIterator<Item = Advance>) -> Self {
        self.advances.extend(advances);
        self
    }

    pub fn has_advance(&self, advance: Advance) -> bool {
        self.advances.contains(&advance)
    }

    /// AI control applies to every non-human player, barbarians included.
    pub fn is_ai(&self) -> bool {
        !self.human
    }
}
