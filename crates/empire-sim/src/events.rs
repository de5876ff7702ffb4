//! Simulation Events
//!
//! Notable world changes recorded while orders are applied and turns end.

use bevy_ecs::prelude::*;
use empire_types::{Advance, Building, CityId, PlayerId, Point, UnitId, UnitType};
use serde::{Deserialize, Serialize};

/// One notable world change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    CityFounded {
        turn: u32,
        city: CityId,
        owner: PlayerId,
        at: Point,
    },
    CityCaptured {
        turn: u32,
        city: CityId,
        from: PlayerId,
        to: PlayerId,
    },
    CityGrew {
        turn: u32,
        city: CityId,
        size: u8,
    },
    UnitBuilt {
        turn: u32,
        city: CityId,
        unit: UnitId,
        unit_type: UnitType,
    },
    BuildingBuilt {
        turn: u32,
        city: CityId,
        building: Building,
    },
    UnitDestroyed {
        turn: u32,
        unit: UnitId,
        owner: PlayerId,
        by: Option<PlayerId>,
    },
    HutEntered {
        turn: u32,
        unit: UnitId,
        at: Point,
        reward: HutReward,
    },
    AdvanceLearned {
        turn: u32,
        player: PlayerId,
        advance: Advance,
    },
}

/// What a tribal hut yielded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum HutReward {
    Advance(Advance),
    Mercenaries(UnitId),
    Nothing,
}

impl SimEvent {
    /// Short snake_case label used when tallying events.
    pub fn kind(&self) -> &'static str {
        match self {
            SimEvent::CityFounded { .. } => "city_founded",
            SimEvent::CityCaptured { .. } => "city_captured",
            SimEvent::CityGrew { .. } => "city_grew",
            SimEvent::UnitBuilt { .. } => "unit_built",
            SimEvent::BuildingBuilt { .. } => "building_built",
            SimEvent::UnitDestroyed { .. } => "unit_destroyed",
            SimEvent::HutEntered { .. } => "hut_entered",
            SimEvent::AdvanceLearned { .. } => "advance_learned",
        }
    }
}

/// Resource storing events generated this turn
#[derive(Resource, Debug, Default)]
pub struct TurnEvents {
    pub events: Vec<SimEvent>,
}

impl TurnEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
