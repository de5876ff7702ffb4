//! Order Intents
//!
//! Every world mutation the AI may request is expressed as an [`Order`].
//! Orders are collected in an [`OrderQueue`] and applied by the executor in
//! submission order, which gives the game a single application point for all
//! AI-driven changes.

use serde::{Deserialize, Serialize};

use crate::advance::Advance;
use crate::city::{CityId, Production};
use crate::geometry::{Delta, Point};
use crate::player::PlayerId;
use crate::unit::UnitId;

/// A single requested world mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "order", rename_all = "snake_case")]
pub enum Order {
    /// Found a city on the unit's tile
    FoundCity { unit: UnitId },
    BuildRoad { unit: UnitId },
    BuildIrrigation { unit: UnitId },
    BuildMine { unit: UnitId },
    /// Destroy the irrigation or mine on the unit's tile
    Pillage { unit: UnitId },
    /// Step (or attack) one tile in the given direction
    Move { unit: UnitId, delta: Delta },
    Disband { unit: UnitId },
    Fortify { unit: UnitId },
    /// End the unit's turn without acting
    SkipTurn { unit: UnitId },
    /// Zero the unit's remaining movement so it is not reconsidered this turn
    ClearMoves { unit: UnitId },
    /// Install (`Some`) or clear (`None`) the unit's long-range destination
    SetGoto {
        unit: UnitId,
        destination: Option<Point>,
    },
    SetProduction {
        city: CityId,
        production: Production,
    },
    SetResearch { player: PlayerId, advance: Advance },
}

impl Order {
    /// The unit this order targets, if it is a unit order.
    pub fn unit(&self) -> Option<UnitId> {
        match *self {
            Order::FoundCity { unit }
            | Order::BuildRoad { unit }
            | Order::BuildIrrigation { unit }
            | Order::BuildMine { unit }
            | Order::Pillage { unit }
            | Order::Move { unit, .. }
            | Order::Disband { unit }
            | Order::Fortify { unit }
            | Order::SkipTurn { unit }
            | Order::ClearMoves { unit }
            | Order::SetGoto { unit, .. } => Some(unit),
            Order::SetProduction { .. } | Order::SetResearch { .. } => None,
        }
    }

    /// True for orders that consume the unit's decision for the turn.
    ///
    /// Goto bookkeeping is not an action: a decision may adjust the goto and
    /// still emit one action.
    pub fn is_action(&self) -> bool {
        !matches!(
            self,
            Order::SetGoto { .. } | Order::SetProduction { .. } | Order::SetResearch { .. }
        )
    }

    /// Short snake_case label used in logs and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Order::FoundCity { .. } => "found_city",
            Order::BuildRoad { .. } => "build_road",
            Order::BuildIrrigation { .. } => "build_irrigation",
            Order::BuildMine { .. } => "build_mine",
            Order::Pillage { .. } => "pillage",
            Order::Move { .. } => "move",
            Order::Disband { .. } => "disband",
            Order::Fortify { .. } => "fortify",
            Order::SkipTurn { .. } => "skip_turn",
            Order::ClearMoves { .. } => "clear_moves",
            Order::SetGoto { .. } => "set_goto",
            Order::SetProduction { .. } => "set_production",
            Order::SetResearch { .. } => "set_research",
        }
    }
}

/// Ordered collection of intents awaiting execution.
#[derive(Debug, Default, Clone)]
pub struct OrderQueue {
    orders: Vec<Order>,
}

impl OrderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, order: Order) {
        self.orders.push(order);
    }

    /// Removes and returns every queued order in submission order.
    pub fn drain(&mut self) -> Vec<Order> {
        std::mem::take(&mut self.orders)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Number of queued actions targeting `unit`.
    pub fn actions_for(&self, unit: UnitId) -> usize {
        self.orders
            .iter()
            .filter(|o| o.is_action() && o.unit() == Some(unit))
            .count()
    }
}
