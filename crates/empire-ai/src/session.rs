//! AI Sessions
//!
//! One [`AiSession`] per computer-controlled player, created on first use
//! through the [`AiRegistry`] owned by the turn driver. A session carries
//! nothing but the player's identity; every decision borrows the world and
//! the random source through a [`TurnContext`].

use std::collections::BTreeMap;

use empire_types::{CityId, PlayerId, UnitId};

use crate::context::TurnContext;
use crate::evaluator::is_human;
use crate::{dispatcher, navigator, production, research};

/// Decision entry points for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiSession {
    player: PlayerId,
}

impl AiSession {
    pub fn new(player: PlayerId) -> Self {
        Self { player }
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Decides one unit's action for this turn.
    pub fn decide_unit(&self, ctx: &mut TurnContext<'_>, unit: UnitId) {
        dispatcher::decide_unit(ctx, self.player, unit);
    }

    /// Steps a unit along its standing goto, if it has one.
    pub fn advance_goto(&self, ctx: &mut TurnContext<'_>, unit: UnitId) {
        let world = ctx.world;
        let Some(unit) = world.unit(unit) else {
            return;
        };
        if unit.owner != self.player || !unit.has_goto() || is_human(world, unit.owner) {
            return;
        }
        navigator::follow(ctx, unit);
    }

    pub fn decide_city_production(&self, ctx: &mut TurnContext<'_>, city: CityId) {
        production::decide_city_production(ctx, self.player, city);
    }

    pub fn decide_research(&self, ctx: &mut TurnContext<'_>) {
        research::decide_research(ctx, self.player);
    }
}

/// Sessions keyed by player; entries are never removed.
#[derive(Debug, Default)]
pub struct AiRegistry {
    sessions: BTreeMap<PlayerId, AiSession>,
}

impl AiRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for `player`, creating it on first reference.
    pub fn get_or_create(&mut self, player: PlayerId) -> AiSession {
        *self
            .sessions
            .entry(player)
            .or_insert_with(|| AiSession::new(player))
    }

    pub fn get(&self, player: PlayerId) -> Option<&AiSession> {
        self.sessions.get(&player)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
