//! Combat & Defense Policy
//!
//! Fortify and pillage checks for military units, and the general
//! attack-movement policy that scores the eight neighbours of a unit and
//! steps onto the best one.
//!
//! # Neighbour scoring
//!
//! For each land neighbour, in canonical order:
//!
//! | Condition | Effect |
//! |-----------|--------|
//! | always | `+ rand[0, jitter)` |
//! | friendly units present | `+ 2 * stack_attack / (stack_defense + 1) - own defense` |
//! | otherwise | `+ defense_weight * terrain defense bonus` |
//! | no units, hut | `+ hut_bonus` |
//! | no enemy unit or city nearby | `+ lookahead delta` |
//! | no units, foreign city | score becomes `i32::MAX` |
//!
//! Only a strictly greater score replaces the best, so ties keep the first
//! neighbour found.

use empire_types::{Order, Point, Unit};
use rand::Rng;
use tracing::debug;

use crate::context::TurnContext;
use crate::evaluator::{enemy_nearby, enemy_unit_or_city_nearby, is_human, nearest_city};
use crate::hooks::{self, StackAttribute, STACK_ATTRIBUTE_FALLBACK};

/// Fortify and pillage checks for a Defense-role unit.
///
/// Returns true if an order was submitted; false means the unit should fall
/// through to [`attack_move`].
pub fn defense_move(ctx: &mut TurnContext<'_>, unit: &Unit) -> bool {
    let world = ctx.world;

    let on_city = world.tile(unit.position).is_some_and(|t| t.has_city());
    if on_city {
        let garrison = world.units_at(unit.position).len();
        let best = hooks::is_best_defender(world, unit).resolve(false);
        if garrison <= ctx.config.combat.garrison_limit || best {
            debug!(unit = %unit.id, garrison, "fortifying");
            ctx.submit(Order::Fortify { unit: unit.id });
            return true;
        }
    }

    pillage_check(ctx, unit)
}

/// Pillages the unit's tile when a slow unit stands on improved land close
/// to a human city. Returns true if an order was submitted.
pub fn pillage_check(ctx: &mut TurnContext<'_>, unit: &Unit) -> bool {
    let world = ctx.world;
    let config = ctx.config;

    let Some(tile) = world.tile(unit.position) else {
        return false;
    };
    let Some(nearest) = nearest_city(world, unit.position) else {
        return false;
    };

    if unit.movement_allowance() < config.combat.pillage_max_moves
        && nearest.distance < config.combat.pillage_city_distance
        && is_human(world, nearest.city.owner)
        && (tile.irrigation || tile.mine)
    {
        debug!(unit = %unit.id, at = %unit.position, "pillaging");
        ctx.submit(Order::Pillage { unit: unit.id });
        return true;
    }

    false
}

/// General attack-movement for LandAttack units and Defense units that
/// neither fortified nor pillaged.
pub fn attack_move(ctx: &mut TurnContext<'_>, unit: &Unit) {
    let world = ctx.world;
    let radius = ctx.config.combat.enemy_radius;

    if pillage_check(ctx, unit) {
        return;
    }

    // A standing goto continues unless an enemy shows up.
    if unit.has_goto() && !enemy_nearby(world, unit, radius) {
        debug!(unit = %unit.id, "continuing goto");
        return;
    }

    let threat = enemy_unit_or_city_nearby(world, unit, radius);
    let Some(best) = best_neighbor(ctx, unit, threat) else {
        debug!(unit = %unit.id, "no land neighbour, skipping turn");
        ctx.submit(Order::SkipTurn { unit: unit.id });
        return;
    };

    let delta = unit.position.step_towards(best);
    if world.can_move(unit.id, delta) {
        debug!(unit = %unit.id, %delta, target = %best, "attack-moving");
        ctx.submit(Order::Move {
            unit: unit.id,
            delta,
        });
    } else {
        // Keeps the unit from being reconsidered this turn.
        debug!(unit = %unit.id, %delta, "move rejected, clearing moves");
        ctx.submit(Order::ClearMoves { unit: unit.id });
    }
}

/// Picks the highest-scoring land neighbour of `unit`.
fn best_neighbor(ctx: &mut TurnContext<'_>, unit: &Unit, threat: bool) -> Option<Point> {
    let mut best: Option<(Point, i32)> = None;
    for at in unit.position.neighbors() {
        let Some(score) = score_neighbor(ctx, unit, at, threat) else {
            continue;
        };
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((at, score));
        }
    }
    best.map(|(at, _)| at)
}

/// Scores moving `unit` onto `at`; `None` for ocean or off-map tiles.
pub fn score_neighbor(
    ctx: &mut TurnContext<'_>,
    unit: &Unit,
    at: Point,
    threat: bool,
) -> Option<i32> {
    let world = ctx.world;
    let config = &ctx.config.combat;

    let tile = world.tile(at)?;
    if tile.is_ocean() {
        return None;
    }

    let occupants = world.units_at(at);
    let friendly = occupants.iter().any(|u| u.owner == unit.owner);

    let mut score = if config.jitter > 0 {
        ctx.rng.gen_range(0..config.jitter)
    } else {
        0
    };

    if friendly {
        let stack = occupants[0];
        let attack = hooks::stack_attribute(world, stack, StackAttribute::Attack)
            .resolve(STACK_ATTRIBUTE_FALLBACK);
        let defense = hooks::stack_attribute(world, stack, StackAttribute::Defense)
            .resolve(STACK_ATTRIBUTE_FALLBACK);
        score += attack * 2 / (defense + 1);
        score -= unit.defense();
    } else {
        score += tile.defense_bonus() * config.defense_bonus_weight;
    }

    let mut undefended_city = false;
    if occupants.is_empty() {
        if let Some(city) = tile.city.and_then(|id| world.city(id)) {
            undefended_city = city.owner != unit.owner;
        }
        if tile.hut {
            score += config.hut_bonus;
        }
    }

    if !threat {
        score += lookahead(ctx, unit, at);
    }

    // An undefended enemy city beats everything else.
    if undefended_city {
        score = i32::MAX;
    }

    Some(score)
}

/// Second-ring delta around `at`: visible land is good, occupied tiles bad.
pub fn lookahead(ctx: &TurnContext<'_>, unit: &Unit, at: Point) -> i32 {
    let world = ctx.world;
    let weight = ctx.config.combat.lookahead_weight;

    let mut delta = 0;
    for p in at.neighbors() {
        let Some(tile) = world.tile(p) else {
            continue;
        };
        if world.is_visible(unit.owner, p) && !tile.is_ocean() {
            delta += weight;
        }
        if !world.units_at(p).is_empty() {
            delta -= weight;
        }
    }
    delta
}
