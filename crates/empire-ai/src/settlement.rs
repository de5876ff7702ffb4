//! Settlement Policy
//!
//! Decides whether a settler founds a city this turn, hands over to the
//! improvement policy otherwise, and wanders as a last resort.

use empire_types::{Delta, Order, Unit};
use rand::Rng;
use tracing::debug;

use crate::context::TurnContext;
use crate::evaluator::{enemy_nearby, is_human, nearest_city};
use crate::improvement;

/// Runs the full settler decision for `unit`.
///
/// First match wins: turn-0 settle, preemptive settle near the human,
/// terrain improvement, random wander. Exactly one action is submitted.
pub fn settler_move(ctx: &mut TurnContext<'_>, unit: &Unit) {
    if should_found_city(ctx, unit) {
        debug!(unit = %unit.id, at = %unit.position, "founding city");
        ctx.submit(Order::FoundCity { unit: unit.id });
        return;
    }

    if improvement::try_improve(ctx, unit) {
        return;
    }

    wander(ctx, unit);
}

/// True if the settler should found a city where it stands.
pub fn should_found_city(ctx: &TurnContext<'_>, unit: &Unit) -> bool {
    let world = ctx.world;
    let config = &ctx.config.settlement;
    let Some(tile) = world.tile(unit.position) else {
        return false;
    };

    // The opening settler always settles immediately.
    if tile.land_value != 0 && world.turn() == 0 {
        return true;
    }

    if world.difficulty().is_easiest() || tile.has_city() {
        return false;
    }
    let Some(nearest) = nearest_city(world, unit.position) else {
        return false;
    };

    is_human(world, nearest.city.owner)
        && !enemy_nearby(world, unit, ctx.config.combat.enemy_radius)
        && nearest.distance > config.min_city_distance
        && nearest.city.owner != unit.owner
        && tile.land_value >= config.min_land_value
        && config.distance_budget - nearest.distance as i32 <= i32::from(tile.land_value)
}

/// Steps onto a random adjacent land tile free of foreign units, retrying
/// up to the configured number of attempts before skipping the turn.
pub fn wander(ctx: &mut TurnContext<'_>, unit: &Unit) {
    let world = ctx.world;
    let tries = ctx.config.limits.wander_tries;

    for _ in 0..tries {
        let delta = Delta::new(ctx.rng.gen_range(-1..=1), ctx.rng.gen_range(-1..=1));
        if delta.is_zero() {
            continue;
        }
        let target = unit.position.offset(delta);
        let Some(tile) = world.tile(target) else {
            continue;
        };
        if tile.is_ocean() {
            continue;
        }
        if world.units_at(target).iter().any(|u| u.owner != unit.owner) {
            continue;
        }
        if !world.can_move(unit.id, delta) {
            continue;
        }
        debug!(unit = %unit.id, %delta, "wandering");
        ctx.submit(Order::Move {
            unit: unit.id,
            delta,
        });
        return;
    }

    debug!(unit = %unit.id, tries, "no wander step found, skipping turn");
    ctx.submit(Order::SkipTurn { unit: unit.id });
}
