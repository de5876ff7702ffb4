//! Goto Navigator
//!
//! Advances a unit's long-range destination one step per decision and
//! abandons it probabilistically when progress stalls, the path is blocked,
//! or the next tile holds a defender the unit should not fight.
//!
//! In [`NavigatorMode::Roam`] a unit without a destination draws random
//! nearby visible tiles until one sticks; this is how barbarians move. Goto
//! stepping and destination drawing share one iteration budget, and running
//! out of it ends in a skipped turn.
//!
//! The destination is tracked locally during a decision. If it differs from
//! the unit's destination at the start, a single `SetGoto` order is submitted
//! ahead of the action.

use empire_types::{Delta, Order, Point, Unit, UnitRole};
use rand::Rng;
use tracing::debug;

use crate::context::TurnContext;

/// What to do when the unit has no destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorMode {
    /// Pick random destinations
    Roam,
    /// Stop; only an existing destination is followed
    Follow,
}

/// Outcome of one goto step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Destination abandoned; the loop continues
    Cancel,
    /// Final action for this decision
    Act(Order),
}

/// Random roaming with goto stepping.
pub fn roam(ctx: &mut TurnContext<'_>, unit: &Unit) {
    navigate(ctx, unit, NavigatorMode::Roam);
}

/// Advances an existing goto by one step, if the unit has one.
pub fn follow(ctx: &mut TurnContext<'_>, unit: &Unit) {
    navigate(ctx, unit, NavigatorMode::Follow);
}

pub fn navigate(ctx: &mut TurnContext<'_>, unit: &Unit, mode: NavigatorMode) {
    let iterations = ctx.config.limits.navigator_iterations;
    let start = unit.goto;
    let mut goto = start;
    let mut action = None;
    let mut exhausted = true;

    for _ in 0..iterations {
        let Some(destination) = goto else {
            if mode == NavigatorMode::Follow {
                exhausted = false;
                break;
            }
            goto = random_destination(ctx, unit);
            continue;
        };

        match step(ctx, unit, destination) {
            Step::Cancel => {
                debug!(unit = %unit.id, %destination, "goto cancelled");
                goto = None;
            }
            Step::Act(order) => {
                action = Some(order);
                exhausted = false;
                break;
            }
        }
    }

    if exhausted {
        debug!(unit = %unit.id, iterations, "navigator exhausted, skipping turn");
        action = Some(Order::SkipTurn { unit: unit.id });
    }

    if goto != start {
        ctx.submit(Order::SetGoto {
            unit: unit.id,
            destination: goto,
        });
    }
    if let Some(order) = action {
        debug!(unit = %unit.id, order = order.label(), "navigator decided");
        ctx.submit(order);
    }
}

/// One attempt at a random destination within the roam radius; `None` for
/// the zero offset or a tile the owner cannot see.
fn random_destination(ctx: &mut TurnContext<'_>, unit: &Unit) -> Option<Point> {
    let radius = ctx.config.navigator.roam_radius.max(1);
    let dx = ctx.rng.gen_range(-radius..=radius);
    let dy = ctx.rng.gen_range(-radius..=radius);
    let offset = Delta::new(dx, dy);
    if offset.is_zero() {
        return None;
    }
    let destination = unit.position.offset(offset);
    if !ctx.world.is_visible(unit.owner, destination) {
        return None;
    }
    Some(destination)
}

fn step(ctx: &mut TurnContext<'_>, unit: &Unit, destination: Point) -> Step {
    let world = ctx.world;
    let config = ctx.config;

    let distance = unit.position.distance(destination);
    let mut targets = world.move_targets(unit.id);
    targets.sort_by_key(|p| (p.distance(destination), world.movement_cost(*p)));

    let Some(&best) = targets.first() else {
        return Step::Cancel;
    };
    let best_distance = best.distance(destination);
    if best_distance > distance {
        return Step::Cancel;
    }
    if best_distance == distance && ctx.chance(config.navigator.stall_cancel_percent) {
        return Step::Cancel;
    }

    let strongest_defender = world
        .units_at(best)
        .iter()
        .filter(|u| u.owner != unit.owner)
        .map(|u| u.defense())
        .max();
    if let Some(defense) = strongest_defender {
        if matches!(unit.role(), UnitRole::Civilian | UnitRole::Settler) {
            return Step::Cancel;
        }
        if unit.role() == UnitRole::Transport
            && ctx.chance(config.navigator.transport_cancel_percent)
        {
            return Step::Cancel;
        }
        if unit.attack() < defense && ctx.chance(config.navigator.outmatched_cancel_percent) {
            return Step::Cancel;
        }
    }

    let delta = Delta::new(best.x - unit.position.x, best.y - unit.position.y);
    if !world.can_move(unit.id, delta) {
        // Escalate: drop the destination, then idle, then give up on the unit.
        if ctx.chance(config.navigator.blocked_cancel_percent) {
            return Step::Cancel;
        }
        if ctx.chance(config.navigator.blocked_skip_percent) {
            return Step::Act(Order::SkipTurn { unit: unit.id });
        }
        return Step::Act(Order::Disband { unit: unit.id });
    }

    Step::Act(Order::Move {
        unit: unit.id,
        delta,
    })
}
