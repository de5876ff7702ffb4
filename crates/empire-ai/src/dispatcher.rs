//! Unit Dispatcher
//!
//! Routes each unit to the policy that governs its role. Every call submits
//! at most one action for the unit.

use empire_types::{Order, PlayerId, UnitId, UnitRole};
use tracing::debug;

use crate::combat;
use crate::context::TurnContext;
use crate::evaluator::is_human;
use crate::navigator;
use crate::settlement;

/// Decides what `unit` does this turn on behalf of `player`.
///
/// A no-op for units owned by anyone else, and for human-owned units.
pub fn decide_unit(ctx: &mut TurnContext<'_>, player: PlayerId, unit: UnitId) {
    let world = ctx.world;
    let Some(unit) = world.unit(unit) else {
        debug!(%unit, "unknown unit, nothing to decide");
        return;
    };
    if unit.owner != player {
        return;
    }

    if unit.owner.is_barbarian() {
        navigator::roam(ctx, unit);
        return;
    }
    if is_human(world, unit.owner) {
        return;
    }

    match unit.role() {
        UnitRole::Settler => settlement::settler_move(ctx, unit),
        UnitRole::Defense => {
            if !combat::defense_move(ctx, unit) {
                combat::attack_move(ctx, unit);
            }
        }
        UnitRole::LandAttack => combat::attack_move(ctx, unit),
        UnitRole::SeaAttack | UnitRole::AirAttack | UnitRole::Transport | UnitRole::Civilian => {
            // No policy exists for these roles yet; they are retired.
            debug!(unit = %unit.id, role = ?unit.role(), "disbanding unit without a policy");
            ctx.submit(Order::Disband { unit: unit.id });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AiConfig;
    use crate::testing::MockWorld;
    use empire_types::fixtures::{self, AI, HUMAN};
    use empire_types::{OrderQueue, Point, UnitType};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn decide(world: &MockWorld, player: PlayerId, unit: UnitId, seed: u64) -> Vec<Order> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut orders = OrderQueue::new();
        let config = AiConfig::default();
        {
            let mut ctx = TurnContext::new(world, &mut rng, &mut orders, &config);
            decide_unit(&mut ctx, player, unit);
        }
        orders.drain()
    }

    fn world() -> MockWorld {
        let mut world = MockWorld::new(9, 9);
        world.add_player(fixtures::human_player(HUMAN.0));
        world.add_player(fixtures::ai_player(AI.0));
        world
    }

    #[test]
    fn test_other_players_units_are_ignored() {
        let mut world = world();
        world.add_unit(fixtures::unit(1, AI, UnitType::Legion, Point::new(4, 4)));

        assert!(decide(&world, PlayerId(3), UnitId(1), 0).is_empty());
    }

    #[test]
    fn test_human_units_are_ignored() {
        let mut world = world();
        world.add_unit(fixtures::unit(1, HUMAN, UnitType::Legion, Point::new(4, 4)));

        assert!(decide(&world, HUMAN, UnitId(1), 0).is_empty());
    }

    #[test]
    fn test_unknown_unit_is_a_no_op() {
        let world = world();
        assert!(decide(&world, AI, UnitId(42), 0).is_empty());
    }

    #[test]
    fn test_roles_without_policy_disband() {
        let mut world = world();
        for (id, unit_type) in [
            (1, UnitType::Trireme),
            (2, UnitType::Ironclad),
            (3, UnitType::Fighter),
            (4, UnitType::Caravan),
            (5, UnitType::Diplomat),
        ] {
            world.add_unit(fixtures::unit(id, AI, unit_type, Point::new(4, 4)));
            assert_eq!(
                decide(&world, AI, UnitId(id), 0),
                vec![Order::Disband { unit: UnitId(id) }],
                "{}",
                unit_type
            );
        }
    }

    #[test]
    fn test_defender_in_city_fortifies() {
        let mut world = world();
        world.add_city(fixtures::city(1, AI, Point::new(4, 4)));
        world.add_unit(fixtures::unit(1, AI, UnitType::Militia, Point::new(4, 4)));

        assert_eq!(
            decide(&world, AI, UnitId(1), 0),
            vec![Order::Fortify { unit: UnitId(1) }]
        );
    }

    #[test]
    fn test_defender_outside_city_attack_moves() {
        let mut world = world();
        world.add_unit(fixtures::unit(1, AI, UnitType::Phalanx, Point::new(4, 4)));

        let orders = decide(&world, AI, UnitId(1), 0);
        assert_eq!(orders.len(), 1);
        assert!(matches!(orders[0], Order::Move { .. }));
    }

    #[test]
    fn test_barbarians_roam() {
        let mut world = world();
        world.add_unit(fixtures::unit(1, PlayerId::BARBARIAN, UnitType::Legion, Point::new(4, 4)));

        let orders = decide(&world, PlayerId::BARBARIAN, UnitId(1), 4);
        assert!(matches!(orders[0], Order::SetGoto { destination: Some(_), .. }));
        assert_eq!(orders.iter().filter(|o| o.is_action()).count(), 1);
    }

    #[test]
    fn test_at_most_one_action_per_decision() {
        let mut world = world();
        world.add_city(fixtures::city(1, HUMAN, Point::new(1, 1)));
        world.add_city(fixtures::city(2, AI, Point::new(6, 6)));
        world.tile_mut(Point::new(3, 3)).land_value = 10;
        world.tile_mut(Point::new(2, 2)).irrigation = true;
        let types = [
            UnitType::Settlers,
            UnitType::Militia,
            UnitType::Legion,
            UnitType::Chariot,
            UnitType::Trireme,
        ];
        let mut id = 0;
        for unit_type in types {
            for at in [Point::new(3, 3), Point::new(2, 2), Point::new(6, 6), Point::new(7, 5)] {
                id += 1;
                world.add_unit(fixtures::unit(id, AI, unit_type, at));
            }
        }

        for unit in 1..=id {
            for seed in 0..5 {
                let orders = decide(&world, AI, UnitId(unit), seed);
                let actions = orders.iter().filter(|o| o.is_action()).count();
                assert!(actions <= 1, "unit {} emitted {:?}", unit, orders);
                assert!(orders.iter().all(|o| o.unit() == Some(UnitId(unit))));
            }
        }
    }
}
