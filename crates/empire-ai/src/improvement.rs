//! Improvement Policy
//!
//! Terrain work for settlers standing close to one of their own cities.

use empire_types::{Advance, Order, Terrain, Unit};
use tracing::debug;

use crate::context::TurnContext;
use crate::evaluator::{nearest_city, terrain_improvement_bonus, ImprovementBonus};
use crate::hooks::{self, Capability};

/// Tries to improve the tile under `unit`.
///
/// Applies only when the nearest city on the map belongs to the unit's
/// owner, lies within `(0, max_city_distance]`, and either that city is big
/// enough, the tile is not Hills, or the tile carries a special resource.
/// Returns true if an order was submitted.
pub fn try_improve(ctx: &mut TurnContext<'_>, unit: &Unit) -> bool {
    let world = ctx.world;
    let config = ctx.config;

    let Some(tile) = world.tile(unit.position) else {
        return false;
    };
    let Some(nearest) = nearest_city(world, unit.position) else {
        return false;
    };

    let gate = nearest.distance > 0
        && nearest.distance <= config.improvement.max_city_distance
        && nearest.city.owner == unit.owner
        && (nearest.city.size >= config.improvement.hills_min_city_size
            || tile.terrain != Terrain::Hills
            || tile.special);
    if !gate {
        return false;
    }

    let order = match terrain_improvement_bonus(world, tile) {
        ImprovementBonus::Irrigate => Some(Order::BuildIrrigation { unit: unit.id }),
        ImprovementBonus::Mine => Some(Order::BuildMine { unit: unit.id }),
        ImprovementBonus::None | ImprovementBonus::AlreadyImproved => None,
    };
    if let Some(order) = order {
        debug!(unit = %unit.id, at = %unit.position, order = order.label(), "improving tile");
        ctx.submit(order);
        return true;
    }

    let farmland = matches!(
        tile.terrain,
        Terrain::Desert | Terrain::Plains | Terrain::Grassland1 | Terrain::Grassland2
    );
    if (tile.irrigation || tile.mine) && !tile.road && farmland {
        debug!(unit = %unit.id, at = %unit.position, "building road");
        ctx.submit(Order::BuildRoad { unit: unit.id });
        return true;
    }

    let knows_railroad = world
        .player(unit.owner)
        .is_some_and(|p| p.has_advance(Advance::Railroad));
    if knows_railroad && !tile.railroad {
        if let Capability::Known(order) = hooks::railroad_decision(world, unit, tile) {
            ctx.submit(order);
            return true;
        }
    }

    false
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

    fn run(world: &MockWorld, unit: &Unit) -> (bool, Vec<Order>) {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut orders = OrderQueue::new();
        let config = AiConfig::default();
        let handled = {
            let mut ctx = TurnContext::new(world, &mut rng, &mut orders, &config);
            try_improve(&mut ctx, unit)
        };
        (handled, orders.drain())
    }

    fn world_with_city() -> MockWorld {
        let mut world = MockWorld::new(7, 7);
        world.add_player(fixtures::ai_player(AI.0));
        world.add_city(fixtures::city(1, AI, Point::new(3, 3)));
        world
    }

    #[test]
    fn test_irrigates_next_to_water() {
        let mut world = world_with_city();
        world.set_terrain(Point::new(5, 2), Terrain::River);
        let unit = fixtures::unit(1, AI, UnitType::Settlers, Point::new(5, 3));
        world.add_unit(unit.clone());

        let (handled, orders) = run(&world, &unit);
        assert!(handled);
        assert_eq!(orders, vec![Order::BuildIrrigation { unit: unit.id }]);
    }

    #[test]
    fn test_hills_need_grown_city_or_special() {
        let mut world = world_with_city();
        world.set_terrain(Point::new(4, 4), Terrain::Hills);
        let unit = fixtures::unit(1, AI, UnitType::Settlers, Point::new(4, 4));
        world.add_unit(unit.clone());

        let (handled, orders) = run(&world, &unit);
        assert!(!handled);
        assert!(orders.is_empty());

        world.city_mut(empire_types::CityId(1)).size = 3;
        let (handled, orders) = run(&world, &unit);
        assert!(handled);
        assert_eq!(orders, vec![Order::BuildMine { unit: unit.id }]);

        world.city_mut(empire_types::CityId(1)).size = 1;
        world.tile_mut(Point::new(4, 4)).special = true;
        let (handled, _) = run(&world, &unit);
        assert!(handled);
    }

    #[test]
    fn test_road_after_irrigation() {
        let mut world = world_with_city();
        world.tile_mut(Point::new(3, 4)).irrigation = true;
        let unit = fixtures::unit(1, AI, UnitType::Settlers, Point::new(3, 4));
        world.add_unit(unit.clone());

        let (_, orders) = run(&world, &unit);
        assert_eq!(orders, vec![Order::BuildRoad { unit: unit.id }]);

        world.tile_mut(Point::new(3, 4)).road = true;
        let (handled, orders) = run(&world, &unit);
        assert!(!handled);
        assert!(orders.is_empty());
    }

    #[test]
    fn test_railroad_is_a_no_op() {
        let mut world = world_with_city();
        world.player_mut(AI).advances.insert(Advance::Railroad);
        world.tile_mut(Point::new(3, 4)).irrigation = true;
        world.tile_mut(Point::new(3, 4)).road = true;
        let unit = fixtures::unit(1, AI, UnitType::Settlers, Point::new(3, 4));

        let (handled, orders) = run(&world, &unit);
        assert!(!handled);
        assert!(orders.is_empty());
    }

    #[test]
    fn test_distance_gate() {
        let world = world_with_city();
        // On the city tile.
        let on_city = fixtures::unit(1, AI, UnitType::Settlers, Point::new(3, 3));
        assert!(!run(&world, &on_city).0);
        // Too far away.
        let far = fixtures::unit(2, AI, UnitType::Settlers, Point::new(6, 6));
        assert!(!run(&world, &far).0);
    }

    #[test]
    fn test_foreign_nearest_city_declines() {
        let mut world = MockWorld::new(7, 7);
        world.add_city(fixtures::city(1, HUMAN, Point::new(3, 3)));
        world.add_city(fixtures::city(2, AI, Point::new(6, 3)));
        // Nearest city is the human one at distance 1.
        let unit = fixtures::unit(1, AI, UnitType::Settlers, Point::new(4, 3));

        let (handled, orders) = run(&world, &unit);
        assert!(!handled);
        assert!(orders.is_empty());
    }
}
