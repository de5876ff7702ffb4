//! Tile Evaluator
//!
//! Read-only tile and neighbourhood judgements shared by the unit policies:
//! which improvement a tile wants, which city is closest, and whether
//! enemies are close by.

use empire_types::{City, PlayerId, Point, Terrain, Tile, Unit};

use crate::world::WorldQuery;

/// Best terrain improvement for a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImprovementBonus {
    /// Nothing worth building
    None,
    Irrigate,
    Mine,
    /// The tile holds a city or an irrigation/mine already
    AlreadyImproved,
}

/// Judges which improvement `tile` should receive.
///
/// Priority is fixed: an existing city or improvement first, then Hills
/// (always a mine, even where irrigation would be legal), then irrigable
/// farmland.
pub fn terrain_improvement_bonus(world: &dyn WorldQuery, tile: &Tile) -> ImprovementBonus {
    if tile.has_city() || tile.irrigation || tile.mine {
        return ImprovementBonus::AlreadyImproved;
    }

    if tile.terrain == Terrain::Hills {
        return ImprovementBonus::Mine;
    }

    if tile.terrain.benefits_from_irrigation() && world.allows_irrigation(tile.position) {
        return ImprovementBonus::Irrigate;
    }

    ImprovementBonus::None
}

/// Closest city to a point and its tile-step distance.
#[derive(Debug, Clone, Copy)]
pub struct NearestCity<'w> {
    pub city: &'w City,
    pub distance: u32,
}

/// Finds the city closest to `at` among every city on the map.
///
/// Cities are scanned in ascending id order and only a strictly smaller
/// distance replaces the current best, so ties keep the lowest id.
pub fn nearest_city(world: &dyn WorldQuery, at: Point) -> Option<NearestCity<'_>> {
    let mut best: Option<NearestCity<'_>> = None;
    for city in world.cities() {
        let distance = city.position.distance(at);
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(NearestCity { city, distance });
        }
    }
    best
}

/// True if a unit of another owner stands inside the square of half-width
/// `radius` around `unit`.
///
/// This is a bounding-box test, deliberately not a true distance test.
pub fn enemy_nearby(world: &dyn WorldQuery, unit: &Unit, radius: u32) -> bool {
    world
        .units()
        .iter()
        .any(|u| u.owner != unit.owner && unit.position.within_box(u.position, radius))
}

/// True if an enemy unit is nearby or the nearest city is foreign and
/// directly adjacent.
pub fn enemy_unit_or_city_nearby(world: &dyn WorldQuery, unit: &Unit, radius: u32) -> bool {
    if enemy_nearby(world, unit, radius) {
        return true;
    }
    nearest_city(world, unit.position)
        .is_some_and(|n| n.city.owner != unit.owner && n.distance == 1)
}

/// True if `player` is registered and human-controlled.
pub fn is_human(world: &dyn WorldQuery, player: PlayerId) -> bool {
    world.player(player).is_some_and(|p| p.human)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockWorld;
    use empire_types::fixtures::{self, AI, HUMAN};
    use empire_types::UnitType;

    #[test]
    fn test_city_tile_is_already_improved() {
        let mut world = MockWorld::new(5, 5);
        world.add_city(fixtures::city(1, AI, Point::new(2, 2)));
        // Hills under a city still report the city.
        world.set_terrain(Point::new(2, 2), Terrain::Hills);

        let tile = world.tile(Point::new(2, 2)).unwrap().clone();
        assert_eq!(
            terrain_improvement_bonus(&world, &tile),
            ImprovementBonus::AlreadyImproved
        );
    }

    #[test]
    fn test_improved_tiles_are_already_improved() {
        let world = MockWorld::new(3, 3);
        for terrain in Terrain::all() {
            let base = Tile::new(Point::new(1, 1), *terrain);
            for tile in [
                base.clone().with_irrigation(),
                base.clone().with_mine(),
                base.clone().with_irrigation().with_mine(),
            ] {
                assert_eq!(
                    terrain_improvement_bonus(&world, &tile),
                    ImprovementBonus::AlreadyImproved,
                    "{} with improvements",
                    terrain
                );
            }
        }
    }

    #[test]
    fn test_hills_always_mine() {
        let mut world = MockWorld::new(3, 3);
        // River next door makes irrigation legal.
        world.set_terrain(Point::new(1, 0), Terrain::River);
        world.set_terrain(Point::new(1, 1), Terrain::Hills);
        assert!(world.allows_irrigation(Point::new(1, 1)));

        let tile = world.tile(Point::new(1, 1)).unwrap().clone();
        assert_eq!(terrain_improvement_bonus(&world, &tile), ImprovementBonus::Mine);

        let special = tile.with_special().with_road();
        assert_eq!(terrain_improvement_bonus(&world, &special), ImprovementBonus::Mine);
    }

    #[test]
    fn test_irrigation_needs_water() {
        let mut world = MockWorld::new(3, 3);
        let dry = world.tile(Point::new(1, 1)).unwrap().clone();
        assert_eq!(terrain_improvement_bonus(&world, &dry), ImprovementBonus::None);

        world.set_terrain(Point::new(0, 1), Terrain::Ocean);
        let wet = world.tile(Point::new(1, 1)).unwrap().clone();
        assert_eq!(terrain_improvement_bonus(&world, &wet), ImprovementBonus::Irrigate);

        world.set_terrain(Point::new(1, 1), Terrain::Forest);
        let forest = world.tile(Point::new(1, 1)).unwrap().clone();
        assert_eq!(terrain_improvement_bonus(&world, &forest), ImprovementBonus::None);
    }

    #[test]
    fn test_diagonal_water_does_not_irrigate() {
        let mut world = MockWorld::new(3, 3);
        world.set_terrain(Point::new(0, 0), Terrain::Ocean);
        assert!(!world.allows_irrigation(Point::new(1, 1)));
    }

    #[test]
    fn test_nearest_city_ties_keep_lowest_id() {
        let mut world = MockWorld::new(9, 9);
        world.add_city(fixtures::city(7, HUMAN, Point::new(6, 4)));
        world.add_city(fixtures::city(3, AI, Point::new(2, 4)));

        let nearest = nearest_city(&world, Point::new(4, 4)).unwrap();
        assert_eq!(nearest.city.id.0, 3);
        assert_eq!(nearest.distance, 2);
    }

    #[test]
    fn test_nearest_city_is_idempotent() {
        let mut world = MockWorld::new(9, 9);
        world.add_city(fixtures::city(1, HUMAN, Point::new(0, 0)));
        world.add_city(fixtures::city(2, AI, Point::new(8, 8)));
        world.add_city(fixtures::city(3, AI, Point::new(5, 1)));

        for at in [Point::new(4, 4), Point::new(1, 7), Point::new(8, 0)] {
            let first = nearest_city(&world, at).unwrap();
            let second = nearest_city(&world, at).unwrap();
            assert_eq!(first.city.id, second.city.id);
            assert_eq!(first.distance, second.distance);
        }
    }

    #[test]
    fn test_nearest_city_empty_map() {
        let world = MockWorld::new(4, 4);
        assert!(nearest_city(&world, Point::new(1, 1)).is_none());
    }

    #[test]
    fn test_enemy_nearby_bounding_box() {
        let mut world = MockWorld::new(9, 9);
        let unit = fixtures::unit(1, AI, UnitType::Legion, Point::new(4, 4));
        world.add_unit(unit.clone());
        world.add_unit(fixtures::unit(2, AI, UnitType::Legion, Point::new(5, 5)));
        assert!(!enemy_nearby(&world, &unit, 1));

        world.add_unit(fixtures::unit(3, HUMAN, UnitType::Militia, Point::new(6, 6)));
        assert!(!enemy_nearby(&world, &unit, 1));
        assert!(enemy_nearby(&world, &unit, 2));

        world.add_unit(fixtures::unit(4, HUMAN, UnitType::Militia, Point::new(3, 5)));
        assert!(enemy_nearby(&world, &unit, 1));
    }

    #[test]
    fn test_adjacent_foreign_city_counts_as_enemy() {
        let mut world = MockWorld::new(9, 9);
        let unit = fixtures::unit(1, AI, UnitType::Legion, Point::new(4, 4));
        world.add_unit(unit.clone());
        world.add_city(fixtures::city(1, HUMAN, Point::new(6, 4)));
        assert!(!enemy_unit_or_city_nearby(&world, &unit, 1));

        world.add_city(fixtures::city(2, HUMAN, Point::new(5, 3)));
        assert!(enemy_unit_or_city_nearby(&world, &unit, 1));
    }

    #[test]
    fn test_own_adjacent_city_is_not_enemy() {
        let mut world = MockWorld::new(9, 9);
        let unit = fixtures::unit(1, AI, UnitType::Legion, Point::new(4, 4));
        world.add_city(fixtures::city(1, AI, Point::new(5, 4)));
        assert!(!enemy_unit_or_city_nearby(&world, &unit, 1));
    }
}
