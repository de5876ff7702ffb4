//! World Query Surface
//!
//! The read-only view of the game world that every policy consumes. The
//! engine never mutates the world through this trait; all changes are
//! requested as [`Order`](empire_types::Order) intents.
//!
//! Enumeration methods return items in canonical order (ascending id) so
//! that first-found tie-breaking is reproducible.

use empire_types::{
    Advance, City, CityId, Delta, Difficulty, Player, PlayerId, Point, Production, Tile, Unit,
    UnitId,
};

/// Read-only world access for the decision engine.
pub trait WorldQuery {
    /// Current game turn, starting at 0.
    fn turn(&self) -> u32;

    fn difficulty(&self) -> Difficulty;

    /// Tile at `at`, or `None` outside the map.
    fn tile(&self, at: Point) -> Option<&Tile>;

    fn unit(&self, id: UnitId) -> Option<&Unit>;

    /// Every unit on the map in ascending id order.
    fn units(&self) -> Vec<&Unit>;

    fn city(&self, id: CityId) -> Option<&City>;

    /// Every city on the map in ascending id order.
    fn cities(&self) -> Vec<&City>;

    fn player(&self, id: PlayerId) -> Option<&Player>;

    /// True if `at` is currently visible to `player`.
    fn is_visible(&self, player: PlayerId, at: Point) -> bool;

    /// True if irrigation may be built at `at` under the world's rules.
    fn allows_irrigation(&self, at: Point) -> bool;

    /// True if the world would accept moving `unit` by `delta` right now.
    fn can_move(&self, unit: UnitId, delta: Delta) -> bool;

    /// Adjacent tiles `unit` may legally enter (or attack) this turn.
    fn move_targets(&self, unit: UnitId) -> Vec<Point>;

    /// Items `city` can currently build.
    fn available_production(&self, city: CityId) -> Vec<Production>;

    /// Units standing on `at`, in ascending id order.
    fn units_at(&self, at: Point) -> Vec<&Unit> {
        self.units()
            .into_iter()
            .filter(|u| u.position == at)
            .collect()
    }

    /// Units whose home city is `city`.
    fn units_supported_by(&self, city: CityId) -> Vec<&Unit> {
        self.units()
            .into_iter()
            .filter(|u| u.home_city == Some(city))
            .collect()
    }

    /// Number of cities owned by `player`.
    fn city_count(&self, player: PlayerId) -> usize {
        self.cities().iter().filter(|c| c.owner == player).count()
    }

    /// Movement points needed to enter `at`; off-map tiles are impassable.
    fn movement_cost(&self, at: Point) -> u32 {
        self.tile(at).map_or(u32::MAX, Tile::movement_cost)
    }

    /// Advances `player` could start researching now.
    fn available_research(&self, player: PlayerId) -> Vec<Advance> {
        self.player(player)
            .map(|p| Advance::available_to(&p.advances))
            .unwrap_or_default()
    }
}
