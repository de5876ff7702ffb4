//! World Store
//!
//! The in-memory world the turn driver owns. It answers the engine's read
//! queries and exposes the narrow mutators the executor uses to apply
//! orders.

use std::collections::BTreeMap;

use bevy_ecs::prelude::*;
use empire_ai::WorldQuery;
use empire_types::{
    Advance, Building, City, CityId, Delta, Difficulty, Player, PlayerId, Point, Production, Tile,
    Unit, UnitId, UnitType,
};

/// Tiles within this distance of a unit are visible to its owner.
const UNIT_SIGHT: u32 = 1;
/// Tiles within this distance of a city are visible to its owner.
const CITY_SIGHT: u32 = 2;

/// Orthogonal neighbours, the only tiles that can feed irrigation.
const IRRIGATION_SOURCES: [Delta; 4] = [
    Delta::new(0, -1),
    Delta::new(-1, 0),
    Delta::new(1, 0),
    Delta::new(0, 1),
];

/// Map, units, cities and players for one game.
#[derive(Resource, Debug, Clone)]
pub struct WorldStore {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    units: BTreeMap<UnitId, Unit>,
    cities: BTreeMap<CityId, City>,
    players: BTreeMap<PlayerId, Player>,
    turn: u32,
    difficulty: Difficulty,
    next_unit: u32,
    next_city: u32,
}

impl WorldStore {
    /// Creates a store over row-major `tiles` of a `width` x `height` map.
    pub fn new(width: i32, height: i32, tiles: Vec<Tile>, difficulty: Difficulty) -> Self {
        Self {
            width,
            height,
            tiles,
            units: BTreeMap::new(),
            cities: BTreeMap::new(),
            players: BTreeMap::new(),
            turn: 0,
            difficulty,
            next_unit: 1,
            next_city: 1,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    fn index(&self, at: Point) -> Option<usize> {
        if at.x < 0 || at.y < 0 || at.x >= self.width || at.y >= self.height {
            return None;
        }
        Some((at.y * self.width + at.x) as usize)
    }

    pub fn tile_mut(&mut self, at: Point) -> Option<&mut Tile> {
        let index = self.index(at)?;
        self.tiles.get_mut(index)
    }

    pub fn add_player(&mut self, player: Player) {
        self.players.insert(player.id, player);
    }

    /// Players in ascending id order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    /// Places a new unit with full moves and returns its id.
    pub fn spawn_unit(
        &mut self,
        owner: PlayerId,
        unit_type: UnitType,
        at: Point,
        home_city: Option<CityId>,
    ) -> UnitId {
        let id = UnitId(self.next_unit);
        self.next_unit += 1;
        let mut unit = Unit::new(id, owner, unit_type, at);
        unit.home_city = home_city;
        self.units.insert(id, unit);
        id
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    pub fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        self.units.remove(&id)
    }

    /// Ids of every unit, ascending.
    pub fn unit_ids(&self) -> Vec<UnitId> {
        self.units.keys().copied().collect()
    }

    /// Ids of every city, ascending.
    pub fn city_ids(&self) -> Vec<CityId> {
        self.cities.keys().copied().collect()
    }

    /// Founds a size-1 city for `owner` at `at`. Returns `None` when the tile
    /// is off the map, ocean, or already holds a city.
    pub fn found_city(&mut self, owner: PlayerId, at: Point) -> Option<CityId> {
        let id = CityId(self.next_city);
        let tile = self.tile_mut(at)?;
        if tile.is_ocean() || tile.has_city() {
            return None;
        }
        tile.city = Some(id);
        tile.road = true;
        tile.hut = false;
        self.next_city += 1;

        let founded = self.cities.values().filter(|c| c.owner == owner).count() + 1;
        let name = match self.players.get(&owner) {
            Some(player) => format!("{} {}", player.tribe, founded),
            None => format!("City {}", id.0),
        };
        self.cities.insert(id, City::new(id, name, owner, at));
        Some(id)
    }

    pub fn city_mut(&mut self, id: CityId) -> Option<&mut City> {
        self.cities.get_mut(&id)
    }

    /// Id of the city standing on `at`, if any.
    pub fn city_at(&self, at: Point) -> Option<CityId> {
        self.tile(at).and_then(|t| t.city)
    }

    pub fn advance_turn(&mut self) {
        self.turn += 1;
    }
}

impl WorldQuery for WorldStore {
    fn turn(&self) -> u32 {
        self.turn
    }

    fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn tile(&self, at: Point) -> Option<&Tile> {
        self.index(at).and_then(|i| self.tiles.get(i))
    }

    fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    fn units(&self) -> Vec<&Unit> {
        self.units.values().collect()
    }

    fn city(&self, id: CityId) -> Option<&City> {
        self.cities.get(&id)
    }

    fn cities(&self) -> Vec<&City> {
        self.cities.values().collect()
    }

    fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    fn is_visible(&self, player: PlayerId, at: Point) -> bool {
        if self.tile(at).is_none() {
            return false;
        }
        self.units
            .values()
            .any(|u| u.owner == player && u.position.distance(at) <= UNIT_SIGHT)
            || self
                .cities
                .values()
                .any(|c| c.owner == player && c.position.distance(at) <= CITY_SIGHT)
    }

    fn allows_irrigation(&self, at: Point) -> bool {
        IRRIGATION_SOURCES
            .into_iter()
            .filter_map(|d| self.tile(at.offset(d)))
            .any(|t| t.terrain.is_water_source() || t.irrigation)
    }

    fn can_move(&self, unit: UnitId, delta: Delta) -> bool {
        if !delta.is_single_step() {
            return false;
        }
        let Some(unit) = self.units.get(&unit) else {
            return false;
        };
        if unit.moves_left == 0 {
            return false;
        }
        let target = unit.position.offset(delta);
        let Some(tile) = self.tile(target) else {
            return false;
        };
        if tile.is_ocean() {
            return false;
        }

        // Entering a foreign stack or city is an attack or a capture.
        let foreign_units = self
            .units
            .values()
            .any(|u| u.position == target && u.owner != unit.owner);
        let foreign_city = tile
            .city
            .and_then(|id| self.cities.get(&id))
            .is_some_and(|c| c.owner != unit.owner);
        if (foreign_units || foreign_city) && unit.attack() == 0 {
            return false;
        }
        true
    }

    fn move_targets(&self, unit: UnitId) -> Vec<Point> {
        let Some(u) = self.units.get(&unit) else {
            return Vec::new();
        };
        let origin = u.position;
        origin
            .neighbors()
            .filter(|p| self.can_move(unit, origin.step_towards(*p)))
            .collect()
    }

    fn available_production(&self, city: CityId) -> Vec<Production> {
        let Some(city) = self.cities.get(&city) else {
            return Vec::new();
        };
        let Some(owner) = self.players.get(&city.owner) else {
            return Vec::new();
        };
        let knows = |requires: Option<Advance>| requires.map_or(true, |a| owner.has_advance(a));

        let units = UnitType::all()
            .iter()
            .filter(|t| knows(t.stats().requires))
            .map(|t| Production::Unit(*t));
        let buildings = Building::all()
            .iter()
            .filter(|b| !city.has_building(**b) && knows(b.requires()))
            .map(|b| Production::Building(*b));
        units.chain(buildings).collect()
    }
}
