//! In-memory world for policy tests.

use std::collections::{BTreeMap, BTreeSet};

use empire_types::{
    Building, City, CityId, Delta, Difficulty, Player, PlayerId, Point, Production, Terrain, Tile,
    Unit, UnitId, UnitType,
};

use crate::world::WorldQuery;

/// Small rectangular world with everything visible by default.
pub struct MockWorld {
    pub width: i32,
    pub height: i32,
    pub turn: u32,
    pub difficulty: Difficulty,
    tiles: Vec<Tile>,
    units: BTreeMap<UnitId, Unit>,
    cities: BTreeMap<CityId, City>,
    players: BTreeMap<PlayerId, Player>,
    /// `None` means every tile is visible
    visible: Option<BTreeSet<Point>>,
    /// Every move is rejected when set
    pub block_moves: bool,
    move_targets: Option<Vec<Point>>,
    production: Option<Vec<Production>>,
}

impl MockWorld {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            turn: 1,
            difficulty: Difficulty::Prince,
            tiles: empire_types::fixtures::grassland_map(width, height),
            units: BTreeMap::new(),
            cities: BTreeMap::new(),
            players: BTreeMap::new(),
            visible: None,
            block_moves: false,
            move_targets: None,
            production: None,
        }
    }

    fn index(&self, at: Point) -> Option<usize> {
        if at.x < 0 || at.y < 0 || at.x >= self.width || at.y >= self.height {
            return None;
        }
        Some((at.y * self.width + at.x) as usize)
    }

    pub fn tile_mut(&mut self, at: Point) -> &mut Tile {
        let index = self.index(at).expect("tile inside the map");
        &mut self.tiles[index]
    }

    pub fn set_terrain(&mut self, at: Point, terrain: Terrain) {
        self.tile_mut(at).terrain = terrain;
    }

    pub fn add_player(&mut self, player: Player) {
        self.players.insert(player.id, player);
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        self.players.get_mut(&id).expect("player registered")
    }

    pub fn add_unit(&mut self, unit: Unit) {
        self.units.insert(unit.id, unit);
    }

    pub fn add_city(&mut self, city: City) {
        self.tile_mut(city.position).city = Some(city.id);
        self.cities.insert(city.id, city);
    }

    pub fn city_mut(&mut self, id: CityId) -> &mut City {
        self.cities.get_mut(&id).expect("city registered")
    }

    /// Hides every tile; use [`MockWorld::reveal`] to expose some again.
    pub fn hide_all(&mut self) {
        self.visible = Some(BTreeSet::new());
    }

    pub fn reveal(&mut self, at: Point) {
        self.visible.get_or_insert_with(BTreeSet::new).insert(at);
    }

    /// Replaces the computed move targets with a fixed list.
    pub fn set_move_targets(&mut self, targets: Vec<Point>) {
        self.move_targets = Some(targets);
    }

    /// Replaces the computed production list with a fixed list.
    pub fn set_production(&mut self, items: Vec<Production>) {
        self.production = Some(items);
    }
}

impl WorldQuery for MockWorld {
    fn turn(&self) -> u32 {
        self.turn
    }

    fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn tile(&self, at: Point) -> Option<&Tile> {
        self.index(at).map(|i| &self.tiles[i])
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

    fn is_visible(&self, _player: PlayerId, at: Point) -> bool {
        if self.tile(at).is_none() {
            return false;
        }
        match &self.visible {
            None => true,
            Some(set) => set.contains(&at),
        }
    }

    fn allows_irrigation(&self, at: Point) -> bool {
        [
            Delta::new(0, -1),
            Delta::new(-1, 0),
            Delta::new(1, 0),
            Delta::new(0, 1),
        ]
        .into_iter()
        .filter_map(|d| self.tile(at.offset(d)))
        .any(|t| t.terrain.is_water_source() || t.irrigation)
    }

    fn can_move(&self, unit: UnitId, delta: Delta) -> bool {
        if self.block_moves || !delta.is_single_step() {
            return false;
        }
        let Some(unit) = self.units.get(&unit) else {
            return false;
        };
        self.tile(unit.position.offset(delta))
            .is_some_and(|t| !t.is_ocean())
    }

    fn move_targets(&self, unit: UnitId) -> Vec<Point> {
        if let Some(targets) = &self.move_targets {
            return targets.clone();
        }
        let Some(u) = self.units.get(&unit) else {
            return Vec::new();
        };
        u.position
            .neighbors()
            .filter(|p| self.tile(*p).is_some_and(|t| !t.is_ocean()))
            .collect()
    }

    fn available_production(&self, city: CityId) -> Vec<Production> {
        if let Some(items) = &self.production {
            return items.clone();
        }
        let Some(city) = self.cities.get(&city) else {
            return Vec::new();
        };
        let known = self
            .players
            .get(&city.owner)
            .map(|p| p.advances.clone())
            .unwrap_or_default();
        let units = UnitType::all().iter().map(|t| Production::Unit(*t));
        let buildings = Building::all()
            .iter()
            .filter(|b| !city.has_building(**b))
            .map(|b| Production::Building(*b));
        units
            .chain(buildings)
            .filter(|p| p.requires().map_or(true, |a| known.contains(&a)))
            .collect()
    }
}
