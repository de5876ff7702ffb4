//! Terrain and Tiles
//!
//! Terrain kinds with their movement and defense properties, and the tile
//! record the map stores for every position.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::city::CityId;
use crate::geometry::Point;

/// Terrain kind of a map tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    Desert,
    Plains,
    /// Plain grassland
    Grassland1,
    /// Grassland carrying the shield pattern
    Grassland2,
    Forest,
    Hills,
    Mountains,
    Tundra,
    Arctic,
    Swamp,
    Jungle,
    River,
    Ocean,
}

impl Terrain {
    /// Movement points needed to enter this terrain.
    pub fn movement_cost(self) -> u32 {
        match self {
            Terrain::Hills | Terrain::Forest | Terrain::Swamp | Terrain::Jungle => 2,
            Terrain::Mountains => 3,
            _ => 1,
        }
    }

    /// Defense multiplier granted to units standing on this terrain.
    pub fn defense_bonus(self) -> i32 {
        match self {
            Terrain::Mountains => 3,
            Terrain::Hills | Terrain::Forest | Terrain::Swamp | Terrain::Jungle | Terrain::River => 2,
            _ => 1,
        }
    }

    pub fn is_ocean(self) -> bool {
        matches!(self, Terrain::Ocean)
    }

    pub fn is_grassland(self) -> bool {
        matches!(self, Terrain::Grassland1 | Terrain::Grassland2)
    }

    /// Terrain that yields extra food when irrigated.
    pub fn benefits_from_irrigation(self) -> bool {
        self.is_grassland() || matches!(self, Terrain::Plains | Terrain::Desert)
    }

    /// Terrain that counts as a water source for adjacent irrigation.
    pub fn is_water_source(self) -> bool {
        matches!(self, Terrain::Ocean | Terrain::River)
    }

    /// Returns all terrain variants.
    pub fn all() -> &'static [Terrain] {
        &[
            Terrain::Desert,
            Terrain::Plains,
            Terrain::Grassland1,
            Terrain::Grassland2,
            Terrain::Forest,
            Terrain::Hills,
            Terrain::Mountains,
            Terrain::Tundra,
            Terrain::Arctic,
            Terrain::Swamp,
            Terrain::Jungle,
            Terrain::River,
            Terrain::Ocean,
        ]
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Terrain::Desert => "desert",
            Terrain::Plains => "plains",
            Terrain::Grassland1 | Terrain::Grassland2 => "grassland",
            Terrain::Forest => "forest",
            Terrain::Hills => "hills",
            Terrain::Mountains => "mountains",
            Terrain::Tundra => "tundra",
            Terrain::Arctic => "arctic",
            Terrain::Swamp => "swamp",
            Terrain::Jungle => "jungle",
            Terrain::River => "river",
            Terrain::Ocean => "ocean",
        };
        write!(f, "{}", name)
    }
}

/// A single map square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub position: Point,
    pub terrain: Terrain,
    /// City standing on this tile, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<CityId>,
    #[serde(default)]
    pub road: bool,
    #[serde(default)]
    pub railroad: bool,
    #[serde(default)]
    pub irrigation: bool,
    #[serde(default)]
    pub mine: bool,
    /// Tribal hut waiting to be entered
    #[serde(default)]
    pub hut: bool,
    /// Special resource on the tile
    #[serde(default)]
    pub special: bool,
    /// Precomputed settlement desirability
    #[serde(default)]
    pub land_value: u8,
}

impl Tile {
    pub fn new(position: Point, terrain: Terrain) -> Self {
        Self {
            position,
            terrain,
            city: None,
            road: false,
            railroad: false,
            irrigation: false,
            mine: false,
            hut: false,
            special: false,
            land_value: 0,
        }
    }

    pub fn with_land_value(mut self, land_value: u8) -> Self {
        self.land_value = land_value;
        self
    }

    pub fn with_irrigation(mut self) -> Self {
        self.irrigation = true;
        self
    }

    pub fn with_mine(mut self) -> Self {
        self.mine = true;
        self
    }

    pub fn with_road(mut self) -> Self {
        self.road = true;
        self
    }

    pub fn with_hut(mut self) -> Self {
        self.hut = true;
        self
    }

    pub fn with_special(mut self) -> Self {
        self.special = true;
        self
    }

    pub fn with_city(mut self, city: CityId) -> Self {
        self.city = Some(city);
        self
    }

    pub fn has_city(&self) -> bool {
        self.city.is_some()
    }

    pub fn is_ocean(&self) -> bool {
        self.terrain.is_ocean()
    }

    pub fn defense_bonus(&self) -> i32 {
        self.terrain.defense_bonus()
    }

    pub fn movement_cost(&self) -> u32 {
        self.terrain.movement_cost()
    }
}
