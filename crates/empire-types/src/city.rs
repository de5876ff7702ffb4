//! Cities
//!
//! City records, the buildings a city can hold, and production items.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::advance::Advance;
use crate::geometry::Point;
use crate::player::PlayerId;
use crate::unit::UnitType;

/// Unique identifier for a city.
///
/// Ascending id order is the canonical city enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CityId(pub u32);

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "city_{:03}", self.0)
    }
}

/// A city improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Building {
    Barracks,
    Granary,
    Temple,
    CityWalls,
    Library,
    Marketplace,
}

impl Building {
    pub fn cost(self) -> u32 {
        match self {
            Building::Barracks => 40,
            Building::Granary => 60,
            Building::Temple => 40,
            Building::CityWalls => 120,
            Building::Library => 90,
            Building::Marketplace => 80,
        }
    }

    pub fn requires(self) -> Option<Advance> {
        match self {
            Building::Barracks => None,
            Building::Granary => Some(Advance::Pottery),
            Building::Temple => Some(Advance::CeremonialBurial),
            Building::CityWalls => Some(Advance::Masonry),
            Building::Library => Some(Advance::Writing),
            Building::Marketplace => Some(Advance::Currency),
        }
    }

    /// Returns all buildings in declaration order.
    pub fn all() -> &'static [Building] {
        &[
            Building::Barracks,
            Building::Granary,
            Building::Temple,
            Building::CityWalls,
            Building::Library,
            Building::Marketplace,
        ]
    }
}

/// Something a city can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "item", rename_all = "snake_case")]
pub enum Production {
    Unit(UnitType),
    Building(Building),
}

impl Production {
    pub fn cost(self) -> u32 {
        match self {
            Production::Unit(t) => t.stats().cost,
            Production::Building(b) => b.cost(),
        }
    }

    pub fn requires(self) -> Option<Advance> {
        match self {
            Production::Unit(t) => t.stats().requires,
            Production::Building(b) => b.requires(),
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Production::Unit(t) => write!(f, "{}", t),
            Production::Building(b) => write!(f, "{:?}", b),
        }
    }
}

/// A city on the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub owner: PlayerId,
    pub position: Point,
    pub size: u8,
    #[serde(default)]
    pub buildings: BTreeSet<Building>,
    /// Current production order; `None` means a decision is needed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production: Option<Production>,
    /// Shields accumulated towards the current order
    #[serde(default)]
    pub shields: u32,
    /// Food accumulated towards the next size
    #[serde(default)]
    pub food: u32,
}

impl City {
    pub fn new(id: CityId, name: impl Into<String>, owner: PlayerId, position: Point) -> Self {
        Self {
            id,
            name: name.into(),
            owner,
            position,
            size: 1,
            buildings: BTreeSet::new(),
            production: None,
            shields: 0,
            food: 0,
        }
    }

    pub fn with_size(mut self, size: u8) -> Self {
        self.size = size;
        self
    }

    pub fn with_building(mut self, building: Building) -> Self {
        self.buildings.insert(building);
        self
    }

    pub fn with_production(mut self, production: Production) -> Self {
        self.production = Some(production);
        self
    }

    pub fn has_building(&self, building: Building) -> bool {
        self.buildings.contains(&building)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_builders() {
        let city = City::new(CityId(3), "Babylon", PlayerId(1), Point::new(4, 4))
            .with_size(5)
            .with_building(Building::Barracks);
        assert_eq!(city.size, 5);
        assert!(city.has_building(Building::Barracks));
        assert!(!city.has_building(Building::Granary));
        assert!(city.production.is_none());
    }

    #[test]
    fn test_production_serialization() {
        let json = serde_json::to_string(&Production::Unit(UnitType::Militia)).unwrap();
        assert_eq!(json, r#"{"kind":"unit","item":"militia"}"#);
        let parsed: Production =
            serde_json::from_str(r#"{"kind":"building","item":"city_walls"}"#).unwrap();
        assert_eq!(parsed, Production::Building(Building::CityWalls));
    }

    #[test]
    fn test_production_requirements() {
        assert_eq!(Production::Building(Building::Barracks).requires(), None);
        assert_eq!(
            Production::Building(Building::Temple).requires(),
            Some(Advance::CeremonialBurial)
        );
        assert_eq!(Production::Unit(UnitType::Settlers).cost(), 30);
    }
}
