//! Unit Types
//!
//! Unit roles, the unit type catalog with its combat statistics, and the
//! per-unit record.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::advance::Advance;
use crate::city::CityId;
use crate::geometry::Point;
use crate::player::PlayerId;

/// Unique identifier for a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit_{:04}", self.0)
    }
}

/// Behavioral category of a unit; selects which policy governs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitRole {
    Settler,
    Defense,
    LandAttack,
    SeaAttack,
    AirAttack,
    Transport,
    Civilian,
}

/// Statistics shared by every unit of one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitStats {
    pub role: UnitRole,
    pub attack: i32,
    pub defense: i32,
    /// Movement allowance per turn
    pub moves: u32,
    /// Shields needed to build one
    pub cost: u32,
    pub requires: Option<Advance>,
}

/// A buildable unit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Settlers,
    Militia,
    Phalanx,
    Legion,
    Chariot,
    Cavalry,
    Knights,
    Catapult,
    Musketeers,
    Cannon,
    Riflemen,
    Armor,
    MechInf,
    Diplomat,
    Caravan,
    Trireme,
    Ironclad,
    Fighter,
}

impl UnitType {
    pub fn stats(self) -> UnitStats {
        use Advance as A;
        use UnitRole as R;
        let (role, attack, defense, moves, cost, requires) = match self {
            UnitType::Settlers => (R::Settler, 0, 1, 1, 30, None),
            UnitType::Militia => (R::Defense, 1, 1, 1, 10, None),
            UnitType::Phalanx => (R::Defense, 1, 2, 1, 20, Some(A::BronzeWorking)),
            UnitType::Legion => (R::LandAttack, 4, 2, 1, 20, Some(A::IronWorking)),
            UnitType::Chariot => (R::LandAttack, 3, 1, 2, 30, Some(A::TheWheel)),
            UnitType::Cavalry => (R::LandAttack, 2, 1, 2, 20, Some(A::HorsebackRiding)),
            UnitType::Knights => (R::LandAttack, 4, 2, 2, 40, Some(A::Chivalry)),
            UnitType::Catapult => (R::LandAttack, 6, 1, 1, 40, Some(A::Mathematics)),
            UnitType::Musketeers => (R::Defense, 2, 3, 1, 30, Some(A::Gunpowder)),
            UnitType::Cannon => (R::LandAttack, 8, 1, 1, 40, Some(A::Metallurgy)),
            UnitType::Riflemen => (R::Defense, 5, 4, 1, 30, Some(A::Conscription)),
            UnitType::Armor => (R::LandAttack, 10, 5, 3, 80, Some(A::Automobile)),
            UnitType::MechInf => (R::Defense, 6, 6, 3, 50, Some(A::LaborUnion)),
            UnitType::Diplomat => (R::Civilian, 0, 0, 2, 30, Some(A::Writing)),
            UnitType::Caravan => (R::Civilian, 0, 1, 1, 50, Some(A::Trade)),
            UnitType::Trireme => (R::Transport, 1, 0, 3, 40, Some(A::MapMaking)),
            UnitType::Ironclad => (R::SeaAttack, 4, 4, 4, 60, Some(A::Steel)),
            UnitType::Fighter => (R::AirAttack, 4, 2, 10, 60, Some(A::Combustion)),
        };
        UnitStats {
            role,
            attack,
            defense,
            moves,
            cost,
            requires,
        }
    }

    pub fn role(self) -> UnitRole {
        self.stats().role
    }

    /// Returns all unit types in declaration order.
    pub fn all() -> &'static [UnitType] {
        &[
            UnitType::Settlers,
            UnitType::Militia,
            UnitType::Phalanx,
            UnitType::Legion,
            UnitType::Chariot,
            UnitType::Cavalry,
            UnitType::Knights,
            UnitType::Catapult,
            UnitType::Musketeers,
            UnitType::Cannon,
            UnitType::Riflemen,
            UnitType::Armor,
            UnitType::MechInf,
            UnitType::Diplomat,
            UnitType::Caravan,
            UnitType::Trireme,
            UnitType::Ironclad,
            UnitType::Fighter,
        ]
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A unit on the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub owner: PlayerId,
    pub unit_type: UnitType,
    pub position: Point,
    /// City that built and supports this unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_city: Option<CityId>,
    /// Movement points remaining this turn
    pub moves_left: u32,
    /// Pending long-range destination
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goto: Option<Point>,
    #[serde(default)]
    pub fortified: bool,
}

impl Unit {
    pub fn new(id: UnitId, owner: PlayerId, unit_type: UnitType, position: Point) -> Self {
        Self {
            id,
            owner,
            unit_type,
            position,
            home_city: None,
            moves_left: unit_type.stats().moves,
            goto: None,
            fortified: false,
        }
    }

    pub fn with_home_city(mut self, city: CityId) -> Self {
        self.home_city = Some(city);
        self
    }

    pub fn with_goto(mut self, destination: Point) -> Self {
        self.goto = Some(destination);
        self
    }

    pub fn role(&self) -> UnitRole {
        self.unit_type.role()
    }

    pub fn attack(&self) -> i32 {
        self.unit_type.stats().attack
    }

    pub fn defense(&self) -> i32 {
        self.unit_type.stats().defense
    }

    /// Movement allowance of the unit's type (not what is left this turn).
    pub fn movement_allowance(&self) -> u32 {
        self.unit_type.stats().moves
    }

    pub fn has_goto(&self) -> bool {
        self.goto.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defensive_ladder_roles() {
        for t in [
            UnitType::Militia,
            UnitType::Phalanx,
            UnitType::Musketeers,
            UnitType::Riflemen,
            UnitType::MechInf,
        ] {
            assert_eq!(t.role(), UnitRole::Defense, "{} should defend", t);
        }
        assert_eq!(UnitType::Settlers.role(), UnitRole::Settler);
        assert_eq!(UnitType::Trireme.role(), UnitRole::Transport);
    }

    #[test]
    fn test_new_unit_has_full_moves() {
        let unit = Unit::new(UnitId(1), PlayerId(2), UnitType::Chariot, Point::new(0, 0));
        assert_eq!(unit.moves_left, 2);
        assert_eq!(unit.movement_allowance(), 2);
        assert!(!unit.has_goto());
        assert!(!unit.fortified);
    }

    #[test]
    fn test_militia_needs_no_advance() {
        assert_eq!(UnitType::Militia.stats().requires, None);
        assert_eq!(UnitType::Armor.stats().requires, Some(Advance::Automobile));
    }
}
