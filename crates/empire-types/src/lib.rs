//! Shared world types for the empire AI engine.
//!
//! This crate contains pure data structures with no decision logic: map
//! geometry, terrain and tiles, units, cities, players, the technology tree,
//! and the order intents the AI submits. It is a dependency for all other
//! crates in the workspace.

pub mod advance;
pub mod city;
pub mod geometry;
pub mod order;
pub mod player;
pub mod terrain;
pub mod unit;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

// Re-export geometry types
pub use geometry::{Delta, Point, NEIGHBOR_OFFSETS};

// Re-export map types
pub use terrain::{Terrain, Tile};

// Re-export unit types
pub use unit::{Unit, UnitId, UnitRole, UnitType};

// Re-export city types
pub use city::{Building, City, CityId, Production};

// Re-export player types
pub use player::{
    AggressionLevel, DevelopmentLevel, Difficulty, Government, Leader, MilitarismLevel, Player,
    PlayerId,
};

// Re-export technology types
pub use advance::Advance;

// Re-export order types
pub use order::{Order, OrderQueue};
