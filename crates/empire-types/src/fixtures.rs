//! Sample data fixtures for testing.
//!
//! Ready-made players, cities and small maps for tests in other crates.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // empire-types = { path = "../empire-types", features = ["test-fixtures"] }
//!
//! use empire_types::fixtures;
//!
//! let tiles = fixtures::grassland_map(8, 8);
//! let babylon = fixtures::ai_player(1);
//! ```

use crate::{
    City, CityId, DevelopmentLevel, Leader, Player, PlayerId, Point, Terrain, Tile, Unit, UnitId,
    UnitType,
};

/// Player id used for the human in fixtures.
pub const HUMAN: PlayerId = PlayerId(1);

/// Player id used for the AI under test in fixtures.
pub const AI: PlayerId = PlayerId(2);

/// Returns a `width` x `height` map of plain grassland, row by row.
pub fn grassland_map(width: i32, height: i32) -> Vec<Tile> {
    let mut tiles = Vec::with_capacity((width * height).max(0) as usize);
    for y in 0..height {
        for x in 0..width {
            tiles.push(Tile::new(Point::new(x, y), Terrain::Grassland1));
        }
    }
    tiles
}

/// Returns an AI-controlled player with a default leader profile.
pub fn ai_player(id: u8) -> Player {
    Player::new(PlayerId(id), Leader::new("Hammurabi"), "Babylonians")
}

/// Returns an expansionistic AI player.
pub fn expansionist_player(id: u8) -> Player {
    Player::new(
        PlayerId(id),
        Leader::new("Genghis Khan").with_development(DevelopmentLevel::Expansionistic),
        "Mongols",
    )
}

/// Returns a human-controlled player.
pub fn human_player(id: u8) -> Player {
    Player::new(PlayerId(id), Leader::new("Abraham Lincoln"), "Americans").human()
}

/// Returns a size-1 city with no buildings.
pub fn city(id: u32, owner: PlayerId, position: Point) -> City {
    City::new(CityId(id), format!("City {}", id), owner, position)
}

/// Returns a unit with full moves and no goto.
pub fn unit(id: u32, owner: PlayerId, unit_type: UnitType, position: Point) -> Unit {
    Unit::new(UnitId(id), owner, unit_type, position)
}
