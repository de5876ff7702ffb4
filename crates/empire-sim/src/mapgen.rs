//! Map Generation
//!
//! Seeded terrain, huts, specials and land values, plus spaced start
//! positions for the civilizations.

use empire_types::{Point, Terrain, Tile};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::scenario::MapSettings;

/// Interior terrain weights.
const TERRAIN_WEIGHTS: &[(Terrain, u32)] = &[
    (Terrain::Grassland1, 20),
    (Terrain::Grassland2, 8),
    (Terrain::Plains, 18),
    (Terrain::Forest, 10),
    (Terrain::Hills, 9),
    (Terrain::Mountains, 4),
    (Terrain::Desert, 6),
    (Terrain::Swamp, 3),
    (Terrain::Jungle, 3),
    (Terrain::Tundra, 2),
    (Terrain::River, 7),
    (Terrain::Ocean, 6),
];

/// Highest land value a tile can have.
const MAX_LAND_VALUE: u8 = 15;

/// Generates a row-major map. The outer ring is always ocean.
pub fn generate_map(settings: &MapSettings, rng: &mut dyn RngCore) -> Vec<Tile> {
    let (width, height) = (settings.width, settings.height);
    let total: u32 = TERRAIN_WEIGHTS.iter().map(|(_, w)| w).sum();

    let mut tiles = Vec::with_capacity((width * height).max(0) as usize);
    for y in 0..height {
        for x in 0..width {
            let at = Point::new(x, y);
            let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
            let terrain = if border {
                Terrain::Ocean
            } else {
                pick_terrain(rng.gen_range(0..total))
            };

            let mut tile = Tile::new(at, terrain);
            if !tile.is_ocean() {
                tile.special = rng.gen_range(0..100) < settings.special_percent;
                tile.hut = rng.gen_range(0..100) < settings.hut_percent;
            }
            tiles.push(tile);
        }
    }

    assign_land_values(width, height, &mut tiles);
    tiles
}

fn pick_terrain(mut roll: u32) -> Terrain {
    for (terrain, weight) in TERRAIN_WEIGHTS {
        if roll < *weight {
            return *terrain;
        }
        roll -= weight;
    }
    Terrain::Grassland1
}

/// Food and shield potential of one tile, used for land values.
fn yield_score(tile: &Tile) -> u32 {
    let base = match tile.terrain {
        Terrain::Grassland1 | Terrain::Plains | Terrain::River => 2,
        Terrain::Grassland2 => 3,
        Terrain::Forest | Terrain::Hills | Terrain::Ocean => 1,
        Terrain::Desert
        | Terrain::Mountains
        | Terrain::Swamp
        | Terrain::Jungle
        | Terrain::Tundra
        | Terrain::Arctic => 0,
    };
    base + u32::from(tile.special)
}

/// Land value: yield of the 3x3 block around a land tile, halved and capped.
fn assign_land_values(width: i32, height: i32, tiles: &mut [Tile]) {
    let index = |p: Point| -> Option<usize> {
        let inside = p.x >= 0 && p.y >= 0 && p.x < width && p.y < height;
        inside.then(|| (p.y * width + p.x) as usize)
    };

    let values: Vec<u8> = tiles
        .iter()
        .map(|tile| {
            if tile.is_ocean() {
                return 0;
            }
            let around: u32 = tile
                .position
                .neighbors()
                .filter_map(|p| index(p).map(|i| yield_score(&tiles[i])))
                .sum();
            let score = (around + 2 * yield_score(tile)) / 2;
            score.min(u32::from(MAX_LAND_VALUE)) as u8
        })
        .collect();

    for (tile, value) in tiles.iter_mut().zip(values) {
        tile.land_value = value;
    }
}

/// Picks up to `count` land start positions at least `spacing` apart,
/// preferring high land values. Tiles holding huts are skipped.
pub fn start_positions(
    tiles: &[Tile],
    count: usize,
    spacing: u32,
    rng: &mut dyn RngCore,
) -> Vec<Point> {
    let mut candidates: Vec<&Tile> = tiles
        .iter()
        .filter(|t| !t.is_ocean() && !t.hut && t.land_value > 0)
        .collect();
    // Shuffle first so equal land values are broken by the seed.
    candidates.shuffle(rng);
    candidates.sort_by(|a, b| b.land_value.cmp(&a.land_value));

    let mut starts: Vec<Point> = Vec::with_capacity(count);
    for tile in candidates {
        if starts.len() == count {
            break;
        }
        if starts.iter().all(|s| s.distance(tile.position) >= spacing) {
            starts.push(tile.position);
        }
    }
    starts
}
