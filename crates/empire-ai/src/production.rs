//! Production Policy
//!
//! Picks what a city builds next. Rules are tried in priority order and the
//! first one that yields an item wins:
//!
//! | Priority | Rule           | Item                                        |
//! |----------|----------------|---------------------------------------------|
//! | 1        | Defense quota  | best defensive unit, until the tile holds 2 |
//! | 2        | Infrastructure | Barracks, Granary, Temple, City Walls       |
//! | 3        | Expansion      | Settlers, gated by leader development       |
//! | 4        | Filler         | Diplomat, offensive unit, or Caravan        |
//! | 5        | Fallback       | uniform pick from the buildable list        |

use empire_types::{
    Advance, Building, City, CityId, Order, Player, PlayerId, Production, UnitType,
};
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::config::AiConfig;
use crate::context::TurnContext;
use crate::world::WorldQuery;

/// Defensive units by descending tech requirement; Militia needs nothing.
const DEFENSE_LADDER: &[(Advance, UnitType)] = &[
    (Advance::LaborUnion, UnitType::MechInf),
    (Advance::Conscription, UnitType::Riflemen),
    (Advance::Gunpowder, UnitType::Musketeers),
    (Advance::BronzeWorking, UnitType::Phalanx),
];

const OFFENSE_LADDER: &[(Advance, UnitType)] = &[
    (Advance::Automobile, UnitType::Armor),
    (Advance::Metallurgy, UnitType::Cannon),
    (Advance::Chivalry, UnitType::Knights),
    (Advance::TheWheel, UnitType::Chariot),
    (Advance::HorsebackRiding, UnitType::Cavalry),
    (Advance::IronWorking, UnitType::Legion),
];

const INFRASTRUCTURE: &[Building] = &[
    Building::Barracks,
    Building::Granary,
    Building::Temple,
    Building::CityWalls,
];

/// Sets production for `city` if it has none.
///
/// Skipped for cities of size 0, cities owned by anyone but `player`, and
/// cities that already have an order.
pub fn decide_city_production(ctx: &mut TurnContext<'_>, player: PlayerId, city: CityId) {
    let world = ctx.world;
    let Some(city) = world.city(city) else {
        return;
    };
    if city.size == 0 || city.owner != player || city.production.is_some() {
        return;
    }
    let Some(owner) = world.player(player) else {
        return;
    };

    let production = match choose_production(world, ctx.config, owner, city) {
        Some(production) => production,
        None => {
            let items = world.available_production(city.id);
            let Some(&production) = items.choose(&mut *ctx.rng) else {
                warn!(city = %city.id, "nothing buildable, production left unset");
                return;
            };
            production
        }
    };

    debug!(city = %city.id, name = %city.name, %production, "production chosen");
    ctx.submit(Order::SetProduction {
        city: city.id,
        production,
    });
}

/// Runs the deterministic rules; `None` means the random fallback applies.
pub fn choose_production(
    world: &dyn WorldQuery,
    config: &AiConfig,
    player: &Player,
    city: &City,
) -> Option<Production> {
    let rules = &config.production;

    let defender = best_defender(player);
    let garrison = world
        .units_at(city.position)
        .iter()
        .filter(|u| u.unit_type == defender)
        .count();
    if garrison < rules.defense_quota {
        return Some(Production::Unit(defender));
    }

    let building = INFRASTRUCTURE.iter().copied().find(|b| {
        !city.has_building(*b) && b.requires().map_or(true, |a| player.has_advance(a))
    });
    if let Some(building) = building {
        return Some(Production::Building(building));
    }

    let supported = world.units_supported_by(city.id);
    let expansion = rules.expansion.rule(player.leader.development);
    if city.size >= expansion.min_city_size
        && !supported.iter().any(|u| u.unit_type == UnitType::Settlers)
        && world.city_count(player.id) < expansion.max_cities
    {
        return Some(Production::Unit(UnitType::Settlers));
    }

    let filler = if supported.len() < rules.filler_unit_limit {
        if player.government.is_representative() {
            player
                .has_advance(Advance::Writing)
                .then_some(UnitType::Diplomat)
        } else {
            best_of(player, OFFENSE_LADDER)
        }
    } else {
        player
            .has_advance(Advance::Trade)
            .then_some(UnitType::Caravan)
    };
    filler.map(Production::Unit)
}

/// Best defensive unit `player` can build.
pub fn best_defender(player: &Player) -> UnitType {
    best_of(player, DEFENSE_LADDER).unwrap_or(UnitType::Militia)
}

fn best_of(player: &Player, ladder: &[(Advance, UnitType)]) -> Option<UnitType> {
    ladder
        .iter()
        .find(|(advance, _)| player.has_advance(*advance))
        .map(|(_, unit)| *unit)
}
