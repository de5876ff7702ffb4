//! Order Executor
//!
//! Applies queued order intents to the [`WorldStore`] in submission order
//! and runs the end-of-turn bookkeeping: city production and growth,
//! research progress, and movement reset.

use std::collections::BTreeMap;

use bevy_ecs::prelude::*;
use empire_ai::WorldQuery;
use empire_types::{
    Advance, Building, CityId, Delta, Order, PlayerId, Point, Production, Terrain, Unit, UnitId,
    UnitType,
};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::events::{HutReward, SimEvent, TurnEvents};
use crate::store::WorldStore;

/// Result of applying one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The world declined the order; the reason is for logs only
    Rejected(&'static str),
}

/// Running tally of applied and rejected orders.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStats {
    /// Applied orders by label
    pub applied: BTreeMap<String, usize>,
    pub rejected: usize,
}

impl OrderStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, order: &Order, outcome: Outcome) {
        match outcome {
            Outcome::Applied => *self.applied.entry(order.label().to_string()).or_default() += 1,
            Outcome::Rejected(_) => self.rejected += 1,
        }
    }

    pub fn total_applied(&self) -> usize {
        self.applied.values().sum()
    }
}

/// Applies `orders` in order. A rejected unit action still ends the unit's
/// movement so the driver does not ask again this turn.
pub fn apply_orders(
    store: &mut WorldStore,
    orders: Vec<Order>,
    rng: &mut dyn RngCore,
    events: &mut TurnEvents,
    stats: &mut OrderStats,
) {
    for order in orders {
        let outcome = apply_order(store, order, rng, events);
        if let Outcome::Rejected(reason) = outcome {
            debug!(order = order.label(), reason, "order rejected");
            if let (true, Some(unit)) = (order.is_action(), order.unit()) {
                end_moves(store, unit);
            }
        }
        stats.record(&order, outcome);
    }
}

/// Applies a single order.
pub fn apply_order(
    store: &mut WorldStore,
    order: Order,
    rng: &mut dyn RngCore,
    events: &mut TurnEvents,
) -> Outcome {
    if let Some(unit) = order.unit() {
        if store.unit(unit).is_none() {
            return Outcome::Rejected("unknown unit");
        }
    }

    match order {
        Order::FoundCity { unit } => found_city(store, unit, events),
        Order::BuildRoad { unit } => improve(store, unit, Improvement::Road),
        Order::BuildIrrigation { unit } => improve(store, unit, Improvement::Irrigation),
        Order::BuildMine { unit } => improve(store, unit, Improvement::Mine),
        Order::Pillage { unit } => pillage(store, unit),
        Order::Move { unit, delta } => move_unit(store, unit, delta, rng, events),
        Order::Disband { unit } => {
            store.remove_unit(unit);
            Outcome::Applied
        }
        Order::Fortify { unit } => {
            if let Some(u) = store.unit_mut(unit) {
                u.fortified = true;
                u.moves_left = 0;
            }
            Outcome::Applied
        }
        Order::SkipTurn { unit } | Order::ClearMoves { unit } => {
            end_moves(store, unit);
            Outcome::Applied
        }
        Order::SetGoto { unit, destination } => {
            if let Some(u) = store.unit_mut(unit) {
                u.goto = destination;
            }
            Outcome::Applied
        }
        Order::SetProduction { city, production } => match store.city_mut(city) {
            Some(c) => {
                c.production = Some(production);
                Outcome::Applied
            }
            None => Outcome::Rejected("unknown city"),
        },
        Order::SetResearch { player, advance } => match store.player_mut(player) {
            Some(p) if p.has_advance(advance) => Outcome::Rejected("advance already known"),
            Some(p) => {
                p.research = Some(advance);
                Outcome::Applied
            }
            None => Outcome::Rejected("unknown player"),
        },
    }
}

fn end_moves(store: &mut WorldStore, unit: UnitId) {
    if let Some(u) = store.unit_mut(unit) {
        u.moves_left = 0;
    }
}

fn found_city(store: &mut WorldStore, unit: UnitId, events: &mut TurnEvents) -> Outcome {
    let Some(settler) = store.unit(unit).cloned() else {
        return Outcome::Rejected("unknown unit");
    };
    if settler.unit_type != UnitType::Settlers {
        return Outcome::Rejected("only settlers found cities");
    }
    let Some(city) = store.found_city(settler.owner, settler.position) else {
        return Outcome::Rejected("tile cannot hold a city");
    };
    store.remove_unit(unit);
    debug!(%city, owner = %settler.owner, at = %settler.position, "city founded");
    events.push(SimEvent::CityFounded {
        turn: store.turn(),
        city,
        owner: settler.owner,
        at: settler.position,
    });
    Outcome::Applied
}

#[derive(Debug, Clone, Copy)]
enum Improvement {
    Road,
    Irrigation,
    Mine,
}

fn improve(store: &mut WorldStore, unit: UnitId, improvement: Improvement) -> Outcome {
    let Some(at) = store.unit(unit).map(|u| u.position) else {
        return Outcome::Rejected("unknown unit");
    };
    let irrigable = store.allows_irrigation(at);
    let Some(tile) = store.tile_mut(at) else {
        return Outcome::Rejected("off the map");
    };
    if tile.is_ocean() {
        return Outcome::Rejected("cannot improve ocean");
    }

    match improvement {
        Improvement::Road if tile.road => return Outcome::Rejected("road already built"),
        Improvement::Road => tile.road = true,
        Improvement::Irrigation => {
            if !tile.terrain.benefits_from_irrigation() || !irrigable {
                return Outcome::Rejected("irrigation not possible here");
            }
            tile.irrigation = true;
            tile.mine = false;
        }
        Improvement::Mine => {
            if tile.terrain != Terrain::Hills {
                return Outcome::Rejected("mines need hills");
            }
            tile.mine = true;
            tile.irrigation = false;
        }
    }
    end_moves(store, unit);
    Outcome::Applied
}

fn pillage(store: &mut WorldStore, unit: UnitId) -> Outcome {
    let Some(at) = store.unit(unit).map(|u| u.position) else {
        return Outcome::Rejected("unknown unit");
    };
    let Some(tile) = store.tile_mut(at) else {
        return Outcome::Rejected("off the map");
    };
    if tile.mine {
        tile.mine = false;
    } else if tile.irrigation {
        tile.irrigation = false;
    } else {
        return Outcome::Rejected("nothing to pillage");
    }
    end_moves(store, unit);
    Outcome::Applied
}

fn move_unit(
    store: &mut WorldStore,
    unit: UnitId,
    delta: Delta,
    rng: &mut dyn RngCore,
    events: &mut TurnEvents,
) -> Outcome {
    if !store.can_move(unit, delta) {
        return Outcome::Rejected("illegal move");
    }
    let Some(mover) = store.unit(unit).cloned() else {
        return Outcome::Rejected("unknown unit");
    };
    let target = mover.position.offset(delta);

    let has_defenders = store
        .units_at(target)
        .iter()
        .any(|u| u.owner != mover.owner);
    if has_defenders {
        attack(store, &mover, target, rng, events);
        return Outcome::Applied;
    }

    if let Some(city) = store.city_at(target) {
        capture_city(store, city, mover.owner, events);
    }

    let cost = store.movement_cost(target);
    let hut = store.tile(target).is_some_and(|t| t.hut);
    if let Some(u) = store.unit_mut(unit) {
        u.position = target;
        u.moves_left = u.moves_left.saturating_sub(cost);
        u.fortified = false;
        if u.goto == Some(target) {
            u.goto = None;
        }
    }
    if hut {
        enter_hut(store, &mover, target, rng, events);
    }
    Outcome::Applied
}

/// Strength comparison: the attacker wins with probability
/// `attack / (attack + defense)`.
fn attack(
    store: &mut WorldStore,
    attacker: &Unit,
    target: Point,
    rng: &mut dyn RngCore,
    events: &mut TurnEvents,
) {
    let tile_bonus = store.tile(target).map_or(1, |t| t.defense_bonus());
    let walls = store
        .city_at(target)
        .and_then(|id| store.city(id))
        .is_some_and(|c| c.has_building(Building::CityWalls));
    let in_city = store.city_at(target).is_some();

    let strength = |u: &Unit| {
        let mut defense = u.defense() * tile_bonus;
        if u.fortified {
            defense = defense * 3 / 2;
        }
        if walls {
            defense *= 3;
        }
        defense
    };
    let mut defenders: Vec<(UnitId, PlayerId, i32)> = store
        .units_at(target)
        .iter()
        .filter(|u| u.owner != attacker.owner)
        .map(|&u| (u.id, u.owner, strength(u)))
        .collect();
    // Best defender first; ties keep the lowest id.
    defenders.sort_by(|a, b| b.2.cmp(&a.2));
    let Some(&(defender, defender_owner, defense)) = defenders.first() else {
        return;
    };

    let attack = attacker.attack().max(0);
    let total = attack + defense.max(0);
    let won = total > 0 && rng.gen_range(0..total) < attack;
    let turn = store.turn();

    if won {
        // A city loses one defender per defeat; a stack in the open dies together.
        let losers: Vec<(UnitId, PlayerId)> = if in_city {
            vec![(defender, defender_owner)]
        } else {
            defenders.iter().map(|(id, owner, _)| (*id, *owner)).collect()
        };
        for (id, owner) in losers {
            store.remove_unit(id);
            events.push(SimEvent::UnitDestroyed {
                turn,
                unit: id,
                owner,
                by: Some(attacker.owner),
            });
        }
        end_moves(store, attacker.id);
        debug!(attacker = %attacker.id, %defender, "attack won");
    } else {
        store.remove_unit(attacker.id);
        events.push(SimEvent::UnitDestroyed {
            turn,
            unit: attacker.id,
            owner: attacker.owner,
            by: Some(defender_owner),
        });
        debug!(attacker = %attacker.id, %defender, "attack lost");
    }
}

fn capture_city(store: &mut WorldStore, city: CityId, by: PlayerId, events: &mut TurnEvents) {
    let turn = store.turn();
    let Some(c) = store.city_mut(city) else {
        return;
    };
    if c.owner == by {
        return;
    }
    let from = c.owner;
    c.owner = by;
    c.production = None;
    c.shields = 0;
    info!(%city, name = %c.name, %from, to = %by, "city captured");
    events.push(SimEvent::CityCaptured {
        turn,
        city,
        from,
        to: by,
    });
}

fn enter_hut(
    store: &mut WorldStore,
    unit: &Unit,
    at: Point,
    rng: &mut dyn RngCore,
    events: &mut TurnEvents,
) {
    if let Some(tile) = store.tile_mut(at) {
        tile.hut = false;
    }
    let reward = if unit.owner.is_barbarian() {
        HutReward::Nothing
    } else {
        match rng.gen_range(0..100) {
            0..=39 => {
                match store.available_research(unit.owner).choose(&mut *rng) {
                    Some(&advance) => {
                        learn(store, unit.owner, advance, events);
                        HutReward::Advance(advance)
                    }
                    None => HutReward::Nothing,
                }
            }
            40..=69 => {
                HutReward::Mercenaries(store.spawn_unit(unit.owner, UnitType::Legion, at, None))
            }
            _ => HutReward::Nothing,
        }
    };
    debug!(unit = %unit.id, %at, ?reward, "hut entered");
    events.push(SimEvent::HutEntered {
        turn: store.turn(),
        unit: unit.id,
        at,
        reward,
    });
}

fn learn(store: &mut WorldStore, player: PlayerId, advance: Advance, events: &mut TurnEvents) {
    let turn = store.turn();
    let Some(p) = store.player_mut(player) else {
        return;
    };
    if !p.advances.insert(advance) {
        return;
    }
    if p.research == Some(advance) {
        p.research = None;
    }
    info!("{} of the {} learned {}.", p.leader.name, p.tribe, advance);
    events.push(SimEvent::AdvanceLearned {
        turn,
        player,
        advance,
    });
}

/// Food a city needs to grow from `size`.
pub fn growth_threshold(size: u8) -> u32 {
    (u32::from(size) + 1) * 10
}

/// Closes the turn: cities produce and grow, research advances, every unit
/// gets its movement back, and the turn counter moves on.
pub fn end_turn(store: &mut WorldStore, events: &mut TurnEvents) {
    let turn = store.turn();

    for id in store.city_ids() {
        progress_city(store, id, turn, events);
    }

    let players: Vec<PlayerId> = store
        .players()
        .filter(|p| !p.id.is_barbarian())
        .map(|p| p.id)
        .collect();
    for player in players {
        progress_research(store, player, events);
    }

    for id in store.unit_ids() {
        if let Some(u) = store.unit_mut(id) {
            u.moves_left = u.movement_allowance();
        }
    }
    store.advance_turn();
}

fn progress_city(store: &mut WorldStore, id: CityId, turn: u32, events: &mut TurnEvents) {
    let Some(city) = store.city_mut(id) else {
        return;
    };
    city.shields += 1 + u32::from(city.size) / 2;
    city.food += 2 + u32::from(city.has_building(Building::Granary));
    if city.food >= growth_threshold(city.size) {
        city.size = city.size.saturating_add(1);
        city.food = if city.has_building(Building::Granary) {
            growth_threshold(city.size) / 2
        } else {
            0
        };
        events.push(SimEvent::CityGrew {
            turn,
            city: id,
            size: city.size,
        });
    }

    let Some(production) = city.production else {
        return;
    };
    if city.shields < production.cost() {
        return;
    }
    // Settlers take a citizen with them, so a size-1 city waits.
    if production == Production::Unit(UnitType::Settlers) && city.size <= 1 {
        return;
    }
    city.shields -= production.cost();
    city.production = None;
    let (owner, position) = (city.owner, city.position);

    match production {
        Production::Unit(unit_type) => {
            if unit_type == UnitType::Settlers {
                city.size -= 1;
            }
            let unit = store.spawn_unit(owner, unit_type, position, Some(id));
            debug!(city = %id, %unit, %unit_type, "unit built");
            events.push(SimEvent::UnitBuilt {
                turn,
                city: id,
                unit,
                unit_type,
            });
        }
        Production::Building(building) => {
            city.buildings.insert(building);
            debug!(city = %id, ?building, "building built");
            events.push(SimEvent::BuildingBuilt {
                turn,
                city: id,
                building,
            });
        }
    }
}

fn progress_research(store: &mut WorldStore, player: PlayerId, events: &mut TurnEvents) {
    let bulbs: u32 = store
        .cities()
        .iter()
        .filter(|c| c.owner == player)
        .map(|c| u32::from(c.size))
        .sum();
    let Some(p) = store.player_mut(player) else {
        return;
    };
    p.bulbs += bulbs;
    let Some(advance) = p.research else {
        return;
    };
    let cost = Advance::research_cost(p.advances.len());
    if p.bulbs < cost {
        return;
    }
    p.bulbs -= cost;
    learn(store, player, advance, events);
}

#[cfg(test)]
mod tests {
    use super::*;
    use empire_types::{Difficulty, Leader, Player, Tile};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const ROME: PlayerId = PlayerId(1);
    const ZULU: PlayerId = PlayerId(2);

    fn store() -> WorldStore {
        let tiles = (0..6)
            .flat_map(|y| (0..6).map(move |x| Tile::new(Point::new(x, y), Terrain::Grassland1)))
            .collect();
        let mut store = WorldStore::new(6, 6, tiles, Difficulty::Prince);
        store.add_player(Player::new(ROME, Leader::new("Caesar"), "Romans"));
        store.add_player(Player::new(ZULU, Leader::new("Shaka"), "Zulus"));
        store
    }

    fn apply(store: &mut WorldStore, order: Order) -> (Outcome, Vec<SimEvent>) {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut events = TurnEvents::new();
        let outcome = apply_order(store, order, &mut rng, &mut events);
        (outcome, events.drain())
    }

    #[test]
    fn test_found_city_consumes_settler() {
        let mut store = store();
        let settler = store.spawn_unit(ROME, UnitType::Settlers, Point::new(2, 2), None);

        let (outcome, events) = apply(&mut store, Order::FoundCity { unit: settler });
        assert_eq!(outcome, Outcome::Applied);
        assert!(store.unit(settler).is_none());
        assert!(store.city_at(Point::new(2, 2)).is_some());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), "city_founded");
    }

    #[test]
    fn test_only_settlers_found_cities() {
        let mut store = store();
        let legion = store.spawn_unit(ROME, UnitType::Legion, Point::new(2, 2), None);

        let (outcome, _) = apply(&mut store, Order::FoundCity { unit: legion });
        assert!(matches!(outcome, Outcome::Rejected(_)));
    }

    #[test]
    fn test_improvements_follow_terrain_rules() {
        let mut store = store();
        let settler = store.spawn_unit(ROME, UnitType::Settlers, Point::new(2, 2), None);

        let (outcome, _) = apply(&mut store, Order::BuildIrrigation { unit: settler });
        assert!(matches!(outcome, Outcome::Rejected(_)), "no water nearby");

        if let Some(tile) = store.tile_mut(Point::new(2, 1)) {
            tile.terrain = Terrain::River;
        }
        let (outcome, _) = apply(&mut store, Order::BuildIrrigation { unit: settler });
        assert_eq!(outcome, Outcome::Applied);
        assert!(store.tile(Point::new(2, 2)).is_some_and(|t| t.irrigation));
        assert_eq!(store.unit(settler).map(|u| u.moves_left), Some(0));

        let (outcome, _) = apply(&mut store, Order::BuildMine { unit: settler });
        assert!(matches!(outcome, Outcome::Rejected(_)), "mines need hills");

        let (outcome, _) = apply(&mut store, Order::Pillage { unit: settler });
        assert_eq!(outcome, Outcome::Applied);
        assert!(store.tile(Point::new(2, 2)).is_some_and(|t| !t.irrigation));
    }

    #[test]
    fn test_move_spends_movement_and_reaches_goto() {
        let mut store = store();
        let chariot = store.spawn_unit(ROME, UnitType::Chariot, Point::new(1, 1), None);
        if let Some(u) = store.unit_mut(chariot) {
            u.goto = Some(Point::new(2, 2));
        }

        let (outcome, _) = apply(
            &mut store,
            Order::Move {
                unit: chariot,
                delta: Delta::new(1, 1),
            },
        );
        assert_eq!(outcome, Outcome::Applied);
        let unit = store.unit(chariot).expect("unit survives");
        assert_eq!(unit.position, Point::new(2, 2));
        assert_eq!(unit.moves_left, 1);
        assert!(unit.goto.is_none());
    }

    #[test]
    fn test_entering_empty_enemy_city_captures_it() {
        let mut store = store();
        let city = store.found_city(ZULU, Point::new(3, 3)).expect("city founded");
        let legion = store.spawn_unit(ROME, UnitType::Legion, Point::new(2, 2), None);

        let (_, events) = apply(
            &mut store,
            Order::Move {
                unit: legion,
                delta: Delta::new(1, 1),
            },
        );
        assert_eq!(store.city(city).map(|c| c.owner), Some(ROME));
        assert!(events.iter().any(|e| e.kind() == "city_captured"));
    }

    #[test]
    fn test_combat_removes_exactly_one_side() {
        for seed in 0..20 {
            let mut store = store();
            let legion = store.spawn_unit(ROME, UnitType::Legion, Point::new(2, 2), None);
            let militia = store.spawn_unit(ZULU, UnitType::Militia, Point::new(3, 2), None);
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut events = TurnEvents::new();

            let order = Order::Move {
                unit: legion,
                delta: Delta::new(1, 0),
            };
            assert_eq!(
                apply_order(&mut store, order, &mut rng, &mut events),
                Outcome::Applied
            );
            let survivors = [legion, militia]
                .iter()
                .filter(|id| store.unit(**id).is_some())
                .count();
            assert_eq!(survivors, 1);
            assert_eq!(events.len(), 1);
            // The attacker never advances into the defender's tile.
            if let Some(u) = store.unit(legion) {
                assert_eq!(u.position, Point::new(2, 2));
            }
        }
    }

    #[test]
    fn test_rejected_action_ends_movement() {
        let mut store = store();
        let militia = store.spawn_unit(ROME, UnitType::Militia, Point::new(0, 0), None);
        let mut rng = SmallRng::seed_from_u64(1);
        let mut events = TurnEvents::new();
        let mut stats = OrderStats::new();

        apply_orders(
            &mut store,
            vec![Order::Move {
                unit: militia,
                delta: Delta::new(-1, 0),
            }],
            &mut rng,
            &mut events,
            &mut stats,
        );
        assert_eq!(stats.rejected, 1);
        assert_eq!(store.unit(militia).map(|u| u.moves_left), Some(0));
    }

    #[test]
    fn test_end_turn_completes_production_and_resets_moves() {
        let mut store = store();
        let city = store.found_city(ROME, Point::new(2, 2)).expect("city founded");
        if let Some(c) = store.city_mut(city) {
            c.production = Some(Production::Unit(UnitType::Militia));
            c.shields = 9;
        }
        let unit = store.spawn_unit(ROME, UnitType::Chariot, Point::new(4, 4), None);
        if let Some(u) = store.unit_mut(unit) {
            u.moves_left = 0;
        }
        let mut events = TurnEvents::new();

        end_turn(&mut store, &mut events);

        assert_eq!(store.turn(), 1);
        assert_eq!(store.unit(unit).map(|u| u.moves_left), Some(2));
        assert!(store.city(city).is_some_and(|c| c.production.is_none()));
        let built = store.units_supported_by(city);
        assert_eq!(built.len(), 1);
        assert_eq!(built[0].unit_type, UnitType::Militia);
    }

    #[test]
    fn test_size_one_city_holds_settlers() {
        let mut store = store();
        let city = store.found_city(ROME, Point::new(2, 2)).expect("city founded");
        if let Some(c) = store.city_mut(city) {
            c.production = Some(Production::Unit(UnitType::Settlers));
            c.shields = 100;
        }
        end_turn(&mut store, &mut TurnEvents::new());
        assert!(store.units_supported_by(city).is_empty());

        if let Some(c) = store.city_mut(city) {
            c.size = 2;
        }
        end_turn(&mut store, &mut TurnEvents::new());
        assert_eq!(store.units_supported_by(city).len(), 1);
        assert_eq!(store.city(city).map(|c| c.size), Some(1));
    }

    #[test]
    fn test_research_completes_with_enough_bulbs() {
        let mut store = store();
        store.found_city(ROME, Point::new(2, 2));
        if let Some(p) = store.player_mut(ROME) {
            p.research = Some(Advance::Pottery);
            p.bulbs = 9;
        }
        let mut events = TurnEvents::new();

        end_turn(&mut store, &mut events);

        let player = store.player(ROME).expect("player registered");
        assert!(player.has_advance(Advance::Pottery));
        assert!(player.research.is_none());
        assert_eq!(player.bulbs, 0);
        assert!(events.drain().iter().any(|e| e.kind() == "advance_learned"));
    }
}
