//! Turn Driver
//!
//! Builds the game world from a scenario and runs one turn per schedule
//! pass: unit decisions, city production, research, then end-of-turn
//! bookkeeping. Every AI decision goes through an [`AiSession`] and every
//! resulting order through the executor.

use std::collections::BTreeMap;

use bevy_ecs::prelude::*;
use empire_ai::{AiConfig, AiRegistry, TurnContext, WorldQuery};
use empire_types::{Leader, OrderQueue, Player, PlayerId, Point, UnitId, UnitType};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::events::{SimEvent, TurnEvents};
use crate::executor::{self, OrderStats};
use crate::mapgen::{generate_map, start_positions};
use crate::scenario::ScenarioConfig;
use crate::store::WorldStore;
use crate::summary::RunSummary;
use crate::SimRng;

/// Engine tuning and the per-player sessions.
#[derive(Resource, Debug, Default)]
pub struct AiState {
    pub config: AiConfig,
    pub registry: AiRegistry,
}

/// Driver rules fixed for the whole game.
#[derive(Resource, Debug, Clone, Copy)]
pub struct TurnSettings {
    /// Decisions a unit may take per turn while it has moves left
    pub decisions_per_unit: u32,
}

/// Running count of events by kind.
#[derive(Resource, Debug, Default, Clone)]
pub struct EventTally {
    pub by_kind: BTreeMap<String, usize>,
}

fn controlled_by_ai(store: &WorldStore, owner: PlayerId) -> bool {
    store.player(owner).is_some_and(|p| p.is_ai())
}

/// Lets every AI unit act, in ascending unit id order. A unit keeps deciding
/// until it runs out of moves, stops producing orders, or reaches the
/// decision limit.
pub fn run_unit_decisions(
    mut store: ResMut<WorldStore>,
    mut ai: ResMut<AiState>,
    mut rng: ResMut<SimRng>,
    mut events: ResMut<TurnEvents>,
    mut stats: ResMut<OrderStats>,
    settings: Res<TurnSettings>,
) {
    let ai = &mut *ai;
    for id in store.unit_ids() {
        let Some(owner) = ready_owner(&store, id) else {
            continue;
        };
        if !controlled_by_ai(&store, owner) {
            continue;
        }
        let session = ai.registry.get_or_create(owner);

        for _ in 0..settings.decisions_per_unit {
            let mut orders = OrderQueue::new();
            {
                let mut ctx = TurnContext::new(&*store, &mut rng.0, &mut orders, &ai.config);
                session.decide_unit(&mut ctx, id);
                if ctx.orders.actions_for(id) == 0 {
                    session.advance_goto(&mut ctx, id);
                }
            }
            if orders.is_empty() {
                break;
            }
            executor::apply_orders(&mut store, orders.drain(), &mut rng.0, &mut events, &mut stats);
            if ready_owner(&store, id).is_none() {
                break;
            }
        }
    }
}

/// Owner of a unit that can still act this turn.
fn ready_owner(store: &WorldStore, id: UnitId) -> Option<PlayerId> {
    let unit = store.unit(id)?;
    (unit.moves_left > 0).then_some(unit.owner)
}

/// Picks production for every idle AI city.
pub fn run_city_production(
    mut store: ResMut<WorldStore>,
    mut ai: ResMut<AiState>,
    mut rng: ResMut<SimRng>,
    mut events: ResMut<TurnEvents>,
    mut stats: ResMut<OrderStats>,
) {
    let ai = &mut *ai;
    let mut orders = OrderQueue::new();
    for id in store.city_ids() {
        let Some(owner) = store.city(id).map(|c| c.owner) else {
            continue;
        };
        if owner.is_barbarian() || !controlled_by_ai(&store, owner) {
            continue;
        }
        let session = ai.registry.get_or_create(owner);
        let mut ctx = TurnContext::new(&*store, &mut rng.0, &mut orders, &ai.config);
        session.decide_city_production(&mut ctx, id);
    }
    executor::apply_orders(&mut store, orders.drain(), &mut rng.0, &mut events, &mut stats);
}

/// Picks research for every AI player without a current goal.
pub fn run_research(
    mut store: ResMut<WorldStore>,
    mut ai: ResMut<AiState>,
    mut rng: ResMut<SimRng>,
    mut events: ResMut<TurnEvents>,
    mut stats: ResMut<OrderStats>,
) {
    let ai = &mut *ai;
    let players: Vec<PlayerId> = store
        .players()
        .filter(|p| p.is_ai() && !p.id.is_barbarian())
        .map(|p| p.id)
        .collect();

    let mut orders = OrderQueue::new();
    for player in players {
        let session = ai.registry.get_or_create(player);
        let mut ctx = TurnContext::new(&*store, &mut rng.0, &mut orders, &ai.config);
        session.decide_research(&mut ctx);
    }
    executor::apply_orders(&mut store, orders.drain(), &mut rng.0, &mut events, &mut stats);
}

/// Production, growth and research progress, then the turn counter.
pub fn run_end_turn(mut store: ResMut<WorldStore>, mut events: ResMut<TurnEvents>) {
    executor::end_turn(&mut store, &mut events);
}

/// Adds this turn's events to the running tally.
pub fn tally_events(events: Res<TurnEvents>, mut tally: ResMut<EventTally>) {
    for event in &events.events {
        *tally.by_kind.entry(event.kind().to_string()).or_default() += 1;
    }
}

/// One full turn, systems in order.
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            run_unit_decisions,
            run_city_production,
            run_research,
            run_end_turn,
            tally_events,
        )
            .chain(),
    );
    schedule
}

/// Creates the ECS world for a scenario: map, players, starting units and
/// every resource the schedule needs.
pub fn build_world(scenario: &ScenarioConfig, seed: u64) -> World {
    let mut rng = SmallRng::seed_from_u64(seed);
    let map = &scenario.map;
    let tiles = generate_map(map, &mut rng);
    let mut store = WorldStore::new(map.width, map.height, tiles, scenario.game.difficulty);

    let players = scenario.players();
    let starts = start_positions(store.tiles(), players.len(), map.start_spacing, &mut rng);
    if starts.len() < players.len() {
        warn!(
            wanted = players.len(),
            found = starts.len(),
            "not enough start positions, some civilizations start without units"
        );
    }

    for (index, player) in players.into_iter().enumerate() {
        let id = player.id;
        debug!(%id, tribe = %player.tribe, "adding civilization");
        store.add_player(player);
        if let Some(&start) = starts.get(index) {
            store.spawn_unit(id, UnitType::Settlers, start, None);
            store.spawn_unit(id, UnitType::Militia, start, None);
        }
    }

    store.add_player(Player::new(
        PlayerId::BARBARIAN,
        Leader::new("Barbarian Chief"),
        "Barbarians",
    ));
    let lairs = barbarian_lairs(&store, &starts, scenario, &mut rng);
    for at in lairs {
        store.spawn_unit(PlayerId::BARBARIAN, UnitType::Legion, at, None);
    }

    let mut world = World::new();
    world.insert_resource(store);
    world.insert_resource(SimRng(rng));
    world.insert_resource(AiState {
        config: scenario.ai.clone(),
        registry: AiRegistry::new(),
    });
    world.insert_resource(TurnSettings {
        decisions_per_unit: scenario.game.decisions_per_unit,
    });
    world.insert_resource(TurnEvents::new());
    world.insert_resource(OrderStats::new());
    world.insert_resource(EventTally::default());
    world
}

/// Random land tiles far enough from every start position.
fn barbarian_lairs(
    store: &WorldStore,
    starts: &[Point],
    scenario: &ScenarioConfig,
    rng: &mut SmallRng,
) -> Vec<Point> {
    let spacing = scenario.map.start_spacing;
    let mut candidates: Vec<Point> = store
        .tiles()
        .iter()
        .filter(|t| !t.is_ocean() && !t.hut)
        .map(|t| t.position)
        .filter(|p| starts.iter().all(|s| s.distance(*p) >= spacing))
        .collect();

    let mut lairs = Vec::new();
    while lairs.len() < scenario.game.barbarians as usize && !candidates.is_empty() {
        let index = rng.gen_range(0..candidates.len());
        lairs.push(candidates.swap_remove(index));
    }
    lairs
}

/// A game in progress.
pub struct Simulation {
    world: World,
    schedule: Schedule,
    seed: u64,
}

impl Simulation {
    pub fn new(scenario: &ScenarioConfig, seed: u64) -> Self {
        info!(seed, civilizations = scenario.civilizations.len(), "building world");
        Self {
            world: build_world(scenario, seed),
            schedule: build_schedule(),
            seed,
        }
    }

    /// Plays one turn and returns the events it produced.
    pub fn step(&mut self) -> Vec<SimEvent> {
        self.schedule.run(&mut self.world);
        self.world.resource_mut::<TurnEvents>().drain()
    }

    /// Plays `turns` turns.
    pub fn run(&mut self, turns: u32) {
        for _ in 0..turns {
            self.step();
        }
    }

    /// Number of completed turns.
    pub fn turn(&self) -> u32 {
        self.store().turn()
    }

    pub fn store(&self) -> &WorldStore {
        self.world.resource::<WorldStore>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::collect(
            self.seed,
            self.store(),
            self.world.resource::<EventTally>(),
            self.world.resource::<OrderStats>(),
        )
    }
}
