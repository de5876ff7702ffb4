//! Empire Simulation Driver
//!
//! Hosts the AI engine in a small but complete game: a seeded map, a world
//! store answering the engine's queries, an executor applying its orders,
//! and a bevy_ecs schedule that plays one turn per run.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod events;
pub mod executor;
pub mod mapgen;
pub mod scenario;
pub mod store;
pub mod summary;
pub mod turn;

pub use events::{HutReward, SimEvent, TurnEvents};
pub use executor::{apply_order, apply_orders, end_turn, OrderStats, Outcome};
pub use scenario::{CivilizationConfig, GameSettings, MapSettings, ScenarioConfig, ScenarioError};
pub use store::WorldStore;
pub use summary::{PlayerSummary, RunSummary, SummaryError};
pub use turn::{build_schedule, build_world, AiState, EventTally, Simulation, TurnSettings};

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);
