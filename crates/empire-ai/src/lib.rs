//! Empire AI: per-turn decisions for computer-controlled players.
//!
//! The engine reads the world through the [`WorldQuery`] trait and never
//! mutates it. Every decision appends intents to an [`OrderQueue`] that the
//! caller applies afterwards, and all randomness comes from the generator the
//! caller lends in through a [`TurnContext`].
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐  TurnContext   ┌───────────┐   Order intents   ┌──────────┐
//! │ turn driver│ ─────────────▶ │ AiSession │ ────────────────▶ │ executor │
//! └────────────┘                └───────────┘                   └──────────┘
//!                                     │
//!            dispatcher ─▶ settlement / improvement / combat / navigator
//!            production, research
//! ```
//!
//! # Modules
//!
//! - [`world`]: The read-only World Query Surface
//! - [`evaluator`]: Tile scoring and proximity queries
//! - [`dispatcher`]: Role-based routing of unit decisions
//! - [`settlement`], [`improvement`], [`combat`], [`navigator`]: Unit policies
//! - [`production`], [`research`]: City and player policies
//! - [`hooks`]: Capabilities this ruleset leaves undecided
//! - [`session`]: Per-player sessions and their registry
//! - [`config`]: TOML-backed tuning constants
//!
//! [`OrderQueue`]: empire_types::OrderQueue

pub mod combat;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod evaluator;
pub mod hooks;
pub mod improvement;
pub mod navigator;
pub mod production;
pub mod research;
pub mod session;
pub mod settlement;
pub mod world;

#[cfg(test)]
mod testing;

// Re-export config types
pub use config::{
    default_config_toml, AiConfig, CombatConfig, ConfigError, ExpansionRule, ExpansionTable,
    ImprovementConfig, LimitsConfig, NavigatorConfig, ProductionConfig, SettlementConfig,
    TomlSerializeError,
};

// Re-export decision plumbing
pub use context::TurnContext;
pub use session::{AiRegistry, AiSession};
pub use world::WorldQuery;

// Re-export evaluator types
pub use evaluator::{ImprovementBonus, NearestCity};
pub use hooks::Capability;
pub use navigator::NavigatorMode;
