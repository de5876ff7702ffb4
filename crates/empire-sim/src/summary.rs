//! Run Summary
//!
//! End-of-run report written as JSON: per-player totals, event counts by
//! kind and the order tally.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use empire_ai::WorldQuery;
use empire_types::PlayerId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::executor::OrderStats;
use crate::store::WorldStore;
use crate::turn::EventTally;

/// Errors that can occur while writing a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub leader: String,
    pub tribe: String,
    pub human: bool,
    pub cities: usize,
    /// Total citizens across the player's cities
    pub population: u32,
    pub units: usize,
    pub advances: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub turns: u32,
    pub players: Vec<PlayerSummary>,
    pub events: BTreeMap<String, usize>,
    pub orders: OrderStats,
}

impl RunSummary {
    pub fn collect(seed: u64, store: &WorldStore, tally: &EventTally, orders: &OrderStats) -> Self {
        let players = store
            .players()
            .map(|p| {
                let cities: Vec<_> = store
                    .cities()
                    .into_iter()
                    .filter(|c| c.owner == p.id)
                    .collect();
                PlayerSummary {
                    id: p.id,
                    leader: p.leader.name.clone(),
                    tribe: p.tribe.clone(),
                    human: p.human,
                    cities: cities.len(),
                    population: cities.iter().map(|c| u32::from(c.size)).sum(),
                    units: store.units().iter().filter(|u| u.owner == p.id).count(),
                    advances: p.advances.len(),
                }
            })
            .collect();

        Self {
            seed,
            turns: store.turn(),
            players,
            events: tally.by_kind.clone(),
            orders: orders.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, SummaryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the summary as pretty JSON to `path`.
    pub fn write(&self, path: &Path) -> Result<(), SummaryError> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
