//! The evolution log: a capped, newest-first record of what happened.

use crate::{
    config::MAX_LOG_ENTRIES,
    types::{EntityId, TimestampMs},
};
use serde::{Deserialize, Serialize};

/// Presentation grouping for a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Mutation,
    Predation,
    Environment,
    Discovery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionEvent {
    pub id: EntityId,
    pub message: String,
    pub created_at: TimestampMs,
    /// 0 for entries not tied to a lineage.
    pub generation: u32,
    pub tone: Tone,
}

/// New entries go in front of the old log; only the most recent
/// `MAX_LOG_ENTRIES` survive.
pub fn prepend_entries(
    new_entries: Vec<EvolutionEvent>,
    previous: &[EvolutionEvent],
) -> Vec<EvolutionEvent> {
    let mut log = new_entries;
    log.extend_from_slice(previous);
    log.truncate(MAX_LOG_ENTRIES);
    log
}
