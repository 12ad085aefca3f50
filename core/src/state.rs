//! The simulation aggregate: the unit of persistence and the sole
//! argument and return value of the tick engine.
//!
//! RULE: a `SimulationState` is never mutated in place. Every transition
//! produces a new aggregate value, so concurrent readers always observe
//! a complete snapshot.

use crate::{
    clock::Clock,
    config::FOUNDER_COUNT,
    encyclopedia::{DetailValue, Category, EncyclopediaEntry},
    environment::{clamp_environment, create_environment, Environment},
    food::FoodEvent,
    history::EvolutionEvent,
    organism::{create_organism, Organism, OrganismParams},
    predator::Predator,
    rng::RandomSource,
    types::Seconds,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationState {
    /// Monotonically increasing by delta; not a fixed-duration counter.
    pub tick: Seconds,
    pub organisms: Vec<Organism>,
    pub predators: Vec<Predator>,
    pub foods: Vec<FoodEvent>,
    pub environment: Environment,
    pub encyclopedia: Vec<EncyclopediaEntry>,
    pub evolution_log: Vec<EvolutionEvent>,
}

/// The entry every fresh dish starts out with.
fn baseline_discovery(clock: &dyn Clock) -> EncyclopediaEntry {
    EncyclopediaEntry {
        id: "baseline-environment".to_string(),
        name: "Baseline environment".to_string(),
        category: Category::Environment,
        description: "A standard dish at 26 \u{b0}C, oxygen 0.8 and pH 7.".to_string(),
        discovered_at: clock.now_ms(),
        thumbnail: None,
        details: BTreeMap::from([
            ("temperature".to_string(), DetailValue::from("26 \u{b0}C")),
            ("oxygen".to_string(), DetailValue::from("0.8")),
            ("pH".to_string(), DetailValue::from(7.0)),
        ]),
        favorite: false,
        conditions: Some("Initial state".to_string()),
    }
}

/// A fresh dish: founder organisms, baseline environment, empty log.
pub fn initial_state<R: RandomSource + ?Sized>(rng: &mut R, clock: &dyn Clock) -> SimulationState {
    SimulationState {
        tick: 0.0,
        organisms: (0..FOUNDER_COUNT)
            .map(|_| create_organism(rng, clock, OrganismParams::default()))
            .collect(),
        predators: Vec::new(),
        foods: Vec::new(),
        environment: create_environment(),
        encyclopedia: vec![baseline_discovery(clock)],
        evolution_log: Vec::new(),
    }
}

/// Serialized layout with every top-level field optional, so documents
/// written by older versions still load.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartialState {
    tick: Option<Seconds>,
    organisms: Option<Vec<Organism>>,
    predators: Option<Vec<Predator>>,
    foods: Option<Vec<FoodEvent>>,
    environment: Option<Environment>,
    encyclopedia: Option<Vec<EncyclopediaEntry>>,
    evolution_log: Option<Vec<EvolutionEvent>>,
}

/// Restore a persisted state. Missing top-level fields are backfilled
/// from a fresh initial state and the environment is always re-clamped.
/// A document that does not parse at all is an error; callers fall back
/// to `initial_state`.
pub fn restore<R: RandomSource + ?Sized>(
    json: &str,
    rng: &mut R,
    clock: &dyn Clock,
) -> serde_json::Result<SimulationState> {
    let partial: PartialState = serde_json::from_str(json)?;
    let fallback = initial_state(rng, clock);
    Ok(SimulationState {
        tick: partial.tick.unwrap_or(fallback.tick),
        organisms: partial.organisms.unwrap_or(fallback.organisms),
        predators: partial.predators.unwrap_or(fallback.predators),
        foods: partial.foods.unwrap_or(fallback.foods),
        environment: clamp_environment(&partial.environment.unwrap_or(fallback.environment)),
        encyclopedia: partial.encyclopedia.unwrap_or(fallback.encyclopedia),
        evolution_log: partial.evolution_log.unwrap_or(fallback.evolution_log),
    })
}
