//! The command API: a thin holder around the pure tick engine.
//!
//! RULES:
//!   - Each command reads the current state, computes the next state and
//!     replaces it in one step. Partial updates are never observable.
//!   - Persistence is fire-and-forget. A failed write is logged and the
//!     session keeps going; a crash loses at most the latest transition.
//!   - The engine stays stateless; the session owns the state, the store
//!     and the injected capabilities.

use crate::{
    clock::{Clock, SystemClock},
    encyclopedia::{self, toggle_favorite, upsert_discovery, EncyclopediaEntry},
    engine,
    environment::EnvironmentAdjustment,
    error::SimResult,
    food::{create_food_event, FoodEvent, FoodType},
    history::{prepend_entries, EvolutionEvent, Tone},
    rng::{PcgSource, RandomSource},
    state::{self, SimulationState},
    store::SimStore,
    types::Seconds,
};
use serde::{Deserialize, Serialize};

/// The interactive surface as data, so hosts can drive a session from a
/// wire protocol. Variants mirror the session methods one-to-one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum SimCommand {
    Advance {
        delta: Seconds,
    },
    Feed {
        food_type: FoodType,
        amount: f64,
    },
    AdjustEnvironment {
        #[serde(flatten)]
        adjustment: EnvironmentAdjustment,
    },
    RegisterDiscovery {
        entry: EncyclopediaEntry,
    },
    ToggleFavorite {
        id: String,
    },
    Reset,
}

pub struct SimSession<R: RandomSource, C: Clock> {
    state: SimulationState,
    store: SimStore,
    rng: R,
    clock: C,
}

impl SimSession<PcgSource, SystemClock> {
    /// Production wiring: seeded PCG randomness and the system clock.
    pub fn open(store: SimStore, seed: u64) -> SimResult<Self> {
        Self::with_parts(store, PcgSource::seeded(seed), SystemClock)
    }
}

impl<R: RandomSource, C: Clock> SimSession<R, C> {
    /// Open a session over the store with explicit capabilities. Loads
    /// the saved snapshot if one exists; a corrupt snapshot falls back
    /// to a fresh initial state and never fails the open.
    pub fn with_parts(store: SimStore, mut rng: R, clock: C) -> SimResult<Self> {
        let state = match store.load_state()? {
            Some(json) => match state::restore(&json, &mut rng, &clock) {
                Ok(state) => state,
                Err(e) => {
                    log::warn!("saved state unreadable, starting fresh: {e}");
                    state::initial_state(&mut rng, &clock)
                }
            },
            None => state::initial_state(&mut rng, &clock),
        };
        let mut session = Self {
            state,
            store,
            rng,
            clock,
        };
        session.persist();
        Ok(session)
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Advance the ecosystem by `delta` simulated seconds.
    pub fn advance(&mut self, delta: Seconds) {
        let next = engine::advance(&self.state, delta, &mut self.rng, &self.clock);
        self.replace(next);
    }

    /// Scatter a food event into the dish and log which type went in.
    pub fn feed(&mut self, food: FoodEvent) {
        let entry = EvolutionEvent {
            id: food.id.clone(),
            message: format!("The keeper scattered {} food.", food.food_type.label()),
            created_at: self.clock.now_ms(),
            generation: 0,
            // Observed tone mapping: toxic reads as environment, the
            // nutritive types as mutation.
            tone: if food.food_type == FoodType::Toxic {
                Tone::Environment
            } else {
                Tone::Mutation
            },
        };
        let mut next = self.state.clone();
        next.foods.insert(0, food);
        next.evolution_log = prepend_entries(vec![entry], &self.state.evolution_log);
        self.replace(next);
    }

    /// Build a food event through the factory, then feed it.
    pub fn feed_with_type(&mut self, food_type: FoodType, amount: f64) {
        let food = create_food_event(&mut self.rng, &self.clock, food_type, amount);
        self.feed(food);
    }

    /// Merge the partial adjustment into the environment and re-clamp.
    /// Out-of-range values saturate silently.
    pub fn adjust_environment(&mut self, adjustment: &EnvironmentAdjustment) {
        let mut next = self.state.clone();
        next.environment = self.state.environment.adjusted(adjustment);
        self.replace(next);
    }

    /// Upsert into the encyclopedia (idempotent on id) and log the
    /// discovery.
    pub fn register_discovery(&mut self, entry: EncyclopediaEntry) {
        let log_entry = EvolutionEvent {
            id: entry.id.clone(),
            message: format!("{} was added to the encyclopedia.", entry.name),
            created_at: entry.discovered_at,
            generation: 0,
            tone: Tone::Discovery,
        };
        let mut next = self.state.clone();
        upsert_discovery(&mut next.encyclopedia, entry);
        next.evolution_log = prepend_entries(vec![log_entry], &self.state.evolution_log);
        self.replace(next);
    }

    /// Flip the favorite flag on an entry. Unknown ids are a no-op.
    pub fn toggle_favorite(&mut self, id: &str) {
        let mut next = self.state.clone();
        if toggle_favorite(&mut next.encyclopedia, id) {
            self.replace(next);
        }
    }

    /// Replace the state with a fresh dish and persist it immediately.
    pub fn reset(&mut self) {
        let next = state::initial_state(&mut self.rng, &self.clock);
        self.replace(next);
    }

    /// Register a whole exported encyclopedia. The payload is validated
    /// up front; on failure nothing is registered. Returns the number of
    /// records offered (already-known ids stay untouched).
    pub fn import_encyclopedia(&mut self, json: &str) -> SimResult<usize> {
        let entries = encyclopedia::parse_import(json, &self.clock)?;
        let count = entries.len();
        for entry in entries {
            self.register_discovery(entry);
        }
        Ok(count)
    }

    pub fn export_encyclopedia(&self) -> SimResult<String> {
        encyclopedia::export_json(&self.state.encyclopedia)
    }

    /// Dispatch a wire command to the matching session method.
    pub fn apply(&mut self, command: SimCommand) {
        match command {
            SimCommand::Advance { delta } => self.advance(delta),
            SimCommand::Feed { food_type, amount } => self.feed_with_type(food_type, amount),
            SimCommand::AdjustEnvironment { adjustment } => self.adjust_environment(&adjustment),
            SimCommand::RegisterDiscovery { entry } => self.register_discovery(entry),
            SimCommand::ToggleFavorite { id } => self.toggle_favorite(&id),
            SimCommand::Reset => self.reset(),
        }
    }

    /// Swap in the next state, then persist it. The swap always wins;
    /// persistence failure only costs durability of this transition.
    fn replace(&mut self, next: SimulationState) {
        self.state = next;
        self.persist();
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.state) {
            Ok(json) => {
                if let Err(e) = self.store.save_state(&json, self.clock.now_ms()) {
                    log::warn!("failed to persist state: {e}");
                }
            }
            Err(e) => log::warn!("failed to serialize state: {e}"),
        }
    }
}
