//! Simulation tunables.
//!
//! Every constant the tick engine and the factories depend on lives here,
//! so a balancing pass touches one file.

use crate::types::Seconds;

// ── Arena ──────────────────────────────────────────────────────────
pub const ARENA_WIDTH: f64 = 640.0;
pub const ARENA_HEIGHT: f64 = 400.0;
/// Inner margin organisms bounce against.
pub const ORGANISM_MARGIN: f64 = 20.0;
/// Inner margin predators bounce against.
pub const PREDATOR_MARGIN: f64 = 30.0;

// ── Frame loop ─────────────────────────────────────────────────────
/// Hosts clamp the frame delta to this before calling advance, so a
/// stalled driver cannot produce a physically implausible jump.
pub const MAX_FRAME_DELTA: Seconds = 1.5;

// ── Energy economy ─────────────────────────────────────────────────
/// Base metabolic cost per simulated second.
pub const METABOLIC_COST: f64 = 1.2;
pub const ENERGY_MIN: f64 = -40.0;
pub const ENERGY_MAX: f64 = 160.0;
/// Below this (pre-clamp) the organism dies.
pub const DEATH_ENERGY: f64 = -20.0;

// ── Predators ──────────────────────────────────────────────────────
/// Within this distance an organism starts evading and bleeds energy.
pub const PREDATOR_DETECTION_RADIUS: f64 = 80.0;
/// Energy drained per second while a predator is close.
pub const PREDATOR_PRESSURE: f64 = 8.0;
/// Predator step scale per second of delta.
pub const PREDATOR_STEP_SCALE: f64 = 0.4;
/// Live predator cap; spawning stops at this count.
pub const PREDATOR_CAP: usize = 2;
/// Spawn probability per second while below the cap.
pub const PREDATOR_SPAWN_CHANCE: f64 = 0.02;

// ── Organism movement ──────────────────────────────────────────────
pub const ORGANISM_STEP_SCALE: f64 = 0.25;
/// The speed trait's contribution to the effective step size.
pub const ORGANISM_SPEED_STEP: f64 = 0.008;

// ── Reproduction and mutation ──────────────────────────────────────
/// Energy an organism must exceed before it can reproduce.
pub const REPRODUCTION_ENERGY_GATE: f64 = 120.0;
/// Hard cap on the per-tick reproduction probability.
pub const REPRODUCTION_CHANCE_CAP: f64 = 0.8;
/// Offspring are placed within this jitter of the parent.
pub const OFFSPRING_JITTER: f64 = 25.0;
pub const ORGANISM_SIZE_MIN: f64 = 6.0;
pub const ORGANISM_SIZE_MAX: f64 = 22.0;

// ── Environment events ─────────────────────────────────────────────
/// Trigger probability per second while no event is active.
pub const EVENT_TRIGGER_CHANCE: f64 = 0.01;
/// How long a triggered event stays active, in milliseconds.
pub const EVENT_DURATION_MS: i64 = 60_000;

// ── Bookkeeping ────────────────────────────────────────────────────
/// The evolution log keeps only this many most-recent entries.
pub const MAX_LOG_ENTRIES: usize = 40;
/// Founder organisms created for a fresh dish.
pub const FOUNDER_COUNT: usize = 18;
