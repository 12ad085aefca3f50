//! The tick engine — the heart of PetriVerse.
//!
//! PIPELINE ORDER (fixed, documented, never reordered):
//!   1. Food decay
//!   2. Predator aging and movement
//!   3. Per-organism update (energy, movement, predation, death,
//!      reproduction, spontaneous mutation)
//!   4. Environment event lifecycle
//!   5. Predator spawning
//!   6. Aggregation (organisms, log, tick counter)
//!
//! RULES:
//!   - `advance` is a pure function of the previous state, the delta and
//!     the injected capabilities. It holds no state of its own.
//!   - The previous state is never mutated; a new aggregate is built.
//!   - All randomness flows through the injected `RandomSource`.
//!   - No reachable input may panic: numeric edges saturate via clamps.

use crate::{
    clock::Clock,
    config::{
        ARENA_HEIGHT, ARENA_WIDTH, DEATH_ENERGY, ENERGY_MAX, ENERGY_MIN, EVENT_DURATION_MS,
        EVENT_TRIGGER_CHANCE, METABOLIC_COST, OFFSPRING_JITTER, ORGANISM_MARGIN,
        ORGANISM_SIZE_MAX, ORGANISM_SIZE_MIN, ORGANISM_SPEED_STEP, ORGANISM_STEP_SCALE,
        PREDATOR_CAP, PREDATOR_DETECTION_RADIUS, PREDATOR_MARGIN, PREDATOR_PRESSURE,
        PREDATOR_SPAWN_CHANCE, PREDATOR_STEP_SCALE, REPRODUCTION_CHANCE_CAP,
        REPRODUCTION_ENERGY_GATE,
    },
    encyclopedia::{upsert_discovery, Category, DetailValue, EncyclopediaEntry},
    environment::{
        Environment, EnvironmentEvent, ACIDITY_BAND, OXYGEN_BAND, TEMPERATURE_BAND,
    },
    food::{FoodEvent, FoodType},
    history::{prepend_entries, EvolutionEvent, Tone},
    ident::short_id,
    organism::{create_organism, mutate_traits, Organism, OrganismParams, Status},
    predator::{create_predator, Behavior, Predator},
    rng::{pick, RandomSource},
    state::SimulationState,
    types::{Seconds, Vec2},
};
use std::collections::BTreeMap;

/// Advance the ecosystem by `delta` simulated seconds.
///
/// Callers are expected to pre-clamp `delta` to a sane maximum (see
/// `config::MAX_FRAME_DELTA`); the engine itself tolerates any
/// non-negative value without failing.
pub fn advance<R: RandomSource + ?Sized>(
    prev: &SimulationState,
    delta: Seconds,
    rng: &mut R,
    clock: &dyn Clock,
) -> SimulationState {
    let now = clock.now_ms();

    // 1. Food decay.
    let foods: Vec<FoodEvent> = prev
        .foods
        .iter()
        .filter_map(|food| decay_food(food, delta))
        .collect();

    // 2. Predator aging and movement. Departure entries come first in
    // this tick's slice of the log.
    let mut entries: Vec<EvolutionEvent> = Vec::new();
    let mut predators: Vec<Predator> = Vec::new();
    for predator in &prev.predators {
        let age = predator.age + delta;
        if age > predator.lifespan {
            entries.push(EvolutionEvent {
                id: short_id(rng),
                message: departure_message(predator.behavior).to_string(),
                created_at: now,
                generation: 0,
                tone: Tone::Predation,
            });
            continue;
        }
        let scale = delta * PREDATOR_STEP_SCALE;
        let (x, vx) = bounce(
            predator.position.x,
            predator.velocity.x,
            scale,
            PREDATOR_MARGIN,
            ARENA_WIDTH - PREDATOR_MARGIN,
        );
        let (y, vy) = bounce(
            predator.position.y,
            predator.velocity.y,
            scale,
            PREDATOR_MARGIN,
            ARENA_HEIGHT - PREDATOR_MARGIN,
        );
        predators.push(Predator {
            age,
            position: Vec2::new(x, y),
            velocity: Vec2::new(vx, vy),
            ..predator.clone()
        });
    }

    // 3. Per-organism update. Parents are processed in order; offspring
    // are collected separately and never participate in this tick.
    let mut encyclopedia = prev.encyclopedia.clone();
    let mut survivors: Vec<Organism> = Vec::new();
    let mut offspring: Vec<Organism> = Vec::new();

    for organism in &prev.organisms {
        let age = organism.age + delta;
        let mut energy = organism.energy - METABOLIC_COST * delta
            + food_energy(organism, &foods, delta)
            + environmental_pressure(organism, &prev.environment, delta);
        let (pressure, mut status) = predator_pressure(organism, &predators, delta);
        energy += pressure;

        let scale = delta * ORGANISM_STEP_SCALE + organism.traits.speed * ORGANISM_SPEED_STEP;
        let (x, vx) = bounce(
            organism.position.x,
            organism.velocity.x,
            scale,
            ORGANISM_MARGIN,
            ARENA_WIDTH - ORGANISM_MARGIN,
        );
        let (y, vy) = bounce(
            organism.position.y,
            organism.velocity.y,
            scale,
            ORGANISM_MARGIN,
            ARENA_HEIGHT - ORGANISM_MARGIN,
        );
        let position = Vec2::new(x, y);

        // Predation ends processing for this organism outright.
        let caught = predators
            .iter()
            .any(|p| p.position.distance_to(&position) < p.size * 0.5 + organism.size);
        if caught {
            entries.push(EvolutionEvent {
                id: short_id(rng),
                message: format!(
                    "A generation {} organism was devoured by a predator.",
                    organism.generation
                ),
                created_at: now,
                generation: organism.generation,
                tone: Tone::Predation,
            });
            continue;
        }

        if age > organism.lifespan || energy < DEATH_ENERGY {
            entries.push(EvolutionEvent {
                id: short_id(rng),
                message: format!(
                    "A generation {} organism reached the end of its lifespan.",
                    organism.generation
                ),
                created_at: now,
                generation: organism.generation,
                tone: Tone::Environment,
            });
            continue;
        }

        // Reproduction: gated on energy, scaled by fertility and oxygen.
        let reproduction_chance =
            organism.traits.fertility * (1.0 + prev.environment.oxygen) * delta;
        if energy > REPRODUCTION_ENERGY_GATE
            && rng.chance(reproduction_chance.min(REPRODUCTION_CHANCE_CAP))
        {
            let jitter_x = rng.in_range(-OFFSPRING_JITTER, OFFSPRING_JITTER);
            let jitter_y = rng.in_range(-OFFSPRING_JITTER, OFFSPRING_JITTER);
            let inherited = mutate_traits(rng, &organism.traits);
            let child = create_organism(
                rng,
                clock,
                OrganismParams {
                    position: Some(Vec2::new(x + jitter_x, y + jitter_y)),
                    generation: organism.generation + 1,
                    parent_traits: Some(inherited),
                },
            );
            status = Status::Mutating;
            upsert_discovery(&mut encyclopedia, generation_discovery(&child, now));
            entries.push(EvolutionEvent {
                id: short_id(rng),
                message: format!(
                    "A mutation has produced a brand-new generation {}!",
                    child.generation
                ),
                created_at: now,
                generation: child.generation,
                tone: Tone::Mutation,
            });
            offspring.push(child);
        }

        // Spontaneous mutation, independent of reproduction.
        let mut traits = organism.traits.clone();
        let mut size = organism.size;
        if rng.chance(prev.environment.mutation_rate * delta * 0.5) {
            let mutated = mutate_traits(rng, &organism.traits);
            entries.push(EvolutionEvent {
                id: short_id(rng),
                message: "An organism reshaped its traits to fit the environment.".to_string(),
                created_at: now,
                generation: organism.generation,
                tone: Tone::Mutation,
            });
            upsert_discovery(
                &mut encyclopedia,
                mutation_discovery(rng, organism.generation, &mutated, now),
            );
            size = (size + rng.in_range(-1.5, 1.5)).clamp(ORGANISM_SIZE_MIN, ORGANISM_SIZE_MAX);
            traits = mutated;
        }

        survivors.push(Organism {
            id: organism.id.clone(),
            generation: organism.generation,
            age,
            lifespan: organism.lifespan,
            position,
            velocity: Vec2::new(vx, vy),
            size,
            energy: energy.clamp(ENERGY_MIN, ENERGY_MAX),
            traits,
            status,
            discovered_at: organism.discovered_at,
        });
    }

    // 4. Environment event lifecycle: at most one active event; an
    // expired event clears without re-triggering in the same tick.
    let mut environment = prev.environment.clone();
    if environment.event.is_none() {
        if rng.chance(EVENT_TRIGGER_CHANCE * delta) {
            let selected = pick(rng, &EVENT_CATALOGUE);
            environment = (selected.apply)(&environment);
            environment.event = Some(EnvironmentEvent {
                name: selected.name.to_string(),
                expires_at: now + EVENT_DURATION_MS,
            });
            log::debug!("environment event triggered: {}", selected.name);
            upsert_discovery(&mut encyclopedia, event_discovery(selected, &environment, now));
            entries.push(EvolutionEvent {
                id: short_id(rng),
                message: selected.message.to_string(),
                created_at: now,
                generation: 0,
                tone: selected.tone,
            });
        }
    } else if environment
        .event
        .as_ref()
        .map_or(false, |event| event.expires_at < now)
    {
        environment.event = None;
    }

    // 5. Predator spawning, capped at the live-predator limit.
    if predators.len() < PREDATOR_CAP && rng.chance(PREDATOR_SPAWN_CHANCE * delta) {
        let predator = create_predator(rng, clock);
        log::debug!("predator spawned: {}", predator.behavior.label());
        upsert_discovery(&mut encyclopedia, predator_discovery(&predator, now));
        entries.push(EvolutionEvent {
            id: predator.id.clone(),
            message: arrival_message(predator.behavior).to_string(),
            created_at: now,
            generation: 0,
            tone: Tone::Predation,
        });
        predators.push(predator);
    }

    // 6. Aggregation: parents keep their original order, offspring
    // follow in creation order.
    survivors.extend(offspring);

    SimulationState {
        tick: prev.tick + delta,
        organisms: survivors,
        predators,
        foods,
        environment,
        encyclopedia,
        evolution_log: prepend_entries(entries, &prev.evolution_log),
    }
}

/// Geometric decay; events that thin out below 1 disappear.
fn decay_food(food: &FoodEvent, delta: Seconds) -> Option<FoodEvent> {
    let amount = food.amount * (1.0 - food.decay).powf(delta);
    if amount < 1.0 {
        return None;
    }
    Some(FoodEvent {
        amount,
        ..food.clone()
    })
}

/// Net energy from every food event in the dish. Nutritive food scales
/// with preference affinity and concentration; toxic food always hurts,
/// though a toxic preference confers partial tolerance.
fn food_energy(organism: &Organism, foods: &[FoodEvent], delta: Seconds) -> f64 {
    let mut shift = 0.0;
    for food in foods {
        let effect = food.food_type.energy_effect();
        if food.food_type == FoodType::Toxic {
            let tolerated = organism.traits.preferred_food == FoodType::Toxic;
            shift += if tolerated { effect * 0.3 } else { effect } * delta;
        } else {
            let affinity = if organism.traits.preferred_food == food.food_type {
                1.0
            } else {
                0.4
            };
            shift += effect * affinity * (food.amount / 60.0) * delta;
        }
    }
    shift
}

/// Damage from drifting away from each axis's comfort band, damped by
/// resilience. Never positive.
fn environmental_pressure(
    organism: &Organism,
    environment: &Environment,
    delta: Seconds,
) -> f64 {
    let temperature =
        (environment.temperature - TEMPERATURE_BAND.optimal).abs() / TEMPERATURE_BAND.range;
    let oxygen = (environment.oxygen - OXYGEN_BAND.optimal).abs() / OXYGEN_BAND.range;
    let acidity = (environment.acidity - ACIDITY_BAND.optimal).abs() / ACIDITY_BAND.range;
    let damping = 1.0 - organism.traits.resilience * 0.6;
    -(temperature + oxygen + acidity) * 4.0 * damping * delta
}

/// Energy drain and evasion status when any predator is close.
fn predator_pressure(
    organism: &Organism,
    predators: &[Predator],
    delta: Seconds,
) -> (f64, Status) {
    let closest = predators
        .iter()
        .map(|p| p.position.distance_to(&organism.position))
        .fold(f64::INFINITY, f64::min);
    if closest < PREDATOR_DETECTION_RADIUS {
        (-PREDATOR_PRESSURE * delta, Status::Evading)
    } else {
        (0.0, Status::Idle)
    }
}

/// Reflective boundary handling. A coordinate that would leave the bound
/// is mirrored back inside and the velocity sign flips on that axis;
/// the magnitude is kept.
fn bounce(value: f64, velocity: f64, step_scale: f64, min: f64, max: f64) -> (f64, f64) {
    let mut next = value + velocity * step_scale;
    let mut next_velocity = velocity;
    if next < min {
        next = min + (min - next);
        next_velocity = velocity.abs();
    } else if next > max {
        next = max - (next - max);
        next_velocity = -velocity.abs();
    }
    (next.clamp(min, max), next_velocity)
}

fn departure_message(behavior: Behavior) -> &'static str {
    match behavior {
        Behavior::Agile => "The agile predator tore away like a passing storm.",
        Behavior::Lurker => "The lurking predator slipped quietly out of sight.",
    }
}

fn arrival_message(behavior: Behavior) -> &'static str {
    match behavior {
        Behavior::Agile => "An agile predator burst in with a ripple!",
        Behavior::Lurker => "A lurking predator appeared, casting a long shadow.",
    }
}

/// One catalogue entry per possible environment event. The effect
/// carries its own caps and is applied outside the usual clamp.
struct CatalogueEvent {
    name: &'static str,
    tone: Tone,
    message: &'static str,
    apply: fn(&Environment) -> Environment,
}

static EVENT_CATALOGUE: [CatalogueEvent; 2] = [
    CatalogueEvent {
        name: "Micrometeorite shower",
        tone: Tone::Environment,
        message: "Micrometeorites rained down and the mutation rate climbed.",
        apply: |env| Environment {
            mutation_rate: (env.mutation_rate + 0.05).min(0.4),
            ..env.clone()
        },
    },
    CatalogueEvent {
        name: "Invasive species incursion",
        tone: Tone::Predation,
        message: "An invasive species slipped in and oxygen levels dropped.",
        apply: |env| Environment {
            oxygen: (env.oxygen - 0.1).max(0.3),
            ..env.clone()
        },
    },
];

/// Keyed by generation number: later offspring of the same generation do
/// not re-register.
fn generation_discovery(child: &Organism, now: i64) -> EncyclopediaEntry {
    EncyclopediaEntry {
        id: format!("organism-gen-{}", child.generation),
        name: format!("Generation {} strain", child.generation),
        category: Category::Organism,
        description: "A new lineage born from mutation.".to_string(),
        discovered_at: now,
        thumbnail: None,
        details: BTreeMap::from([
            (
                "speed".to_string(),
                DetailValue::from(format!("{:.1}", child.traits.speed)),
            ),
            (
                "resilience".to_string(),
                DetailValue::from(format!("{:.2}", child.traits.resilience)),
            ),
            (
                "preference".to_string(),
                DetailValue::from(child.traits.preferred_food.label()),
            ),
        ]),
        favorite: false,
        conditions: Some(format!("Observed generation {}", child.generation)),
    }
}

/// Keyed uniquely per occurrence; every spontaneous mutation registers.
fn mutation_discovery<R: RandomSource + ?Sized>(
    rng: &mut R,
    generation: u32,
    traits: &crate::organism::OrganismTraits,
    now: i64,
) -> EncyclopediaEntry {
    EncyclopediaEntry {
        id: format!("mutation-{}", short_id(rng)),
        name: "Trait mutation".to_string(),
        category: Category::Event,
        description: "A record of traits reshaped under environmental pressure.".to_string(),
        discovered_at: now,
        thumbnail: None,
        details: BTreeMap::from([
            ("generation".to_string(), DetailValue::from(generation as f64)),
            (
                "speed".to_string(),
                DetailValue::from(format!("{:.1}", traits.speed)),
            ),
            (
                "resilience".to_string(),
                DetailValue::from(format!("{:.2}", traits.resilience)),
            ),
        ]),
        favorite: false,
        conditions: Some("Spontaneous mutation event".to_string()),
    }
}

fn event_discovery(
    selected: &CatalogueEvent,
    environment: &Environment,
    now: i64,
) -> EncyclopediaEntry {
    EncyclopediaEntry {
        id: format!("event-{}", selected.name),
        name: selected.name.to_string(),
        category: Category::Event,
        description: "A record of the environment lurching off balance.".to_string(),
        discovered_at: now,
        thumbnail: None,
        details: BTreeMap::from([
            (
                "mutationRate".to_string(),
                DetailValue::from(format!("{:.2}", environment.mutation_rate)),
            ),
            (
                "oxygen".to_string(),
                DetailValue::from(format!("{:.2}", environment.oxygen)),
            ),
        ]),
        favorite: false,
        conditions: Some("Event triggered".to_string()),
    }
}

fn predator_discovery(predator: &Predator, now: i64) -> EncyclopediaEntry {
    EncyclopediaEntry {
        id: format!("predator-{}", predator.behavior.label()),
        name: match predator.behavior {
            Behavior::Agile => "Agile predator".to_string(),
            Behavior::Lurker => "Lurking predator".to_string(),
        },
        category: Category::Predator,
        description: "A natural hunter that appears in the dish.".to_string(),
        discovered_at: now,
        thumbnail: None,
        details: BTreeMap::from([
            (
                "lifespan".to_string(),
                DetailValue::from(format!("{:.0}", predator.lifespan)),
            ),
            (
                "behavior".to_string(),
                DetailValue::from(predator.behavior.label()),
            ),
            (
                "size".to_string(),
                DetailValue::from(format!("{:.0}", predator.size)),
            ),
        ]),
        favorite: false,
        conditions: Some("Predator appeared".to_string()),
    }
}
