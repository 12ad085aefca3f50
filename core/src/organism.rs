//! Organisms: the heritable-trait population the whole dish revolves around.

use crate::{
    clock::Clock,
    food::FoodType,
    ident::short_id,
    rng::{pick, RandomSource},
    types::{EntityId, TimestampMs, Vec2},
};
use serde::{Deserialize, Serialize};

const SHAPES: [Shape; 3] = [Shape::Circle, Shape::Amoeba, Shape::Spike];
const COLORS: [&str; 5] = ["#7ef9c8", "#81d4fa", "#ff80ab", "#fff176", "#ce93d8"];
const FOOD_PREFERENCES: [FoodType; 3] = [FoodType::High, FoodType::Low, FoodType::Toxic];

/// Fraction by which each numeric trait may drift per mutation.
const TRAIT_DRIFT: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Amoeba,
    Spike,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Feeding,
    Evading,
    Mutating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganismTraits {
    pub speed: f64,
    pub fertility: f64,
    pub resilience: f64,
    pub preferred_food: FoodType,
    pub color: String,
    pub shape: Shape,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organism {
    pub id: EntityId,
    /// 1 for founders, parent generation + 1 for offspring.
    pub generation: u32,
    pub age: f64,
    pub lifespan: f64,
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f64,
    pub energy: f64,
    pub traits: OrganismTraits,
    pub status: Status,
    pub discovered_at: TimestampMs,
}

/// Construction inputs. Defaults produce a founder at a random position.
pub struct OrganismParams {
    pub position: Option<Vec2>,
    pub generation: u32,
    pub parent_traits: Option<OrganismTraits>,
}

impl Default for OrganismParams {
    fn default() -> Self {
        Self {
            position: None,
            generation: 1,
            parent_traits: None,
        }
    }
}

pub fn create_organism<R: RandomSource + ?Sized>(
    rng: &mut R,
    clock: &dyn Clock,
    params: OrganismParams,
) -> Organism {
    let traits = match params.parent_traits {
        Some(parent) => mutate_traits(rng, &parent),
        None => OrganismTraits {
            speed: rng.in_range(10.0, 30.0),
            fertility: rng.in_range(0.2, 0.6),
            resilience: rng.in_range(0.2, 1.0),
            preferred_food: *pick(rng, &FOOD_PREFERENCES),
            color: pick(rng, &COLORS).to_string(),
            shape: *pick(rng, &SHAPES),
        },
    };

    let position = params
        .position
        .unwrap_or_else(|| Vec2::new(rng.in_range(50.0, 550.0), rng.in_range(50.0, 350.0)));
    let velocity = Vec2::new(
        rng.in_range(-traits.speed, traits.speed),
        rng.in_range(-traits.speed, traits.speed),
    );

    Organism {
        id: short_id(rng),
        generation: params.generation,
        age: 0.0,
        lifespan: rng.in_range(60.0, 200.0),
        position,
        velocity,
        size: rng.in_range(8.0, 18.0),
        energy: rng.in_range(50.0, 100.0),
        traits,
        status: Status::Idle,
        discovered_at: clock.now_ms(),
    }
}

/// Derive a drifted copy of a trait set. Numeric traits move by up to
/// ±15 % of their current value and are clamped to their floor/ceiling;
/// categorical traits resample with a fixed probability.
pub fn mutate_traits<R: RandomSource + ?Sized>(
    rng: &mut R,
    traits: &OrganismTraits,
) -> OrganismTraits {
    let mut drift = |value: f64, min: f64, max: f64| {
        (value + rng.in_range(-TRAIT_DRIFT, TRAIT_DRIFT) * value).clamp(min, max)
    };

    let speed = drift(traits.speed, 5.0, 40.0);
    let fertility = drift(traits.fertility, 0.1, 0.9);
    let resilience = drift(traits.resilience, 0.1, 1.5);

    let preferred_food = if rng.chance(0.25) {
        *pick(rng, &FOOD_PREFERENCES)
    } else {
        traits.preferred_food
    };
    let shape = if rng.chance(0.2) {
        *pick(rng, &SHAPES)
    } else {
        traits.shape
    };
    let color = if rng.chance(0.2) {
        pick(rng, &COLORS).to_string()
    } else {
        traits.color.clone()
    };

    OrganismTraits {
        speed,
        fertility,
        resilience,
        preferred_food,
        shape,
        color,
    }
}
