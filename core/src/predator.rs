//! Predators: short-lived hunters that roam the dish.

use crate::{
    clock::Clock,
    ident::short_id,
    rng::{pick, RandomSource},
    types::{EntityId, TimestampMs, Vec2},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
    Agile,
    Lurker,
}

impl Behavior {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Agile => "agile",
            Self::Lurker => "lurker",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Predator {
    pub id: EntityId,
    /// Fixes the speed and lifespan distribution at creation.
    pub behavior: Behavior,
    pub age: f64,
    pub lifespan: f64,
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f64,
    pub spawn_time: TimestampMs,
}

pub fn create_predator<R: RandomSource + ?Sized>(rng: &mut R, clock: &dyn Clock) -> Predator {
    let behavior = *pick(rng, &[Behavior::Agile, Behavior::Lurker]);
    let size = rng.in_range(40.0, 65.0);
    // Agile hunters are faster but burn out sooner.
    let speed = match behavior {
        Behavior::Agile => rng.in_range(40.0, 70.0),
        Behavior::Lurker => rng.in_range(15.0, 35.0),
    };
    let lifespan = match behavior {
        Behavior::Agile => rng.in_range(30.0, 60.0),
        Behavior::Lurker => rng.in_range(90.0, 140.0),
    };

    Predator {
        id: short_id(rng),
        behavior,
        age: 0.0,
        lifespan,
        position: Vec2::new(rng.in_range(80.0, 520.0), rng.in_range(60.0, 340.0)),
        velocity: Vec2::new(rng.in_range(-speed, speed), rng.in_range(-speed, speed)),
        size,
        spawn_time: clock.now_ms(),
    }
}
