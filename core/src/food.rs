//! Food events: nutrition scattered into the dish, decaying over time.

use crate::{
    clock::Clock,
    ident::short_id,
    rng::RandomSource,
    types::{EntityId, TimestampMs},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodType {
    High,
    Low,
    Toxic,
}

impl FoodType {
    /// Energy effect per second at full concentration. Toxic is negative.
    pub fn energy_effect(&self) -> f64 {
        match self {
            Self::High => 25.0,
            Self::Low => 12.0,
            Self::Toxic => -18.0,
        }
    }

    /// Fraction of the amount lost per simulated second.
    pub fn decay_rate(&self) -> f64 {
        match self {
            Self::Toxic => 0.05,
            Self::High | Self::Low => 0.02,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "high-nutrition",
            Self::Low => "low-nutrition",
            Self::Toxic => "toxic",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodEvent {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub food_type: FoodType,
    pub created_at: TimestampMs,
    pub amount: f64,
    /// Fraction lost per second, fixed at creation from the type.
    pub decay: f64,
}

pub fn create_food_event<R: RandomSource + ?Sized>(
    rng: &mut R,
    clock: &dyn Clock,
    food_type: FoodType,
    amount: f64,
) -> FoodEvent {
    FoodEvent {
        id: short_id(rng),
        food_type,
        created_at: clock.now_ms(),
        amount,
        decay: food_type.decay_rate(),
    }
}
