//! The dish environment: four clamped parameters plus at most one
//! transient event.
//!
//! RULE: every external mutation goes through `clamp_environment`.
//! The tick engine's event effects carry their own caps and are applied
//! as-is.

use crate::types::TimestampMs;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentEvent {
    pub name: String,
    pub expires_at: TimestampMs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub temperature: f64,
    pub oxygen: f64,
    pub acidity: f64,
    pub mutation_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EnvironmentEvent>,
}

/// A partial update from the adjust-environment command. Missing fields
/// keep their current value; the merged result is always re-clamped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentAdjustment {
    pub temperature: Option<f64>,
    pub oxygen: Option<f64>,
    pub acidity: Option<f64>,
    pub mutation_rate: Option<f64>,
}

impl Environment {
    pub fn adjusted(&self, adjustment: &EnvironmentAdjustment) -> Environment {
        clamp_environment(&Environment {
            temperature: adjustment.temperature.unwrap_or(self.temperature),
            oxygen: adjustment.oxygen.unwrap_or(self.oxygen),
            acidity: adjustment.acidity.unwrap_or(self.acidity),
            mutation_rate: adjustment.mutation_rate.unwrap_or(self.mutation_rate),
            event: self.event.clone(),
        })
    }
}

/// The baseline dish: 26 °C, oxygen 0.8, pH 7, mutation rate 0.1.
pub fn create_environment() -> Environment {
    Environment {
        temperature: 26.0,
        oxygen: 0.8,
        acidity: 7.0,
        mutation_rate: 0.1,
        event: None,
    }
}

/// Saturate every parameter into its valid range. The event, if any,
/// passes through unchanged.
pub fn clamp_environment(environment: &Environment) -> Environment {
    Environment {
        temperature: environment.temperature.clamp(5.0, 40.0),
        oxygen: environment.oxygen.clamp(0.0, 1.0),
        acidity: environment.acidity.clamp(0.0, 14.0),
        mutation_rate: environment.mutation_rate.clamp(0.01, 0.5),
        event: environment.event.clone(),
    }
}

/// An axis's comfort band: penalty grows with distance from the optimum.
pub struct AxisBand {
    pub optimal: f64,
    pub range: f64,
}

pub const TEMPERATURE_BAND: AxisBand = AxisBand {
    optimal: 26.0,
    range: 15.0,
};
pub const OXYGEN_BAND: AxisBand = AxisBand {
    optimal: 0.85,
    range: 0.6,
};
pub const ACIDITY_BAND: AxisBand = AxisBand {
    optimal: 7.0,
    range: 3.0,
};
