//! Environment clamp and adjustment tests.

use petriverse_core::environment::{
    clamp_environment, create_environment, Environment, EnvironmentAdjustment, EnvironmentEvent,
};

fn in_bounds(env: &Environment) {
    assert!(
        (5.0..=40.0).contains(&env.temperature),
        "temperature out of range: {}",
        env.temperature
    );
    assert!(
        (0.0..=1.0).contains(&env.oxygen),
        "oxygen out of range: {}",
        env.oxygen
    );
    assert!(
        (0.0..=14.0).contains(&env.acidity),
        "acidity out of range: {}",
        env.acidity
    );
    assert!(
        (0.01..=0.5).contains(&env.mutation_rate),
        "mutation rate out of range: {}",
        env.mutation_rate
    );
}

#[test]
fn baseline_is_already_valid() {
    let env = create_environment();
    assert_eq!(clamp_environment(&env), env);
}

#[test]
fn clamp_saturates_any_finite_input() {
    let extremes = [
        Environment {
            temperature: 1e9,
            oxygen: 1e9,
            acidity: 1e9,
            mutation_rate: 1e9,
            event: None,
        },
        Environment {
            temperature: -1e9,
            oxygen: -1e9,
            acidity: -1e9,
            mutation_rate: -1e9,
            event: None,
        },
        Environment {
            temperature: 0.0,
            oxygen: 0.5,
            acidity: 20.0,
            mutation_rate: 0.0,
            event: None,
        },
    ];
    for env in &extremes {
        in_bounds(&clamp_environment(env));
    }
}

#[test]
fn clamp_passes_the_event_through() {
    let env = Environment {
        event: Some(EnvironmentEvent {
            name: "Micrometeorite shower".to_string(),
            expires_at: 1234,
        }),
        ..create_environment()
    };
    let clamped = clamp_environment(&env);
    assert_eq!(clamped.event, env.event);
}

#[test]
fn adjustment_merges_and_reclamps() {
    let env = create_environment();
    let adjusted = env.adjusted(&EnvironmentAdjustment {
        temperature: Some(99.0),
        oxygen: None,
        acidity: Some(-3.0),
        mutation_rate: None,
    });
    assert_eq!(adjusted.temperature, 40.0);
    assert_eq!(adjusted.oxygen, env.oxygen);
    assert_eq!(adjusted.acidity, 0.0);
    assert_eq!(adjusted.mutation_rate, env.mutation_rate);
    in_bounds(&adjusted);
}
