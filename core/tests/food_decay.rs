//! Food decay through the tick pipeline.

use petriverse_core::{
    clock::FixedClock,
    engine::advance,
    environment::create_environment,
    food::{FoodEvent, FoodType},
    rng::RandomSource,
    state::SimulationState,
};

/// Fails every Bernoulli trial the engine rolls.
struct QuietSource;

impl RandomSource for QuietSource {
    fn next_f64(&mut self) -> f64 {
        0.9
    }
}

fn food(id: &str, food_type: FoodType, amount: f64) -> FoodEvent {
    FoodEvent {
        id: id.to_string(),
        food_type,
        created_at: 0,
        amount,
        decay: food_type.decay_rate(),
    }
}

fn state_with_foods(foods: Vec<FoodEvent>) -> SimulationState {
    SimulationState {
        tick: 0.0,
        organisms: Vec::new(),
        predators: Vec::new(),
        foods,
        environment: create_environment(),
        encyclopedia: Vec::new(),
        evolution_log: Vec::new(),
    }
}

#[test]
fn amounts_strictly_decrease_each_tick() {
    let clock = FixedClock::at(0);
    let mut rng = QuietSource;
    let mut state = state_with_foods(vec![food("a", FoodType::High, 60.0)]);

    let mut previous = 60.0;
    for _ in 0..10 {
        state = advance(&state, 1.0, &mut rng, &clock);
        let amount = state.foods[0].amount;
        assert!(amount < previous, "decay must be strict: {amount} >= {previous}");
        previous = amount;
    }
}

#[test]
fn thinned_out_events_disappear() {
    let clock = FixedClock::at(0);
    let mut rng = QuietSource;
    let state = state_with_foods(vec![food("a", FoodType::Low, 1.01)]);

    let next = advance(&state, 1.0, &mut rng, &clock);
    assert!(next.foods.is_empty(), "amounts below 1 must drop out");
}

#[test]
fn toxic_food_decays_faster_than_nutritive_food() {
    let clock = FixedClock::at(0);
    let mut rng = QuietSource;
    let state = state_with_foods(vec![
        food("toxic", FoodType::Toxic, 60.0),
        food("high", FoodType::High, 60.0),
    ]);

    let next = advance(&state, 1.0, &mut rng, &clock);
    let toxic = next.foods.iter().find(|f| f.id == "toxic").expect("toxic");
    let high = next.foods.iter().find(|f| f.id == "high").expect("high");
    assert!(toxic.amount < high.amount);
}

#[test]
fn fractional_deltas_decay_geometrically() {
    let clock = FixedClock::at(0);
    let mut rng = QuietSource;
    let state = state_with_foods(vec![food("a", FoodType::High, 100.0)]);

    let next = advance(&state, 0.5, &mut rng, &clock);
    let expected = 100.0 * (1.0f64 - 0.02).powf(0.5);
    assert!((next.foods[0].amount - expected).abs() < 1e-9);
}
