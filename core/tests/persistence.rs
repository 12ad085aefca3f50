//! Load/save contract: tolerant restore, wholesale round trips and the
//! corrupt-state fallback.

use petriverse_core::{
    clock::FixedClock,
    config::FOUNDER_COUNT,
    rng::PcgSource,
    session::SimSession,
    store::SimStore,
};
use std::fs;
use std::path::PathBuf;

fn migrated_in_memory() -> SimStore {
    let store = SimStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn temp_db(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("petriverse-{}-{}.db", name, std::process::id()))
}

#[test]
fn store_round_trips_a_payload() {
    let store = migrated_in_memory();
    assert!(store.load_state().expect("query").is_none());
    store.save_state("{\"tick\": 1.0}", 123).expect("save");
    store.save_state("{\"tick\": 2.0}", 456).expect("overwrite");
    assert_eq!(
        store.load_state().expect("query").as_deref(),
        Some("{\"tick\": 2.0}")
    );
}

#[test]
fn session_round_trips_the_full_state() {
    let path = temp_db("roundtrip");
    let _ = fs::remove_file(&path);
    let db = path.to_string_lossy().to_string();

    let saved = {
        let store = SimStore::open(&db).expect("open");
        store.migrate().expect("migration");
        let mut session =
            SimSession::with_parts(store, PcgSource::seeded(11), FixedClock::at(1_000))
                .expect("session");
        session.advance(1.0);
        session.advance(0.5);
        session.feed_with_type(petriverse_core::food::FoodType::Low, 30.0);
        serde_json::to_string(session.state()).expect("serialize")
    };

    let store = SimStore::open(&db).expect("reopen");
    store.migrate().expect("migration");
    let session = SimSession::with_parts(store, PcgSource::seeded(99), FixedClock::at(2_000))
        .expect("session");
    let loaded = serde_json::to_string(session.state()).expect("serialize");

    assert_eq!(loaded, saved, "reload must reproduce the exact state");
    let _ = fs::remove_file(&path);
}

#[test]
fn corrupt_payload_falls_back_to_a_fresh_dish() {
    let store = migrated_in_memory();
    store.save_state("definitely not json", 0).expect("save");
    let session = SimSession::with_parts(store, PcgSource::seeded(3), FixedClock::at(0))
        .expect("open must not fail");
    assert_eq!(session.state().tick, 0.0);
    assert_eq!(session.state().organisms.len(), FOUNDER_COUNT);
}

#[test]
fn missing_fields_are_backfilled_from_the_initial_state() {
    let store = migrated_in_memory();
    store.save_state("{\"tick\": 5.5}", 0).expect("save");
    let session = SimSession::with_parts(store, PcgSource::seeded(3), FixedClock::at(0))
        .expect("session");
    let state = session.state();
    assert_eq!(state.tick, 5.5, "present fields load as written");
    assert_eq!(state.organisms.len(), FOUNDER_COUNT, "missing fields backfill");
    assert_eq!(state.environment.temperature, 26.0);
    assert!(!state.encyclopedia.is_empty());
}

#[test]
fn loaded_environment_is_reclamped() {
    let store = migrated_in_memory();
    store
        .save_state(
            "{\"environment\": {\"temperature\": 900.0, \"oxygen\": -2.0, \
             \"acidity\": 7.0, \"mutationRate\": 0.1}}",
            0,
        )
        .expect("save");
    let session = SimSession::with_parts(store, PcgSource::seeded(3), FixedClock::at(0))
        .expect("session");
    assert_eq!(session.state().environment.temperature, 40.0);
    assert_eq!(session.state().environment.oxygen, 0.0);
}

#[test]
fn reset_replaces_the_state_with_a_fresh_dish() {
    let store = migrated_in_memory();
    let mut session = SimSession::with_parts(store, PcgSource::seeded(5), FixedClock::at(0))
        .expect("session");
    for _ in 0..50 {
        session.advance(1.0);
    }
    assert!(session.state().tick > 0.0);

    session.reset();
    let state = session.state();
    assert_eq!(state.tick, 0.0);
    assert_eq!(state.organisms.len(), FOUNDER_COUNT);
    assert!(state.predators.is_empty());
    assert!(state.foods.is_empty());
    assert!(state.evolution_log.is_empty());
    assert_eq!(state.encyclopedia.len(), 1, "only the baseline entry");
}
