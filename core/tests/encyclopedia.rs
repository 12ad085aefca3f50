//! Encyclopedia invariants: first-write-wins upserts, favorites and the
//! bulk exchange format.

use petriverse_core::{
    clock::FixedClock,
    encyclopedia::{
        export_json, parse_import, toggle_favorite, upsert_discovery, Category, DetailValue,
        EncyclopediaEntry,
    },
    error::SimError,
    rng::PcgSource,
    session::SimSession,
    store::SimStore,
};
use std::collections::BTreeMap;

fn entry(id: &str, name: &str) -> EncyclopediaEntry {
    EncyclopediaEntry {
        id: id.to_string(),
        name: name.to_string(),
        category: Category::Organism,
        description: "A test sighting.".to_string(),
        discovered_at: 42,
        thumbnail: None,
        details: BTreeMap::from([("speed".to_string(), DetailValue::from("12.0"))]),
        favorite: false,
        conditions: None,
    }
}

fn session() -> SimSession<PcgSource, FixedClock> {
    let store = SimStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    SimSession::with_parts(store, PcgSource::seeded(7), FixedClock::at(5_000)).expect("session")
}

#[test]
fn upsert_is_idempotent_per_id() {
    let mut entries = Vec::new();
    assert!(upsert_discovery(&mut entries, entry("a", "First sighting")));
    assert!(!upsert_discovery(&mut entries, entry("a", "Renamed sighting")));
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "First sighting", "first write wins");
}

#[test]
fn new_entries_go_in_front() {
    let mut entries = Vec::new();
    upsert_discovery(&mut entries, entry("a", "A"));
    upsert_discovery(&mut entries, entry("b", "B"));
    assert_eq!(entries[0].id, "b");
    assert_eq!(entries[1].id, "a");
}

#[test]
fn toggle_favorite_flips_and_ignores_unknown_ids() {
    let mut entries = vec![entry("a", "A")];
    assert!(toggle_favorite(&mut entries, "a"));
    assert!(entries[0].favorite);
    assert!(toggle_favorite(&mut entries, "a"));
    assert!(!entries[0].favorite);
    assert!(!toggle_favorite(&mut entries, "nope"));
}

#[test]
fn import_backfills_missing_discovery_time() {
    let clock = FixedClock::at(9_000);
    let json = r#"[
        {"id": "x", "name": "X", "category": "organism", "description": "d"},
        {"id": "y", "name": "Y", "category": "event", "description": "d", "discoveredAt": 77}
    ]"#;
    let rows = parse_import(json, &clock).expect("valid payload");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].discovered_at, 9_000);
    assert_eq!(rows[1].discovered_at, 77);
}

#[test]
fn malformed_import_is_rejected_wholesale() {
    let clock = FixedClock::at(0);
    let result = parse_import(r#"{"not": "an array"}"#, &clock);
    assert!(matches!(result, Err(SimError::ImportRejected(_))));
}

#[test]
fn session_import_registers_nothing_on_failure() {
    let mut session = session();
    let before = session.state().encyclopedia.len();
    let result = session.import_encyclopedia("[{\"id\": \"broken\"");
    assert!(result.is_err());
    assert_eq!(session.state().encyclopedia.len(), before);
}

#[test]
fn session_import_registers_and_logs_each_record() {
    let mut session = session();
    let before = session.state().encyclopedia.len();
    let json = r#"[
        {"id": "imp-1", "name": "One", "category": "organism", "description": "d"},
        {"id": "imp-2", "name": "Two", "category": "predator", "description": "d"}
    ]"#;
    let count = session.import_encyclopedia(json).expect("valid payload");
    assert_eq!(count, 2);
    assert_eq!(session.state().encyclopedia.len(), before + 2);
    assert!(session
        .state()
        .evolution_log
        .iter()
        .any(|e| e.message.contains("One")));
}

#[test]
fn export_then_import_round_trips() {
    let clock = FixedClock::at(0);
    let entries = vec![entry("a", "A"), entry("b", "B")];
    let json = export_json(&entries).expect("export");
    let back = parse_import(&json, &clock).expect("reimport");
    assert_eq!(back, entries);
}
