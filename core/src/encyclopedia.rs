//! The encyclopedia: a permanent, deduplicated record of everything the
//! keeper has observed.
//!
//! RULE: ids are unique and first write wins. Re-registering an id is a
//! no-op, so discovery entries never get overwritten by later sightings.

use crate::{
    clock::Clock,
    error::{SimError, SimResult},
    types::{EntityId, TimestampMs},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Organism,
    Predator,
    Event,
    Environment,
}

/// A rendered detail value. Producers decide per category which keys
/// exist and whether a value reads better as text or as a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailValue {
    Number(f64),
    Text(String),
}

impl From<f64> for DetailValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for DetailValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DetailValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncyclopediaEntry {
    pub id: EntityId,
    pub name: String,
    pub category: Category,
    pub description: String,
    pub discovered_at: TimestampMs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub details: BTreeMap<String, DetailValue>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
}

/// Prepend the entry unless its id is already present.
/// Returns true when the entry was inserted.
pub fn upsert_discovery(entries: &mut Vec<EncyclopediaEntry>, entry: EncyclopediaEntry) -> bool {
    if entries.iter().any(|item| item.id == entry.id) {
        return false;
    }
    entries.insert(0, entry);
    true
}

/// Flip the favorite flag on the matching entry. Unknown ids are a no-op.
pub fn toggle_favorite(entries: &mut [EncyclopediaEntry], id: &str) -> bool {
    match entries.iter_mut().find(|item| item.id == id) {
        Some(entry) => {
            entry.favorite = !entry.favorite;
            true
        }
        None => false,
    }
}

/// Import payload row: `discoveredAt` may be absent and is stamped with
/// the current time at import.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedEntry {
    id: EntityId,
    name: String,
    category: Category,
    description: String,
    discovered_at: Option<TimestampMs>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    details: BTreeMap<String, DetailValue>,
    #[serde(default)]
    favorite: bool,
    #[serde(default)]
    conditions: Option<String>,
}

/// Parse a bulk-import payload. The whole batch is validated up front;
/// a malformed document yields `ImportRejected` and nothing is registered.
pub fn parse_import(json: &str, clock: &dyn Clock) -> SimResult<Vec<EncyclopediaEntry>> {
    let rows: Vec<ImportedEntry> =
        serde_json::from_str(json).map_err(|e| SimError::ImportRejected(e.to_string()))?;
    let now = clock.now_ms();
    Ok(rows
        .into_iter()
        .map(|row| EncyclopediaEntry {
            id: row.id,
            name: row.name,
            category: row.category,
            description: row.description,
            discovered_at: row.discovered_at.unwrap_or(now),
            thumbnail: row.thumbnail,
            details: row.details,
            favorite: row.favorite,
            conditions: row.conditions,
        })
        .collect())
}

/// The whole encyclopedia as a pretty-printed JSON array.
pub fn export_json(entries: &[EncyclopediaEntry]) -> SimResult<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}
