//! SQLite persistence layer.
//!
//! RULE: only store.rs talks to the database. The session writes the
//! whole serialized state into a single slot after every command and
//! reads it back at startup. Nothing else lives here.

use crate::{error::SimResult, types::TimestampMs};
use rusqlite::{params, Connection, OptionalExtension};

pub struct SimStore {
    conn: Connection,
}

impl SimStore {
    /// Open (or create) the simulation database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    /// Upsert the serialized state into slot 0.
    pub fn save_state(&self, payload: &str, saved_at: TimestampMs) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO sim_state (slot, payload, saved_at) VALUES (0, ?1, ?2)
             ON CONFLICT(slot) DO UPDATE SET
                 payload = excluded.payload,
                 saved_at = excluded.saved_at",
            params![payload, saved_at],
        )?;
        Ok(())
    }

    /// The saved state payload, if any run has been persisted before.
    pub fn load_state(&self) -> SimResult<Option<String>> {
        let payload = self
            .conn
            .query_row("SELECT payload FROM sim_state WHERE slot = 0", [], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(payload)
    }
}
