//! Suppression store: acknowledged and snoozed alert keys.
//!
//! Two key-value maps persisted in SQLite. Acknowledgments never expire;
//! snoozes lapse once the stored instant passes. A store that cannot be
//! opened or read degrades to "no suppressions" rather than failing the
//! computation pass.

use crate::types::{MS_PER_DAY, now_ms};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::warn;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS acknowledged (
    key TEXT PRIMARY KEY,
    acknowledged_at INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS snoozed (
    key TEXT PRIMARY KEY,
    snoozed_until INTEGER NOT NULL
);
";

/// Persistent store of suppressed alert keys.
#[derive(Clone)]
pub struct SuppressionStore {
    conn: Arc<Mutex<Connection>>,
}

impl SuppressionStore {
    /// Open or create the store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout=5000;",
        )?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory store (for testing and as the degraded fallback).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open the store at `path`, degrading to an empty in-memory store when
    /// the file is missing a usable schema, corrupt, or unopenable.
    pub fn open_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::open(&path) {
            Ok(store) => store,
            Err(err) => {
                warn!(
                    path = %path.as_ref().display(),
                    error = %err,
                    "suppression store unusable; continuing without suppressions"
                );
                Self::open_in_memory().expect("in-memory store")
            }
        }
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().unwrap();
        f(&conn)
    }

    /// Permanently suppress a key. Idempotent; repeating refreshes the
    /// timestamp (last writer wins).
    pub fn acknowledge(&self, key: &str) -> Result<()> {
        let at = now_ms();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO acknowledged (key, acknowledged_at) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET acknowledged_at = ?2",
                params![key, at],
            )?;
            Ok(())
        })
    }

    /// Suppress a key until `now + days`. Idempotent; repeating overwrites
    /// the expiry.
    pub fn snooze(&self, key: &str, days: i64) -> Result<()> {
        self.snooze_until(key, now_ms() + days * MS_PER_DAY)
    }

    /// Suppress a key until an explicit instant.
    pub fn snooze_until(&self, key: &str, until: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO snoozed (key, snoozed_until) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET snoozed_until = ?2",
                params![key, until],
            )?;
            Ok(())
        })
    }

    /// Whether a key is currently suppressed: acknowledged, or snoozed past
    /// `now`. Read errors degrade to "not suppressed".
    pub fn is_suppressed(&self, key: &str, now: i64) -> bool {
        let result = self.with_conn(|conn| {
            let acked: Option<i64> = conn
                .query_row(
                    "SELECT acknowledged_at FROM acknowledged WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            if acked.is_some() {
                return Ok(true);
            }

            let until: Option<i64> = conn
                .query_row(
                    "SELECT snoozed_until FROM snoozed WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(until.is_some_and(|u| u > now))
        });

        match result {
            Ok(suppressed) => suppressed,
            Err(err) => {
                warn!(key, error = %err, "suppression lookup failed; treating as visible");
                false
            }
        }
    }

    /// Forget every acknowledgment.
    pub fn clear_acknowledged(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM acknowledged", [])?;
            Ok(())
        })
    }

    /// Forget every snooze.
    pub fn clear_snoozed(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM snoozed", [])?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acknowledged_keys_never_expire() {
        let store = SuppressionStore::open_in_memory().unwrap();
        store.acknowledge("overdue_task_t1").unwrap();

        assert!(store.is_suppressed("overdue_task_t1", 0));
        assert!(store.is_suppressed("overdue_task_t1", i64::MAX));
        assert!(!store.is_suppressed("overdue_task_t2", 0));
    }

    #[test]
    fn snooze_lapses_after_expiry() {
        let store = SuppressionStore::open_in_memory().unwrap();
        store.snooze_until("duesoon_task_t1", 1_000).unwrap();

        assert!(store.is_suppressed("duesoon_task_t1", 999));
        // Expiry is exclusive: suppressed only while until > now.
        assert!(!store.is_suppressed("duesoon_task_t1", 1_000));
        assert!(!store.is_suppressed("duesoon_task_t1", 2_000));
    }

    #[test]
    fn repeated_writes_overwrite() {
        let store = SuppressionStore::open_in_memory().unwrap();
        store.snooze_until("k", 1_000).unwrap();
        store.snooze_until("k", 5_000).unwrap();
        assert!(store.is_suppressed("k", 3_000));

        store.acknowledge("k").unwrap();
        store.acknowledge("k").unwrap();
        assert!(store.is_suppressed("k", i64::MAX));
    }

    #[test]
    fn clearing_brings_keys_back() {
        let store = SuppressionStore::open_in_memory().unwrap();
        store.acknowledge("a").unwrap();
        store.snooze_until("s", i64::MAX).unwrap();

        store.clear_acknowledged().unwrap();
        assert!(!store.is_suppressed("a", 0));
        assert!(store.is_suppressed("s", 0));

        store.clear_snoozed().unwrap();
        assert!(!store.is_suppressed("s", 0));
    }
}
