//! SQLite implementation using rusqlite (synchronous).

use crate::repository::*;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::Duration;

/// Default database location
pub const DEFAULT_DB_PATH: &str = "share/cache.db";

/// Lifetime of entries stored through [`CacheRepository::insert`]
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// SQLite-backed profile cache
pub struct SqliteCache {
    conn: Connection,
}

impl SqliteCache {
    /// Open or create the database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path.as_ref())?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }
}

/// Current time in epoch milliseconds
fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn expiration_after(ttl: Duration) -> CacheResult<i64> {
    i64::try_from(ttl.as_millis())
        .ok()
        .and_then(|ttl| now_millis().checked_add(ttl))
        .ok_or(CacheError::TtlOutOfRange(ttl))
}

impl CacheRepository for SqliteCache {
    fn init(&self) -> CacheResult<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS inventory_cache (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    player_uuid TEXT NOT NULL,
                    profile_uuid TEXT NOT NULL,
                    expiration INTEGER NOT NULL,
                    data TEXT NOT NULL,
                    UNIQUE (player_uuid, profile_uuid)
                )",
                [],
            )
            .map_err(|e| CacheError::Database(e.to_string()))?;
        Ok(())
    }

    fn insert(&self, player: &str, profile: &str, data: &str) -> CacheResult<()> {
        self.insert_with_ttl(player, profile, data, DEFAULT_TTL)
    }

    fn insert_with_ttl(
        &self,
        player: &str,
        profile: &str,
        data: &str,
        ttl: Duration,
    ) -> CacheResult<()> {
        let expiration = expiration_after(ttl)?;
        self.conn
            .execute(
                "INSERT INTO inventory_cache (player_uuid, profile_uuid, expiration, data)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (player_uuid, profile_uuid)
                 DO UPDATE SET expiration = excluded.expiration, data = excluded.data",
                params![player, profile, expiration, data],
            )
            .map_err(|e| CacheError::Database(e.to_string()))?;
        Ok(())
    }

    fn get(&self, player: &str, profile: &str) -> CacheResult<Option<String>> {
        let row: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT expiration, data FROM inventory_cache
                 WHERE player_uuid = ?1 AND profile_uuid = ?2",
                params![player, profile],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|e| CacheError::Database(e.to_string()))?;

        let Some((expiration, data)) = row else {
            return Ok(None);
        };

        if expiration < now_millis() {
            self.conn
                .execute(
                    "DELETE FROM inventory_cache WHERE player_uuid = ?1 AND profile_uuid = ?2",
                    params![player, profile],
                )
                .map_err(|e| CacheError::Database(e.to_string()))?;
            return Ok(None);
        }

        Ok(Some(data))
    }
}
