//! Repository trait for the profile cache.
//!
//! Entries are keyed by the (player, profile) pair and carry an absolute
//! expiration time. Expired entries are never returned.

use std::time::Duration;

/// Error type for cache operations
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("TTL out of range: {0:?}")]
    TtlOutOfRange(Duration),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Time-bounded key/value store for profile snapshots
pub trait CacheRepository {
    /// Initialize the storage schema
    fn init(&self) -> CacheResult<()>;

    /// Store `data` with the default TTL, replacing any existing entry
    fn insert(&self, player: &str, profile: &str, data: &str) -> CacheResult<()>;

    /// Store `data` that expires `ttl` from now, replacing any existing entry
    fn insert_with_ttl(
        &self,
        player: &str,
        profile: &str,
        data: &str,
        ttl: Duration,
    ) -> CacheResult<()>;

    /// Fetch a live entry
    ///
    /// An expired entry is deleted and reported as a miss.
    fn get(&self, player: &str, profile: &str) -> CacheResult<Option<String>>;
}
