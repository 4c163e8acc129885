//! Profile cache for the Skyblock inventory service
//!
//! Stores serialized profile member data per (player, profile) pair with an
//! expiration time, so repeated inventory lookups do not hit the upstream
//! API. Expired entries are removed lazily when read.
//!
//! # Example
//!
//! ```no_run
//! use skyblock_cache::{CacheRepository, SqliteCache};
//! use std::time::Duration;
//!
//! let cache = SqliteCache::open("cache.db").unwrap();
//! cache.init().unwrap();
//!
//! cache
//!     .insert_with_ttl("player", "profile", "{}", Duration::from_secs(300))
//!     .unwrap();
//! assert_eq!(cache.get("player", "profile").unwrap().as_deref(), Some("{}"));
//! ```

pub mod repository;
pub mod sqlite;

pub use repository::{CacheError, CacheRepository, CacheResult};
pub use sqlite::{SqliteCache, DEFAULT_DB_PATH, DEFAULT_TTL};
